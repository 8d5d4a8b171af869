//! Event output for external integrations.
//!
//! Events are emitted as JSON lines to stdout or a configured file. An
//! [`EventSink`] subscribes to the task store like any other observer.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::store::{Change, Observer};
use crate::task::Task;

pub const EVENT_SCHEMA_VERSION: &str = "todo.event.v1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventDestination {
    Stdout,
    File(PathBuf),
}

impl EventDestination {
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        raw.and_then(|value| {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return None;
            }
            if trimmed == "-" {
                return Some(EventDestination::Stdout);
            }
            Some(EventDestination::File(PathBuf::from(trimmed)))
        })
    }

    pub fn open(&self) -> Result<EventSink> {
        match self {
            EventDestination::Stdout => Ok(EventSink::stdout()),
            EventDestination::File(path) => EventSink::file(path),
        }
    }
}

/// Event kinds, one per store transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    TaskAdded,
    TaskToggled,
    TaskEdited,
    TaskDeleted,
    TaskMoved,
}

impl From<&Change> for EventKind {
    fn from(change: &Change) -> Self {
        match change {
            Change::Added { .. } => EventKind::TaskAdded,
            Change::Toggled { .. } => EventKind::TaskToggled,
            Change::Edited { .. } => EventKind::TaskEdited,
            Change::Deleted { .. } => EventKind::TaskDeleted,
            Change::Moved { .. } => EventKind::TaskMoved,
        }
    }
}

/// A structured event with optional payload.
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub schema_version: &'static str,
    pub event: EventKind,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl Event {
    pub fn new(event: EventKind) -> Self {
        Self {
            schema_version: EVENT_SCHEMA_VERSION,
            event,
            timestamp: Utc::now(),
            data: None,
        }
    }

    /// Attach a serializable payload to the event.
    pub fn with_data<T: Serialize>(mut self, data: T) -> Result<Self> {
        self.data = Some(serde_json::to_value(data)?);
        Ok(self)
    }

    /// Event for a store transition; the payload carries the change and the
    /// affected task as it looks afterwards (absent for deletions).
    pub fn from_change(change: &Change, tasks: &[Task]) -> Result<Self> {
        #[derive(Serialize)]
        struct Payload<'a> {
            change: &'a Change,
            #[serde(skip_serializing_if = "Option::is_none")]
            task: Option<&'a Task>,
            total: usize,
        }

        let id = change.task_id();
        let payload = Payload {
            change,
            task: tasks.iter().find(|task| task.id == id),
            total: tasks.len(),
        };
        Event::new(EventKind::from(change)).with_data(payload)
    }
}

/// Event sink that writes JSONL output to a destination.
pub struct EventSink {
    writer: Box<dyn Write + Send>,
}

impl EventSink {
    /// Emit events to stdout.
    pub fn stdout() -> Self {
        Self {
            writer: Box::new(std::io::stdout()),
        }
    }

    /// Emit events to a file, creating it if necessary.
    pub fn file(path: &Path) -> Result<Self> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        Ok(Self {
            writer: Box::new(file),
        })
    }

    /// Emit events to an arbitrary writer.
    pub fn writer(writer: Box<dyn Write + Send>) -> Self {
        Self { writer }
    }

    /// Write a single event as JSONL.
    pub fn emit(&mut self, event: &Event) -> Result<()> {
        let serialized = serde_json::to_vec(event)?;
        self.writer.write_all(&serialized)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush().map_err(Error::Io)?;
        Ok(())
    }
}

impl Observer for EventSink {
    fn notify(&mut self, change: &Change, tasks: &[Task]) {
        let result = Event::from_change(change, tasks).and_then(|event| self.emit(&event));
        if let Err(err) = result {
            tracing::warn!(error = %err, "failed to emit task event");
        }
    }
}
