//! Task records and id generation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque, immutable task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// First eight hex digits, enough to tell tasks apart on screen.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim()).map(Self)
    }
}

/// One to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub content: String,
    pub is_complete: bool,
}

impl Task {
    pub fn new(id: TaskId, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
            is_complete: false,
        }
    }
}

/// Supplies a fresh id for every created task.
///
/// Implementations must never hand out the same id twice.
pub trait IdSource {
    fn next_id(&mut self) -> TaskId;
}

/// Random UUID v4 ids.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&mut self) -> TaskId {
        TaskId(Uuid::new_v4())
    }
}

/// Counter-backed ids (`00000000-0000-0000-0000-000000000001`, ...).
///
/// Used by tests and by `todo run --deterministic-ids` so output is stable.
#[derive(Debug, Default, Clone)]
pub struct SequentialIds {
    next: u128,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> TaskId {
        self.next += 1;
        TaskId(Uuid::from_u128(self.next))
    }
}
