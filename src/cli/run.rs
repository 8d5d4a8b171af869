//! todo run command implementation
//!
//! Replays a command script against a fresh list and reports the result.

use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::Config;
use crate::error::Result;
use crate::events::EventDestination;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::script;
use crate::store::{TaskStore, TraceObserver};
use crate::task::{IdSource, RandomIds, SequentialIds, Task};

pub struct RunOptions {
    pub file: Option<PathBuf>,
    pub deterministic_ids: bool,
    pub config: Config,
    pub events: Option<EventDestination>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
struct ListReport {
    tasks: Vec<Task>,
    total: usize,
    completed: usize,
    changes: usize,
}

pub fn run(options: RunOptions) -> Result<()> {
    let source = read_source(options.file.as_deref())?;

    let ids: Box<dyn IdSource> = if options.deterministic_ids {
        Box::new(SequentialIds::new())
    } else {
        Box::new(RandomIds)
    };
    let mut store = TaskStore::seeded(ids, &options.config.tasks.initial);
    store.subscribe(Box::new(TraceObserver));
    if let Some(destination) = options.events.as_ref() {
        store.subscribe(Box::new(destination.open()?));
    }

    let changes = script::run(&mut store, &source)?;

    let report = ListReport {
        tasks: store.tasks().to_vec(),
        total: store.len(),
        completed: store.completed_count(),
        changes: changes.len(),
    };

    let mut human = HumanOutput::new("todo list");
    human.push_summary("total", report.total.to_string());
    human.push_summary("completed", report.completed.to_string());
    human.push_summary("changes", report.changes.to_string());
    for (idx, task) in report.tasks.iter().enumerate() {
        human.push_detail(format_task_line(idx, task));
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "run",
        &report,
        Some(&human),
    )
}

fn read_source(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn format_task_line(idx: usize, task: &Task) -> String {
    let check = if task.is_complete { 'x' } else { ' ' };
    format!("{}. [{check}] {} ({})", idx + 1, task.content, task.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_task_line_marks_completion() {
        let mut ids = SequentialIds::new();
        let mut task = Task::new(ids.next_id(), "Buy milk");
        assert_eq!(format_task_line(0, &task), "1. [ ] Buy milk (00000000-0000-0000-0000-000000000001)");
        task.is_complete = true;
        assert_eq!(format_task_line(2, &task), "3. [x] Buy milk (00000000-0000-0000-0000-000000000001)");
    }
}
