//! Line-oriented command scripts applied to a task store.
//!
//! ```text
//! # comments and blank lines are skipped
//! add Buy milk
//! toggle 1
//! edit 1 Buy oat milk
//! move 2 1
//! delete 00000000-0000-0000-0000-000000000001
//! input Call mom
//! submit
//! ```
//!
//! Tasks are addressed by 1-based position or by full id. A reference that
//! matches nothing is a no-op, like every other store operation. Syntax
//! errors abort the whole script before anything is applied.

use crate::error::{Error, Result};
use crate::store::{Change, TaskStore};
use crate::task::TaskId;

/// How a script line points at a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskRef {
    /// 1-based position in the current list
    Position(usize),
    Id(TaskId),
}

impl TaskRef {
    pub fn resolve(&self, store: &TaskStore) -> Option<TaskId> {
        match self {
            TaskRef::Position(position) => store.id_at(position - 1),
            TaskRef::Id(id) => Some(*id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Toggle(TaskRef),
    Edit(TaskRef, String),
    Delete(TaskRef),
    /// 1-based source and destination positions
    Move { from: usize, to: usize },
    Input(String),
    Submit,
}

impl Command {
    pub fn apply(&self, store: &mut TaskStore) -> Option<Change> {
        match self {
            Command::Add(text) => store.add(text),
            Command::Toggle(target) => {
                let id = target.resolve(store)?;
                store.toggle_complete(&id)
            }
            Command::Edit(target, text) => {
                let id = target.resolve(store)?;
                store.update_content(&id, text)
            }
            Command::Delete(target) => {
                let id = target.resolve(store)?;
                store.delete(&id)
            }
            Command::Move { from, to } => store.reorder(from - 1, to - 1),
            Command::Input(text) => {
                store.set_input(text.clone());
                None
            }
            Command::Submit => store.submit_input(),
        }
    }
}

/// A parsed command and the line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub line: usize,
    pub command: Command,
}

pub fn parse(source: &str) -> Result<Vec<ScriptLine>> {
    let mut out = Vec::new();
    for (idx, raw) in source.lines().enumerate() {
        let line = idx + 1;
        match parse_line(raw) {
            Ok(Some(command)) => out.push(ScriptLine { line, command }),
            Ok(None) => {}
            Err(message) => return Err(Error::Script { line, message }),
        }
    }
    Ok(out)
}

/// Parse one line. `Ok(None)` for blank lines and comments.
pub fn parse_line(raw: &str) -> std::result::Result<Option<Command>, String> {
    let trimmed = raw.trim_start();
    if trimmed.trim_end().is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let (verb, rest) = split_word(trimmed);
    let command = match verb.to_ascii_lowercase().as_str() {
        "add" => Command::Add(rest.to_string()),
        "toggle" => Command::Toggle(parse_single_ref(verb, rest)?),
        "edit" => {
            let (target, text) = split_word(rest);
            if target.is_empty() {
                return Err("edit needs a task".to_string());
            }
            Command::Edit(parse_ref(target)?, text.to_string())
        }
        "delete" => Command::Delete(parse_single_ref(verb, rest)?),
        "move" => {
            let (from, tail) = split_word(rest);
            let (to, extra) = split_word(tail);
            if from.is_empty() || to.is_empty() || !extra.trim().is_empty() {
                return Err("move needs exactly two positions".to_string());
            }
            Command::Move {
                from: parse_position(from)?,
                to: parse_position(to)?,
            }
        }
        "input" => Command::Input(rest.to_string()),
        "submit" => {
            if !rest.trim().is_empty() {
                return Err("submit takes no arguments".to_string());
            }
            Command::Submit
        }
        other => return Err(format!("unknown command '{other}'")),
    };
    Ok(Some(command))
}

/// Apply a whole script. Returns the effective changes in order.
pub fn run(store: &mut TaskStore, source: &str) -> Result<Vec<Change>> {
    let lines = parse(source)?;
    let mut changes = Vec::new();
    for entry in &lines {
        match entry.command.apply(store) {
            Some(change) => changes.push(change),
            None => tracing::trace!(line = entry.line, "script line changed nothing"),
        }
    }
    Ok(changes)
}

fn split_word(value: &str) -> (&str, &str) {
    let value = value.trim_start();
    match value.find(char::is_whitespace) {
        Some(idx) => (&value[..idx], value[idx..].trim_start()),
        None => (value, ""),
    }
}

fn parse_single_ref(verb: &str, rest: &str) -> std::result::Result<TaskRef, String> {
    let (target, extra) = split_word(rest);
    if target.is_empty() {
        return Err(format!("{verb} needs a task"));
    }
    if !extra.trim().is_empty() {
        return Err(format!("{verb} takes a single task"));
    }
    parse_ref(target)
}

fn parse_ref(token: &str) -> std::result::Result<TaskRef, String> {
    if token.chars().all(|ch| ch.is_ascii_digit()) {
        return parse_position(token).map(TaskRef::Position);
    }
    token
        .parse::<TaskId>()
        .map(TaskRef::Id)
        .map_err(|_| format!("'{token}' is neither a position nor a task id"))
}

fn parse_position(token: &str) -> std::result::Result<usize, String> {
    let value: usize = token
        .parse()
        .map_err(|_| format!("'{token}' is not a position"))?;
    if value == 0 {
        return Err("positions start at 1".to_string());
    }
    Ok(value)
}
