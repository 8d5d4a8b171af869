//! todo - an in-memory to-do list
//!
//! The library behind the `todo` binary. A [`store::TaskStore`] owns the
//! ordered task list and the pending new-task text; every change goes
//! through its operations and is announced to subscribed observers.
//!
//! # Module Organization
//!
//! - `task`: task records and id generation
//! - `store`: the task store, its transitions and observers
//! - `drag`: drag-to-reorder gestures and their drop results
//! - `script`: line-oriented command scripts for `todo run`
//! - `events`: JSONL event output
//! - `config`: configuration loading from `.todo.toml`
//! - `output`: human and JSON command output
//! - `ui`: the terminal board
//! - `cli`: command-line interface using clap
//! - `error`: error types and result aliases

pub mod cli;
pub mod config;
pub mod drag;
pub mod error;
pub mod events;
pub mod output;
pub mod script;
pub mod store;
pub mod task;
pub mod ui;

pub use error::{Error, Result};
