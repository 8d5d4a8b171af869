//! Command-line interface for todo
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand is defined in its own submodule.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;
use crate::events::EventDestination;

mod run;
mod ui;

/// todo - an in-memory to-do list
///
/// Add, complete, edit, delete and reorder tasks in a terminal board, or
/// replay a command script and print the resulting list. Nothing is saved.
#[derive(Parser, Debug)]
#[command(name = "todo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (defaults to ./.todo.toml, then the user config file)
    #[arg(long, global = true, env = "TODO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Write task events as JSON lines to a file, or `-` for stdout
    #[arg(long, global = true)]
    pub events: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the interactive to-do board (default)
    Ui,

    /// Apply a command script to a fresh list and print the result
    Run {
        /// Script file; reads stdin when omitted or `-`
        file: Option<PathBuf>,

        /// Number task ids 1, 2, 3... instead of random UUIDs
        #[arg(long)]
        deterministic_ids: bool,
    },
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let cwd = std::env::current_dir()?;
        let config = Config::resolve(self.config.as_deref(), &cwd)?;
        let events = EventDestination::parse(self.events.as_deref());
        let events_to_stdout = matches!(events, Some(EventDestination::Stdout));

        match self.command.unwrap_or(Commands::Ui) {
            Commands::Ui => ui::run(config, events),
            Commands::Run {
                file,
                deterministic_ids,
            } => run::run(run::RunOptions {
                file,
                deterministic_ids,
                config,
                events,
                json: self.json && !events_to_stdout,
                quiet: self.quiet || events_to_stdout,
            }),
        }
    }
}
