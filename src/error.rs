//! Error types for todo
//!
//! Store operations never fail; these errors cover everything around the
//! store (configuration, scripts, terminal and output I/O).
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, bad config, bad script)
//! - 4: Operation failed (I/O, serialization)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the todo CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for todo operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Script error on line {line}: {message}")]
    Script { line: usize, message: String },

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidConfig(_)
            | Error::ConfigNotFound(_)
            | Error::InvalidArgument(_)
            | Error::Script { .. } => exit_codes::USER_ERROR,

            Error::Io(_) | Error::Json(_) | Error::TomlParse(_) | Error::OperationFailed(_) => {
                exit_codes::OPERATION_FAILED
            }
        }
    }

    /// Structured details for JSON error output, when the error carries any.
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::Script { line, .. } => Some(serde_json::json!({ "line": line })),
            Error::ConfigNotFound(path) => Some(serde_json::json!({
                "path": path.to_string_lossy(),
            })),
            _ => None,
        }
    }
}

/// Result type alias for todo operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            error: err.to_string(),
            code: err.exit_code(),
            details: err.details(),
        }
    }
}
