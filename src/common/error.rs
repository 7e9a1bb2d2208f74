//! Error types for the test utility
//!
//! Messages are printed straight to the terminal, so they say what went wrong
//! and, where it helps, what to do about it.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the test utility
#[derive(Error, Debug)]
pub enum Error {
    // === Argument Errors ===
    #[error("{0}")]
    InvalidArguments(String),

    // === Runner Errors ===
    #[error("Test runner '{name}' not found. Searched: {searched}")]
    RunnerNotFound { name: String, searched: String },

    #[error("Failed to start test runner: {0}")]
    RunnerSpawn(#[source] io::Error),

    #[error("Test runner output could not be read: {0}")]
    RunnerOutput(String),

    // === Log File Errors ===
    #[error("Failed to write log file '{path}': {error}")]
    LogWrite { path: String, error: String },

    // === Configuration Errors ===
    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Create a runner not found error listing the searched locations
    pub fn runner_not_found<S: AsRef<str>>(name: &str, paths: &[S]) -> Self {
        Self::RunnerNotFound {
            name: name.to_string(),
            searched: paths.iter().map(|s| s.as_ref()).collect::<Vec<_>>().join(", "),
        }
    }

    /// Create a log write error for the given path
    pub fn log_write(path: &std::path::Path, error: &io::Error) -> Self {
        Self::LogWrite {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }
}
