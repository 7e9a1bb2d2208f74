//! resttest - readable reports for pyresttest runs
//!
//! Runs pyresttest test definitions as a subprocess, splits the verbose
//! transcript into per-test segments and prints or logs them as INFO/DEBUG
//! blocks with pretty-printed debug dumps.

pub mod cli;
pub mod commands;
pub mod common;
pub mod report;
pub mod runner;
pub mod transcript;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use transcript::{parse, ParsedTranscript, SummaryLine, TestSegment};
