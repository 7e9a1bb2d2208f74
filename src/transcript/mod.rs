//! Transcript parsing
//!
//! pyresttest in verbose mode prints one curl exchange per test case, followed
//! by the extension's `DEBUG:` dump, and ends the run with one `Test Group`
//! line per group. This module cuts that text into [`TestSegment`]s and
//! [`SummaryLine`]s.

mod parser;

pub use parser::parse;

use std::fmt;

/// Marker the test extension puts in front of its debug dump
pub const DEBUG_MARKER: &str = "DEBUG:";

/// Marker present in the debug dump of a failed test case
pub const ERROR_MARKER: &str = "ERROR:";

/// Keyword pyresttest prints for a passing test group
pub const SUCCESS_KEYWORD: &str = "SUCCEEDED";

/// ANSI bright green
pub const GREEN: &str = "\x1b[92m";

/// ANSI bright red
pub const RED: &str = "\x1b[91m";

/// One test case: the curl exchange and whatever followed the closed connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSegment {
    pub header: String,
    pub debug: String,
}

impl TestSegment {
    pub fn new(header: impl Into<String>, debug: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            debug: debug.into(),
        }
    }

    /// Header and debug text, in transcript order
    pub fn pieces(&self) -> [&str; 2] {
        [&self.header, &self.debug]
    }

    /// Whether the test case failed
    pub fn has_error(&self) -> bool {
        self.debug.contains(ERROR_MARKER)
    }
}

/// Pass/fail line for one test group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLine {
    /// Text after the `Test Group` marker, color codes included
    pub text: String,
    pub passed: bool,
}

impl fmt::Display for SummaryLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Everything recovered from one runner invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTranscript {
    pub segments: Vec<TestSegment>,
    pub summary: Vec<SummaryLine>,
}

impl ParsedTranscript {
    /// Number of segments whose debug text reports an error
    pub fn error_count(&self) -> usize {
        self.segments.iter().filter(|s| s.has_error()).count()
    }
}
