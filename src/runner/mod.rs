//! Test run orchestration
//!
//! Runs one test definition at a time, parses what the runner printed and
//! presents the result. Runs are strictly sequential; each capture finishes
//! before the next one starts.

mod source;

pub use source::{PyRestTest, TranscriptSource};

use colored::Colorize;
use std::path::PathBuf;

use crate::common::config::{Config, TestEntry};
use crate::common::paths::{LogLayout, RunStamp};
use crate::common::Result;
use crate::report::{self, ReportFilter};
use crate::transcript::{self, ParsedTranscript, TestSegment};

/// Keys run by `--all`, in order
pub const RUN_ALL_KEYS: [&str; 5] = ["1", "2", "3", "4", "5"];

/// Presentation switches from the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PresentOptions {
    pub only_errors: bool,
    pub write: bool,
    pub silent: bool,
    pub ignore_info: bool,
}

impl PresentOptions {
    /// `--ignore-info` implies `--only-errors` with minimal dumps
    pub fn filter(&self) -> ReportFilter {
        if self.ignore_info {
            ReportFilter::minimal_errors()
        } else if self.only_errors {
            ReportFilter::errors()
        } else {
            ReportFilter::full()
        }
    }
}

/// Drives the runner and owns the log files written during a session
pub struct Orchestrator<S> {
    source: S,
    config: Config,
    layout: LogLayout,
    /// Log files written since the last [`Orchestrator::begin_batch`]
    written: Vec<PathBuf>,
}

impl<S: TranscriptSource> Orchestrator<S> {
    pub fn new(source: S, config: Config, layout: LogLayout) -> Self {
        Self {
            source,
            config,
            layout,
            written: Vec::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn layout(&self) -> &LogLayout {
        &self.layout
    }

    /// Run one test definition and parse its transcript
    pub async fn run_test(&mut self, entry: &TestEntry) -> Result<ParsedTranscript> {
        println!("\nStarting test '{}...'", entry.file.display());
        println!("\nPlease wait while test is being run");

        let text = self.source.capture(&entry.file).await?;
        println!("\n{}\n", "Test finished".bold());

        let parsed = transcript::parse(&text);
        tracing::info!(
            file = %entry.file.display(),
            segments = parsed.segments.len(),
            errors = parsed.error_count(),
            "test run parsed"
        );
        Ok(parsed)
    }

    /// Present a run the way command-line flags ask for
    pub fn present(&mut self, parsed: &ParsedTranscript, options: &PresentOptions) -> Result<()> {
        let filter = options.filter();

        if !options.silent {
            report::print_report(&parsed.segments, filter);
        }

        if options.write {
            self.write_report(&parsed.segments, filter)?;
        }

        report::print_summary(&parsed.summary);
        Ok(())
    }

    /// Write a report to a log file stamped with the current time
    pub fn write_report(
        &mut self,
        segments: &[TestSegment],
        filter: ReportFilter,
    ) -> Result<Option<PathBuf>> {
        let blocks = report::collect_blocks(segments, filter);
        let written = report::write_log(&self.layout, &RunStamp::now(), &blocks)?;

        if let Some(path) = &written {
            println!("\n\nResults written to: {}", path.display());
            if !self.written.contains(path) {
                self.written.push(path.clone());
            }
        }
        Ok(written)
    }

    /// Start tracking log files for a later [`Orchestrator::finish_batch`]
    pub fn begin_batch(&mut self) {
        self.written.clear();
    }

    /// Merge every log file written since [`Orchestrator::begin_batch`]
    ///
    /// The merged file is stamped one second after now so it sorts after the
    /// files it replaces.
    pub fn finish_batch(&mut self) -> Result<Option<PathBuf>> {
        let sources = std::mem::take(&mut self.written);
        let stamp = RunStamp::now().plus_seconds(1);
        report::concatenate_logs(&self.layout, &stamp, &sources)
    }
}
