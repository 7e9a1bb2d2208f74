//! Result presentation
//!
//! Turns parsed segments into INFO/DEBUG blocks and sends them to the console,
//! a log file, or both. Both sinks render from the same [`Block`] list.

pub mod debug;
mod logfile;

pub use debug::{format_debug, DebugMode, DebugRecord};
pub use logfile::{concatenate_logs, write_log};

use colored::Colorize;

use crate::transcript::{SummaryLine, TestSegment, DEBUG_MARKER};

const INFO_BANNER: &str = "------------ INFO ------------";
const DEBUG_BANNER: &str = "------------ DEBUG -----------";

/// What to include in a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportFilter {
    /// Only failed test cases
    pub errors_only: bool,
    /// Minimal debug fields, and no INFO header in errors-only mode
    pub minimal: bool,
}

impl ReportFilter {
    pub fn full() -> Self {
        Self::default()
    }

    pub fn errors() -> Self {
        Self {
            errors_only: true,
            minimal: false,
        }
    }

    pub fn minimal_errors() -> Self {
        Self {
            errors_only: true,
            minimal: true,
        }
    }

    fn debug_mode(&self) -> DebugMode {
        if self.minimal {
            DebugMode::Minimal
        } else {
            DebugMode::Full
        }
    }
}

/// One labelled piece of report output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Plain runner output
    Info(String),
    /// Formatted debug dump
    Debug(String),
}

impl Block {
    /// Classify a piece of segment text, formatting it when it is a dump
    fn from_piece(piece: &str, mode: DebugMode) -> Self {
        if piece.contains(DEBUG_MARKER) {
            Self::Debug(format_debug(piece, mode))
        } else {
            Self::Info(piece.to_string())
        }
    }

    fn banner(&self) -> &'static str {
        match self {
            Self::Info(_) => INFO_BANNER,
            Self::Debug(_) => DEBUG_BANNER,
        }
    }

    fn body(&self) -> &str {
        match self {
            Self::Info(text) | Self::Debug(text) => text,
        }
    }
}

/// Select and format the blocks for each segment
///
/// The outer list has one entry per segment, in transcript order.
pub fn collect_blocks(segments: &[TestSegment], filter: ReportFilter) -> Vec<Vec<Block>> {
    let mode = filter.debug_mode();

    segments
        .iter()
        .map(|segment| -> Vec<Block> {
            if !filter.errors_only {
                return segment
                    .pieces()
                    .iter()
                    .map(|piece| Block::from_piece(piece, mode))
                    .collect();
            }

            let mut blocks = Vec::new();
            // The header is the INFO piece directly preceding the dump.
            if segment.has_error() && !segment.header.contains(DEBUG_MARKER) {
                if !filter.minimal {
                    blocks.push(Block::Info(segment.header.clone()));
                }
                blocks.push(Block::from_piece(&segment.debug, mode));
            }
            blocks
        })
        .collect()
}

/// Render blocks for the terminal, with colored banners
pub fn render_console(blocks: &[Vec<Block>]) -> String {
    let mut out = String::new();
    for segment in blocks {
        out.push_str("\n\n");
        for block in segment {
            let banner = match block {
                Block::Info(_) => block.banner().cyan(),
                Block::Debug(_) => block.banner().yellow(),
            };
            out.push_str(&format!("{banner}\n{}\n\n", block.body()));
        }
    }
    out
}

/// Render blocks for a log file
///
/// Segments that contributed nothing produce no text at all, so an empty
/// report gives an empty string.
pub fn render_plain(blocks: &[Vec<Block>]) -> String {
    let mut out = String::new();
    for block in blocks.iter().flatten() {
        out.push_str(block.banner());
        out.push('\n');
        out.push_str(block.body());
        out.push_str("\n\n");
    }
    out
}

/// Print the report to stdout
pub fn print_report(segments: &[TestSegment], filter: ReportFilter) {
    let blocks = collect_blocks(segments, filter);
    print!("{}", render_console(&blocks));
}

/// Print the per-group pass/fail lines
pub fn print_summary(summary: &[SummaryLine]) {
    println!("{}\n", "Test results:".bold());
    for line in summary {
        println!("{line}");
    }
}
