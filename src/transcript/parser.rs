//! Splits a raw pyresttest transcript into segments and summary lines

use once_cell::sync::Lazy;
use regex::Regex;

use super::{ParsedTranscript, SummaryLine, TestSegment, GREEN, RED, SUCCESS_KEYWORD};

/// curl's `*   Trying 10.0.0.1...` line, which opens every test case
static CONNECT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*[ ]*Trying [0-9]+\.[0-9]+\.[0-9]+\.[0-9]+[^\n]*")
        .expect("connection marker pattern is valid")
});

/// curl's `* Closing connection 0`, which ends the exchange
static CLOSING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\* Closing connection #?[0-9]+").expect("closing marker pattern is valid")
});

const GROUP_MARKER: &str = "Test Group";

/// Parse a transcript
///
/// Never fails: chunks that do not look like a test case are skipped.
pub fn parse(raw: &str) -> ParsedTranscript {
    let text = strip_quoting(raw);
    let mut parsed = ParsedTranscript::default();

    // Everything before the first connection attempt is runner start-up noise.
    for (index, chunk) in CONNECT.split(text).enumerate().skip(1) {
        let mut parts = CLOSING.split(chunk);
        let header = parts.next().unwrap_or_default();
        let Some(debug) = parts.next() else {
            tracing::debug!(chunk = index, "no closing connection marker, skipping");
            continue;
        };

        if debug.contains(GROUP_MARKER) {
            parsed.summary = summary_lines(debug);
        }
        parsed.segments.push(TestSegment::new(header, debug));
    }

    tracing::debug!(
        segments = parsed.segments.len(),
        groups = parsed.summary.len(),
        "parsed transcript"
    );
    parsed
}

/// Drop a leading `b'` / `b"` left over from a bytes repr
fn strip_quoting(text: &str) -> &str {
    text.strip_prefix("b'")
        .or_else(|| text.strip_prefix("b\""))
        .unwrap_or(text)
}

fn summary_lines(debug: &str) -> Vec<SummaryLine> {
    let mut lines: Vec<SummaryLine> = debug
        .split(GROUP_MARKER)
        .skip(1)
        .map(|fragment| SummaryLine {
            text: fragment.to_string(),
            passed: fragment.contains(SUCCESS_KEYWORD),
        })
        .collect();

    // The split eats the color code that preceded the first group.
    if let Some(first) = lines.first_mut() {
        let color = if first.passed { GREEN } else { RED };
        first.text.insert_str(0, color);
    }
    lines
}
