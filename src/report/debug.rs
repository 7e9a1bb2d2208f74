//! Debug dump formatting
//!
//! The test extension prints a Python-dict-looking dump after `DEBUG:`. It is
//! close to JSON but not quite, so the fields we care about are cut out by
//! position and reassembled into a JSON document before pretty-printing.
//!
//! The minimal-mode patterns depend on the order in which the extension emits
//! its keys. That coupling is deliberate; if the extension reorders its output,
//! extraction fails and the raw text is shown instead.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};
use serde_json::Value;
use std::io;
use thiserror::Error;

const BODY_PREFIX: &str = "DEBUG:{\"body\": \"";
const RESPONSE_BOUNDARY: &str = "\", \"response";
const FAILURES_KEY: &str = ", \"failures\": ";
const FAILURES_END: &str = "]}";

static ERROR_MESSAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""errorMessage": (.*), "registeredError": [0-1]}""#)
        .expect("error message pattern is valid")
});
static URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""_url":(.*?),"#).expect("url pattern is valid"));
static GROUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""group":(.*?),"#).expect("group pattern is valid"));
static NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""name":(.*?),"#).expect("name pattern is valid"));

/// How much of a debug dump to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DebugMode {
    /// Response body and failure list
    #[default]
    Full,
    /// Group, name, url and error message only
    Minimal,
}

/// Why fields could not be cut out of a dump
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("no body field after the DEBUG marker")]
    MissingBody,

    #[error("no failures list in debug dump")]
    MissingFailures,

    #[error("field '{0}' not found in debug dump")]
    MissingField(&'static str),
}

/// A debug dump after extraction
#[derive(Debug, Clone, PartialEq)]
pub enum DebugRecord {
    /// Fields were extracted and form valid JSON
    Structured(Value),
    /// Text that could not be turned into JSON, kept as is
    Opaque(String),
}

impl DebugRecord {
    /// Extract a record from a dump
    ///
    /// Falls back to the assembled text when it is not JSON, and to the raw
    /// dump when the fields cannot be located at all.
    pub fn parse(payload: &str, mode: DebugMode) -> Self {
        let assembled = match assemble(payload, mode) {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!(error = %e, "debug extraction failed, keeping raw dump");
                return Self::Opaque(payload.to_string());
            }
        };

        match serde_json::from_str(&assembled) {
            Ok(value) => Self::Structured(value),
            Err(e) => {
                tracing::debug!(error = %e, "assembled debug record is not JSON");
                Self::Opaque(assembled)
            }
        }
    }

    /// Pretty-print with sorted keys and four-space indentation
    pub fn render(&self) -> String {
        match self {
            Self::Structured(value) => render_value(value).unwrap_or_else(|| value.to_string()),
            Self::Opaque(text) => text.clone(),
        }
    }
}

/// Format one `DEBUG:` dump for display
pub fn format_debug(payload: &str, mode: DebugMode) -> String {
    DebugRecord::parse(payload, mode).render()
}

/// Cut the interesting fields out of a dump and glue them into JSON text
///
/// The result is not guaranteed to be valid JSON.
pub fn assemble(payload: &str, mode: DebugMode) -> Result<String, ExtractError> {
    let (_, body) = payload
        .split_once(BODY_PREFIX)
        .ok_or(ExtractError::MissingBody)?;

    match mode {
        DebugMode::Full => assemble_full(body),
        DebugMode::Minimal => assemble_minimal(body),
    }
}

fn assemble_full(body: &str) -> Result<String, ExtractError> {
    let response = body
        .split_once(RESPONSE_BOUNDARY)
        .map_or(body, |(response, _)| response)
        .replace('\\', "");

    let (_, failures) = body
        .split_once(FAILURES_KEY)
        .ok_or(ExtractError::MissingFailures)?;
    let failures = match failures.rfind(FAILURES_END) {
        Some(end) => &failures[..end],
        None => drop_last_char(failures),
    };

    Ok(format!(
        "{{\"response\" : {response}, \"failures\" : {failures}]}}"
    ))
}

fn assemble_minimal(body: &str) -> Result<String, ExtractError> {
    let unescaped = body.replace('\\', "");

    let error = capture(&ERROR_MESSAGE, &unescaped, "errorMessage")?;
    let url = capture(&URL, body, "_url")?;
    let group = capture(&GROUP, body, "group")?;
    let name = capture(&NAME, body, "name")?;

    Ok(format!(
        "{{ \"debug\": {{\"group\" : {group},\"name\" : {name},\"url\" : {url},\"error\" : {error}}}}}"
    ))
}

fn capture<'a>(
    pattern: &Regex,
    text: &'a str,
    field: &'static str,
) -> Result<&'a str, ExtractError> {
    pattern
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or(ExtractError::MissingField(field))
}

fn drop_last_char(text: &str) -> &str {
    text.char_indices()
        .last()
        .map_or(text, |(index, _)| &text[..index])
}

/// Four-space indented output with `"key":value` pairs, no space after the colon
struct DumpFormatter(PrettyFormatter<'static>);

impl DumpFormatter {
    fn new() -> Self {
        Self(PrettyFormatter::with_indent(b"    "))
    }
}

impl Formatter for DumpFormatter {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.0.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.0.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b":")
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object_value(writer)
    }
}

fn render_value(value: &Value) -> Option<String> {
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, DumpFormatter::new());
    value.serialize(&mut serializer).ok()?;
    String::from_utf8(out).ok()
}
