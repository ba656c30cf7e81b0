//! Structured JSON-lines logger
//!
//! - One log line = one event
//! - `event` first, then `severity`, then fields sorted by key
//! - Synchronous, no buffering
//! - Write failures are ignored: logging never affects evaluation

use std::fmt;
use std::io::{self, Write};

use serde_json::Value;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Debug-level detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Recoverable issues
    Warn = 2,
    /// Operation failures
    Error = 3,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A structured logger that outputs JSON lines
pub struct Logger;

impl Logger {
    /// Log to stdout
    pub fn log(level: Level, event: &str, fields: &[(&str, &str)]) {
        Self::log_to_writer(level, event, fields, &mut io::stdout());
    }

    /// Log to stderr
    pub fn log_stderr(level: Level, event: &str, fields: &[(&str, &str)]) {
        Self::log_to_writer(level, event, fields, &mut io::stderr());
    }

    pub(crate) fn log_to_writer<W: Write>(
        level: Level,
        event: &str,
        fields: &[(&str, &str)],
        writer: &mut W,
    ) {
        let line = Self::format_line(level, event, fields, None);
        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }

    /// Render one log line, newline included.
    ///
    /// `timestamp`, when given, is emitted right after the severity.
    pub fn format_line(
        level: Level,
        event: &str,
        fields: &[(&str, &str)],
        timestamp: Option<&str>,
    ) -> String {
        let mut output = String::with_capacity(256);

        output.push_str("{\"event\":");
        output.push_str(&quote(event));
        output.push_str(",\"severity\":");
        output.push_str(&quote(level.as_str()));

        if let Some(ts) = timestamp {
            output.push_str(",\"ts\":");
            output.push_str(&quote(ts));
        }

        let mut sorted_fields: Vec<_> = fields.iter().collect();
        sorted_fields.sort_by_key(|(k, _)| *k);

        for (key, value) in sorted_fields {
            output.push(',');
            output.push_str(&quote(key));
            output.push(':');
            output.push_str(&quote(value));
        }

        output.push_str("}\n");
        output
    }

    pub fn trace(event: &str, fields: &[(&str, &str)]) {
        Self::log_stderr(Level::Trace, event, fields);
    }

    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::log_stderr(Level::Info, event, fields);
    }

    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        Self::log_stderr(Level::Warn, event, fields);
    }

    pub fn error(event: &str, fields: &[(&str, &str)]) {
        Self::log_stderr(Level::Error, event, fields);
    }
}

/// JSON string literal for `s`, escapes included
fn quote(s: &str) -> String {
    Value::from(s).to_string()
}

#[cfg(test)]
pub(crate) fn capture_log(level: Level, event: &str, fields: &[(&str, &str)]) -> String {
    let mut buffer = Vec::new();
    Logger::log_to_writer(level, event, fields, &mut buffer);
    String::from_utf8(buffer).unwrap()
}
