//! JSON I/O handling for CLI
//!
//! - Input: one JSON object of indicators, or one object per line for `stream`
//! - Output: one JSON envelope per response on stdout
//! - UTF-8 only

use std::io::{self, BufRead, Read, Write};

use serde_json::{Map, Value};

use super::errors::{CliError, CliResult};

/// Parse a JSON document that must be an object of indicators
pub fn parse_request(text: &str) -> CliResult<Map<String, Value>> {
    if text.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }

    match serde_json::from_str(text)? {
        Value::Object(map) => Ok(map),
        other => Err(CliError::io_error(format!(
            "expected a JSON object of indicators, got {}",
            kind_of(&other)
        ))),
    }
}

/// Read a single JSON request from stdin
pub fn read_request() -> CliResult<Map<String, Value>> {
    let mut text = String::new();
    io::stdin().lock().read_to_string(&mut text)?;
    parse_request(&text)
}

/// Read one JSON request per line; blank lines are skipped
pub fn read_requests<R: BufRead>(reader: R) -> impl Iterator<Item = CliResult<Map<String, Value>>> {
    reader.lines().filter_map(|line| match line {
        Ok(line) if line.trim().is_empty() => None,
        Ok(line) => Some(parse_request(&line)),
        Err(e) => Some(Err(CliError::from(e))),
    })
}

/// Write a success envelope
pub fn write_response<W: Write>(out: &mut W, data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });

    serde_json::to_writer(&mut *out, &response)?;
    writeln!(out)?;
    out.flush()?;

    Ok(())
}

/// Write an error envelope
pub fn write_error<W: Write>(out: &mut W, code: &str, message: &str) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    });

    serde_json::to_writer(&mut *out, &response)?;
    writeln!(out)?;
    out.flush()?;

    Ok(())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
