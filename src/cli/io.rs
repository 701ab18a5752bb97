//! JSON I/O handling for CLI
//!
//! - Input: one JSON document per line
//! - Output: one JSON object per line
//! - UTF-8 only

use std::io::{BufRead, Write};

use serde::Serialize;
use serde_json::{json, Value};

use super::errors::{CliError, CliResult};

/// Iterates over non-blank input lines, parsing each as JSON.
///
/// Read failures end iteration with an error item; parse failures are
/// returned per line so the caller can keep going.
pub fn read_documents<R: BufRead>(
    reader: R,
) -> impl Iterator<Item = CliResult<Result<Value, serde_json::Error>>> {
    reader
        .lines()
        .filter(|line| !matches!(line, Ok(l) if l.trim().is_empty()))
        .map(|line| {
            let line = line.map_err(CliError::from)?;
            Ok(serde_json::from_str(&line))
        })
}

/// Write a success response
pub fn write_response<W: Write, T: Serialize>(out: &mut W, data: &T) -> CliResult<()> {
    let data = serde_json::to_value(data)?;
    let response = json!({
        "status": "ok",
        "data": data
    });
    write_line(out, &response)
}

/// Write an error response; `errors` is the field error tree, if any
pub fn write_error<W: Write>(
    out: &mut W,
    code: &str,
    message: &str,
    errors: Value,
) -> CliResult<()> {
    let response = json!({
        "status": "error",
        "code": code,
        "message": message,
        "errors": errors
    });
    write_line(out, &response)
}

fn write_line<W: Write>(out: &mut W, response: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *out, response)?;
    writeln!(out)?;
    out.flush()?;

    Ok(())
}
