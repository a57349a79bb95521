//! JSON I/O handling for CLI
//!
//! - Input: one GraphQL request object via stdin, possibly spanning lines
//! - Output: one JSON object via stdout
//! - UTF-8 only

use std::io::{self, Read, Write};

use serde::Serialize;

use super::errors::{CliError, CliResult};

/// Read the whole request from stdin
pub fn read_request() -> CliResult<String> {
    let mut input = String::new();
    io::stdin().lock().read_to_string(&mut input)?;

    if input.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }

    Ok(input)
}

/// Write a JSON value to stdout on one line
pub fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

/// Write plain text to stdout
pub fn write_text(text: &str) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "{}", text)?;
    stdout.flush()?;

    Ok(())
}
