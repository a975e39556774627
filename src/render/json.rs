//! JSON rendering for analyses and batch responses.

use std::io::Write;

use serde::Serialize;

use crate::error::Result;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize a result to a JSON string.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value)?,
        JsonFormat::Compact => serde_json::to_string(value)?,
    };
    Ok(json)
}

/// Serialize a result straight into a writer.
pub fn to_json_writer<W: Write, T: Serialize + ?Sized>(
    writer: W,
    value: &T,
    format: JsonFormat,
) -> Result<()> {
    match format {
        JsonFormat::Pretty => serde_json::to_writer_pretty(writer, value)?,
        JsonFormat::Compact => serde_json::to_writer(writer, value)?,
    }
    Ok(())
}
