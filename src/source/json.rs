use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use super::raw::RawTable;

/// Encode a raw table as pretty JSON (three-space indent).
pub fn serialize(table: &RawTable) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"   ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut bytes, formatter);
    table
        .serialize(&mut serializer)
        .context("Failed to serialize points table")?;
    Ok(bytes)
}

/// Decode a raw table, keeping the column order of the document.
pub fn deserialize(bytes: &[u8]) -> Result<RawTable> {
    serde_json::from_slice(bytes).context("Failed to parse points table JSON")
}
