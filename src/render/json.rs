//! JSON rendering for records and segment lists.

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{Segment, TranscriptRecord};

use super::file::write_atomic;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Convert a record to JSON. Unknown fields serialize as `null`.
pub fn record_to_json(record: &TranscriptRecord, format: JsonFormat) -> Result<String> {
    to_json(record, format)
}

/// Convert a segment list to JSON.
pub fn segments_to_json(segments: &[Segment], format: JsonFormat) -> Result<String> {
    to_json(segments, format)
}

/// Write a record as JSON to `path`, replacing any existing file.
pub fn write_json_file<P: AsRef<Path>>(
    record: &TranscriptRecord,
    path: P,
    format: JsonFormat,
) -> Result<()> {
    let path = path.as_ref();
    let json = record_to_json(record, format)?;
    write_atomic(path, |mut out| {
        out.write_all(json.as_bytes())?;
        out.flush()?;
        Ok(())
    })?;
    log::info!("JSON written: {}", path.display());
    Ok(())
}
