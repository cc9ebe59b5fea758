//! Output file naming.

use crate::model::{sanitize_label, TranscriptRecord};

fn stem(record: &TranscriptRecord) -> String {
    format!(
        "notes_{}_{}",
        sanitize_label(record.identity.name.as_str()),
        sanitize_label(record.identity.student_id.as_str())
    )
}

/// CSV file name for a record: `notes_{name}_{student_id}.csv`.
///
/// Unknown fields contribute the sentinel, so two unreadable transcripts
/// share a name; see [`numbered_file_name`].
pub fn csv_file_name(record: &TranscriptRecord) -> String {
    format!("{}.csv", stem(record))
}

/// JSON file name for a record, same stem as [`csv_file_name`].
pub fn json_file_name(record: &TranscriptRecord) -> String {
    format!("{}.json", stem(record))
}

/// `name` with `_{n}` inserted before its extension.
pub fn numbered_file_name(name: &str, n: usize) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) => format!("{}_{}.{}", stem, n, ext),
        None => format!("{}_{}", name, n),
    }
}
