//! Error types for gradesheet.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for gradesheet operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading, extracting or writing transcripts.
///
/// Field-level and table-level anomalies never show up here: unresolved
/// metadata becomes [`Field::Unknown`](crate::model::Field) and truncated
/// table rows fall back to default cell values.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input document does not exist.
    #[error("Source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page index is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(usize, usize),

    /// The formation anchor line is absent from the first page.
    #[error("Formation label not found on the first page")]
    FormationNotFound,

    /// No grade row survived stitching and tag filtering.
    #[error("No grade table found in {0}")]
    EmptyResult(String),

    /// A field rule pattern failed to compile.
    #[error("Invalid field pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error during rendering (CSV, JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::FormationNotFound;
        assert_eq!(err.to_string(), "Formation label not found on the first page");

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );

        let err = Error::SourceNotFound(PathBuf::from("missing.pdf"));
        assert_eq!(err.to_string(), "Source not found: missing.pdf");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_regex_error_conversion() {
        let err: Error = regex::Regex::new("(unclosed").unwrap_err().into();
        assert!(matches!(err, Error::InvalidPattern(_)));
    }
}
