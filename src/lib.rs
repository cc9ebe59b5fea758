//! # gradesheet
//!
//! Heuristic extraction of student transcripts ("relevés de notes") from PDF.
//!
//! A transcript is read into one [`TranscriptRecord`]: identity and birth
//! metadata from page one, the formation label, and every grade row of the
//! document's grade table, stitched across page breaks and filtered by
//! subject tag. Multi-student documents can be cut into per-student
//! [`Segment`]s and written back as separate PDFs.
//!
//! ## Quick Start
//!
//! ```no_run
//! use gradesheet::{extract_file, render};
//!
//! fn main() -> gradesheet::Result<()> {
//!     let record = extract_file("releve.pdf")?;
//!     println!("{} grade rows for {}", record.grade_count(), record.identity.name);
//!
//!     let csv = render::to_csv_string(&record, b';')?;
//!     println!("{}", csv);
//!     Ok(())
//! }
//! ```
//!
//! ## Layers
//!
//! - [`extract`]: pure, synchronous matching over page text and table fragments
//! - [`source`]: page text and table fragments from PDF (lopdf) or memory
//! - [`render`]: CSV and JSON output
//! - [`split`]: per-student and per-page PDF sub-documents
//! - [`batch`]: parallel processing of many documents

pub mod batch;
pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod options;
pub mod render;
pub mod source;
pub mod split;

// Re-export commonly used types
pub use batch::{process_document, run_batch, BatchEvent};
pub use detect::{collect_inputs, detect_format_from_bytes, detect_format_from_path, PdfFormat};
pub use error::{Error, Result};
pub use extract::{
    DocumentSegmenter, FieldMatcher, FieldRule, FormationLocator, RecordBuilder, RecordOutcome,
    RuleCatalogue, TableStitcher,
};
pub use model::{
    BirthInfo, Field, GradeRow, Identity, PageRange, PageText, Segment, SubjectTagSet,
    TableFragment, TranscriptRecord,
};
pub use options::{ExtractOptions, OutputFormat};
pub use render::{CsvOptions, JsonFormat};
pub use source::{MemorySource, PageSource, PdfSource};

use std::path::Path;

use source::TableDetector;

fn record_from(source: PdfSource, options: &ExtractOptions, name: &str) -> Result<TranscriptRecord> {
    let source = source.with_detector(TableDetector::with_config(options.detector_config()));
    RecordBuilder::new(options.tags.clone()).build_from(&source, name)
}

/// Extract the transcript record of a PDF file.
///
/// Fails with [`Error::EmptyResult`] when no grade row survives filtering.
///
/// # Example
///
/// ```no_run
/// use gradesheet::extract_file;
///
/// let record = extract_file("releve.pdf").unwrap();
/// for row in &record.grades {
///     println!("{}: {}", row.subject, row.score);
/// }
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<TranscriptRecord> {
    extract_file_with_options(path, &ExtractOptions::default())
}

/// Extract the transcript record of a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use gradesheet::{extract_file_with_options, ExtractOptions, SubjectTagSet};
///
/// let options = ExtractOptions::new().with_tags(SubjectTagSet::parse("UE,OPTIONS"));
/// let record = extract_file_with_options("releve.pdf", &options).unwrap();
/// ```
pub fn extract_file_with_options<P: AsRef<Path>>(
    path: P,
    options: &ExtractOptions,
) -> Result<TranscriptRecord> {
    let path = path.as_ref();
    record_from(PdfSource::open(path)?, options, &path.display().to_string())
}

/// Extract the transcript record of a PDF held in memory.
pub fn extract_bytes(data: &[u8]) -> Result<TranscriptRecord> {
    record_from(PdfSource::from_bytes(data)?, &ExtractOptions::default(), "<memory>")
}

/// Split a multi-student PDF into per-student page segments.
///
/// Page 0 is treated as a cover sheet.
///
/// # Example
///
/// ```no_run
/// use gradesheet::segment_file;
///
/// for segment in segment_file("promotion.pdf").unwrap() {
///     println!("{} pages {}-{}", segment.identity.name, segment.pages.first, segment.pages.last);
/// }
/// ```
pub fn segment_file<P: AsRef<Path>>(path: P) -> Result<Vec<Segment>> {
    segment_file_with_options(path, &ExtractOptions::default())
}

/// Split a multi-student PDF into segments with custom options.
pub fn segment_file_with_options<P: AsRef<Path>>(
    path: P,
    options: &ExtractOptions,
) -> Result<Vec<Segment>> {
    let source = PdfSource::open(path)?;
    DocumentSegmenter::new()
        .with_skip_cover(options.skip_cover)
        .segment_source(&source)
}
