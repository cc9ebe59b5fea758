//! Transcript model types.
//!
//! Pages and table fragments come in from the decoding collaborator;
//! identities, grade rows, records and segments go out to the writers.

mod grade;
mod identity;
mod page;
mod record;
mod segment;
mod table;

pub use grade::{GradeRow, SubjectTagSet, DEFAULT_SUBJECT_TAGS};
pub use identity::{BirthInfo, Field, Identity, UNKNOWN_SENTINEL};
pub use page::PageText;
pub use record::TranscriptRecord;
pub use segment::{sanitize_label, PageRange, Segment};
pub use table::TableFragment;
