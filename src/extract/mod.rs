//! Heuristic extraction core.
//!
//! Everything in this module is pure and synchronous: it reads page text
//! and table fragments and returns values. Reading PDFs and writing output
//! files happen in [`source`](crate::source), [`render`](crate::render) and
//! [`split`](crate::split).

mod fields;
mod formation;
mod record;
pub mod rules;
mod segment;
pub mod stitch;

pub use fields::{FieldMatcher, MatchedFields};
pub use formation::FormationLocator;
pub use record::{RecordBuilder, RecordOutcome};
pub use rules::{AnchoredLineRule, FieldRule, FieldTarget, PatternRule, RuleCatalogue};
pub use segment::{DocumentSegmenter, SegmentState};
pub use stitch::{FragmentKind, HeaderColumns, StitchState, TableStitcher};
