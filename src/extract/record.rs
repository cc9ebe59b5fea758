//! Transcript record assembly.

use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::model::{PageText, SubjectTagSet, TableFragment, TranscriptRecord};
use crate::source::PageSource;

use super::{FieldMatcher, FormationLocator, TableStitcher};

/// Builds one [`TranscriptRecord`] per document.
///
/// Metadata and formation come from page one, grade rows from every page.
/// A missing formation label only empties the label; a document without
/// grade rows is rejected with [`Error::EmptyResult`].
#[derive(Debug, Default)]
pub struct RecordBuilder {
    matcher: FieldMatcher,
    locator: FormationLocator,
    stitcher: TableStitcher,
}

impl RecordBuilder {
    /// Create a builder with the standard rules and the given subject tags.
    pub fn new(tags: SubjectTagSet) -> Self {
        Self {
            matcher: FieldMatcher::new(),
            locator: FormationLocator::new(),
            stitcher: TableStitcher::new(tags),
        }
    }

    /// Replace the field matcher (custom rule catalogue).
    pub fn with_matcher(mut self, matcher: FieldMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Get the field matcher.
    pub fn matcher(&self) -> &FieldMatcher {
        &self.matcher
    }

    /// Build a record from decoded pages.
    ///
    /// `tables[i]` holds the fragments of page `i`; `name` only labels the
    /// empty-result error.
    pub fn build(
        &self,
        pages: &[PageText],
        tables: &[Vec<TableFragment>],
        name: &str,
    ) -> Result<TranscriptRecord> {
        let first_page = pages.first().cloned().unwrap_or_default();

        let fields = self.matcher.match_page(&first_page);
        log::info!(
            "Metadata '{}': name={}, student_id={}, national_id={}, birth_date={}, birth_place={}",
            name,
            fields.identity.name,
            fields.identity.student_id,
            fields.identity.national_id,
            fields.birth.date,
            fields.birth.place
        );

        let formation = match self.locator.locate(&first_page) {
            Ok(label) => {
                log::info!("Formation detected: {}", label);
                label
            }
            Err(e) => {
                log::warn!("{}: {}", name, e);
                String::new()
            }
        };

        let grades = self.stitcher.stitch(tables.iter().map(Vec::as_slice));
        if grades.is_empty() {
            return Err(Error::EmptyResult(name.to_string()));
        }

        Ok(TranscriptRecord {
            identity: fields.identity,
            birth: fields.birth,
            formation,
            grades,
        })
    }

    /// Build a record by reading every page of `source`.
    pub fn build_from(&self, source: &dyn PageSource, name: &str) -> Result<TranscriptRecord> {
        let count = source.page_count();
        let mut pages = Vec::with_capacity(count.min(1));
        let mut tables = Vec::with_capacity(count);

        for index in 0..count {
            if index == 0 {
                pages.push(source.page_text(index)?);
            }
            tables.push(source.page_tables(index)?);
        }

        self.build(&pages, &tables, name)
    }
}

/// Outcome of processing one document, reported instead of raised.
#[derive(Debug)]
pub enum RecordOutcome {
    /// A record was extracted and written
    Exported {
        /// Source document
        source: PathBuf,
        /// Written file
        output: PathBuf,
        /// Number of grade rows
        rows: usize,
    },
    /// No grade rows survived filtering; nothing was written
    Empty {
        /// Source document
        source: PathBuf,
    },
    /// The document could not be processed
    Failed {
        /// Source document
        source: PathBuf,
        /// Why it failed
        error: Error,
    },
}

impl RecordOutcome {
    /// Classify the result of processing `source`.
    pub fn from_result(source: PathBuf, result: Result<(PathBuf, usize)>) -> Self {
        match result {
            Ok((output, rows)) => RecordOutcome::Exported {
                source,
                output,
                rows,
            },
            Err(Error::EmptyResult(_)) => RecordOutcome::Empty { source },
            Err(error) => RecordOutcome::Failed { source, error },
        }
    }

    /// Get the source document.
    pub fn source(&self) -> &PathBuf {
        match self {
            RecordOutcome::Exported { source, .. }
            | RecordOutcome::Empty { source }
            | RecordOutcome::Failed { source, .. } => source,
        }
    }

    /// Check if a file was written.
    pub fn is_exported(&self) -> bool {
        matches!(self, RecordOutcome::Exported { .. })
    }
}
