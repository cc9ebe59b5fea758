//! Grade table stitching across page breaks.
//!
//! Table detectors work page by page: a grade table that spans three pages
//! comes back as three fragments, and only the first one carries the column
//! header. The stitcher remembers the last adopted header and treats later
//! header-less fragments as its continuation, as long as they start with a
//! subject row.

use crate::model::{GradeRow, SubjectTagSet, TableFragment};

/// Header label of the subject column.
pub const SUBJECT_LABEL: &str = "Matière";
/// Header label of the score column; its presence marks a header row.
pub const SCORE_LABEL: &str = "Note/Barème";
/// Header label of the result column.
pub const RESULT_LABEL: &str = "Résultat";
/// Header label of the session column.
pub const SESSION_LABEL: &str = "Session";
/// Header label of the credits column.
pub const CREDITS_LABEL: &str = "Crédits";

/// Column labels of the exported grade table.
pub const GRADE_HEADER: [&str; 5] = [
    SUBJECT_LABEL,
    SCORE_LABEL,
    RESULT_LABEL,
    SESSION_LABEL,
    CREDITS_LABEL,
];

/// Score written when the score cell is missing or empty.
pub const MISSING_SCORE: &str = "N/A";

/// Column positions resolved from an adopted header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderColumns {
    score: usize,
    result: Option<usize>,
    session: Option<usize>,
    credits: Option<usize>,
}

impl HeaderColumns {
    /// Resolve column positions from a header candidate.
    ///
    /// Returns `None` unless the row holds the score label.
    pub fn from_header(cells: &[String]) -> Option<Self> {
        let find = |label: &str| cells.iter().position(|c| c == label);
        Some(Self {
            score: find(SCORE_LABEL)?,
            result: find(RESULT_LABEL),
            session: find(SESSION_LABEL),
            credits: find(CREDITS_LABEL),
        })
    }

    fn read(&self, row: &[Option<String>], subject: String) -> GradeRow {
        let cell = |index: Option<usize>| {
            index
                .and_then(|i| row.get(i))
                .and_then(|c| c.as_deref())
                .map(str::trim)
                .filter(|c| !c.is_empty())
        };

        GradeRow {
            subject,
            score: cell(Some(self.score)).unwrap_or(MISSING_SCORE).to_string(),
            result: cell(self.result).unwrap_or_default().to_string(),
            session: cell(self.session).unwrap_or_default().to_string(),
            credits: cell(self.credits).unwrap_or_default().to_string(),
        }
    }
}

/// How a fragment was interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    /// Row 0 was a header; rows 1.. are data
    Header,
    /// All rows are data under the previous header
    Continuation,
    /// The fragment was ignored
    Skipped,
}

/// Accumulator carried from one fragment to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StitchState {
    header: Option<HeaderColumns>,
}

impl StitchState {
    /// Get the current header, if one was adopted.
    pub fn header(&self) -> Option<HeaderColumns> {
        self.header
    }

    /// Consume one fragment.
    ///
    /// Returns the new state and the accepted rows of this fragment.
    pub fn step(self, fragment: &TableFragment, tags: &SubjectTagSet) -> (Self, Vec<GradeRow>) {
        let (state, kind) = self.classify(fragment, tags);

        let data_rows = match kind {
            FragmentKind::Header => &fragment.rows()[1..],
            FragmentKind::Continuation => fragment.rows(),
            FragmentKind::Skipped => {
                log::debug!(
                    "Skipping table fragment ({} rows): no header and no subject row",
                    fragment.row_count()
                );
                return (state, Vec::new());
            }
        };

        let Some(columns) = state.header else {
            return (state, Vec::new());
        };

        let rows = data_rows
            .iter()
            .filter_map(|row| {
                let subject = normalize_subject(row.first()?.as_deref()?);
                if subject.is_empty() || !tags.matches(&subject) {
                    return None;
                }
                Some(columns.read(row, subject))
            })
            .collect();

        (state, rows)
    }

    fn classify(self, fragment: &TableFragment, tags: &SubjectTagSet) -> (Self, FragmentKind) {
        let Some(first_row) = fragment.rows().first() else {
            return (self, FragmentKind::Skipped);
        };

        let header: Vec<String> = first_row
            .iter()
            .map(|c| c.as_deref().unwrap_or_default().trim().to_string())
            .collect();

        if let Some(columns) = HeaderColumns::from_header(&header) {
            return (
                Self {
                    header: Some(columns),
                },
                FragmentKind::Header,
            );
        }

        let starts_with_subject = fragment.cell(0, 0).map(|c| tags.matches(c)).unwrap_or(false);
        if self.header.is_some() && starts_with_subject {
            (self, FragmentKind::Continuation)
        } else {
            (self, FragmentKind::Skipped)
        }
    }
}

/// Join the lines of a subject cell with single spaces.
fn normalize_subject(cell: &str) -> String {
    cell.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Merges per-page table fragments into one grade row sequence.
#[derive(Debug, Clone, Default)]
pub struct TableStitcher {
    tags: SubjectTagSet,
}

impl TableStitcher {
    /// Create a stitcher filtering on `tags`.
    pub fn new(tags: SubjectTagSet) -> Self {
        Self { tags }
    }

    /// Get the subject tags.
    pub fn tags(&self) -> &SubjectTagSet {
        &self.tags
    }

    /// Stitch fragments given page by page, in page order.
    pub fn stitch<'a, P>(&self, pages: P) -> Vec<GradeRow>
    where
        P: IntoIterator<Item = &'a [TableFragment]>,
    {
        self.stitch_fragments(pages.into_iter().flatten())
    }

    /// Stitch a flat sequence of fragments already in page order.
    pub fn stitch_fragments<'a, I>(&self, fragments: I) -> Vec<GradeRow>
    where
        I: IntoIterator<Item = &'a TableFragment>,
    {
        let (_, rows) = fragments.into_iter().fold(
            (StitchState::default(), Vec::new()),
            |(state, mut rows), fragment| {
                let (state, accepted) = state.step(fragment, &self.tags);
                rows.extend(accepted);
                (state, rows)
            },
        );
        rows
    }
}
