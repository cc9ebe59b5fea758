//! Grade rows and the subject tag catalogue.

use serde::{Deserialize, Serialize};

/// Subject-code families accepted by default.
pub const DEFAULT_SUBJECT_TAGS: [&str; 6] = ["UE", "JR", "JS", "WR", "WS", "OPTIONS"];

/// One line of the grade table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeRow {
    /// Subject label, always containing a subject tag
    pub subject: String,

    /// Score, e.g. "15/20" ("N/A" when the cell is missing)
    pub score: String,

    /// Result, e.g. "Validé"
    pub result: String,

    /// Session label
    pub session: String,

    /// ECTS credits
    pub credits: String,
}

impl GradeRow {
    /// Create a grade row from its five columns.
    pub fn new(
        subject: impl Into<String>,
        score: impl Into<String>,
        result: impl Into<String>,
        session: impl Into<String>,
        credits: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            score: score.into(),
            result: result.into(),
            session: session.into(),
            credits: credits.into(),
        }
    }

    /// Get the columns in export order.
    pub fn columns(&self) -> [&str; 5] {
        [
            &self.subject,
            &self.score,
            &self.result,
            &self.session,
            &self.credits,
        ]
    }
}

/// Ordered, case-sensitive substrings that mark an eligible subject.
///
/// Used both to accept grade rows and to recognize continuation fragments
/// of a table split across pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectTagSet {
    tags: Vec<String>,
}

impl SubjectTagSet {
    /// Create a tag set from custom tags. Blank tags are ignored.
    pub fn new<S: Into<String>>(tags: impl IntoIterator<Item = S>) -> Self {
        Self {
            tags: tags
                .into_iter()
                .map(Into::into)
                .filter(|t: &String| !t.trim().is_empty())
                .collect(),
        }
    }

    /// Parse a comma-separated tag list ("UE,JR,OPTIONS").
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(',').map(|t| t.trim().to_string()))
    }

    /// Check whether any tag is a substring of `text`.
    pub fn matches(&self, text: &str) -> bool {
        self.tags.iter().any(|tag| text.contains(tag.as_str()))
    }

    /// Iterate over the tags in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    /// Get the number of tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Check if the set is empty (nothing would ever match).
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl Default for SubjectTagSet {
    fn default() -> Self {
        Self::new(DEFAULT_SUBJECT_TAGS)
    }
}
