//! The per-document transcript record.

use serde::{Deserialize, Serialize};

use super::{BirthInfo, GradeRow, Identity};

/// Everything extracted from one transcript document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptRecord {
    /// Student identity from page one
    pub identity: Identity,

    /// Birth date and place from page one
    pub birth: BirthInfo,

    /// Formation (degree programme) label, empty when not found
    pub formation: String,

    /// Grade rows in encounter order
    pub grades: Vec<GradeRow>,
}

impl TranscriptRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of grade rows.
    pub fn grade_count(&self) -> usize {
        self.grades.len()
    }

    /// Check if the record carries no grade rows.
    pub fn is_empty(&self) -> bool {
        self.grades.is_empty()
    }

    /// Get the six metadata values in export order.
    pub fn metadata_values(&self) -> [&str; 6] {
        [
            self.identity.name.as_str(),
            self.identity.student_id.as_str(),
            self.identity.national_id.as_str(),
            self.birth.date.as_str(),
            self.birth.place.as_str(),
            &self.formation,
        ]
    }
}
