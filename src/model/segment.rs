//! Per-student page segments of a multi-student document.

use serde::{Deserialize, Serialize};

use super::Identity;

/// Inclusive range of 0-based page indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    /// First page index
    pub first: usize,
    /// Last page index (inclusive)
    pub last: usize,
}

impl PageRange {
    /// Create a range covering a single page.
    pub fn single(index: usize) -> Self {
        Self {
            first: index,
            last: index,
        }
    }

    /// Get the number of pages in the range.
    pub fn len(&self) -> usize {
        self.last - self.first + 1
    }

    /// A range always holds at least one page.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Check if a page index is inside the range.
    pub fn contains(&self, index: usize) -> bool {
        (self.first..=self.last).contains(&index)
    }

    /// Iterate over the page indices.
    pub fn indices(&self) -> impl Iterator<Item = usize> {
        self.first..=self.last
    }
}

/// A contiguous run of pages attributed to one student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Identity read from the first page of the segment
    pub identity: Identity,

    /// Pages covered by the segment
    pub pages: PageRange,
}

impl Segment {
    /// Suggested file stem for the segment's sub-document.
    ///
    /// `<base>_<name>_<national id>_<student id>`, with the name made
    /// file-system safe.
    pub fn label(&self, base: &str) -> String {
        format!(
            "{}_{}_{}_{}",
            base,
            sanitize_label(self.identity.name.as_str()),
            sanitize_label(self.identity.national_id.as_str()),
            sanitize_label(self.identity.student_id.as_str()),
        )
    }
}

/// Replace every character that is not an ASCII letter or digit by `_`.
pub fn sanitize_label(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Field;

    #[test]
    fn test_page_range() {
        let range = PageRange { first: 3, last: 5 };
        assert_eq!(range.len(), 3);
        assert!(range.contains(4));
        assert!(!range.contains(6));
        assert_eq!(range.indices().collect::<Vec<_>>(), vec![3, 4, 5]);
        assert_eq!(PageRange::single(7).len(), 1);
    }

    #[test]
    fn test_sanitize_label() {
        assert_eq!(sanitize_label("Jean-Éric DUPONT"), "Jean__ric_DUPONT");
        assert_eq!(sanitize_label("AB123"), "AB123");
    }

    #[test]
    fn test_segment_label() {
        let segment = Segment {
            identity: Identity {
                name: Field::known("Jane Doe"),
                student_id: Field::known("12345"),
                national_id: Field::known("AB123"),
            },
            pages: PageRange::single(1),
        };
        assert_eq!(segment.label("promo"), "promo_Jane_Doe_AB123_12345");
    }

    #[test]
    fn test_segment_label_unknown_fields() {
        let segment = Segment {
            identity: Identity::default(),
            pages: PageRange::single(1),
        };
        assert_eq!(segment.label("promo"), "promo_Inconnu_Inconnu_Inconnu");
    }
}
