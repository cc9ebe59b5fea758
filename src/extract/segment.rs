//! Per-student segmentation of a multi-student document.

use crate::error::Result;
use crate::model::{Identity, PageRange, PageText, Segment};
use crate::source::PageSource;

use super::FieldMatcher;

/// Accumulator carried from one page to the next.
///
/// Holds the open segment, if any. Its identity is the one read on the
/// segment's first page and is never updated by later pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentState {
    open: Option<Segment>,
}

impl SegmentState {
    /// Get the open segment.
    pub fn open_segment(&self) -> Option<&Segment> {
        self.open.as_ref()
    }

    /// Consume the identity read on page `index`.
    ///
    /// Returns the new state and the segment closed by this page, if the
    /// page starts a new student.
    pub fn step(self, index: usize, identity: Identity) -> (Self, Option<Segment>) {
        match self.open {
            Some(mut open) if open.identity.same_signature(&identity) => {
                open.pages.last = index;
                (Self { open: Some(open) }, None)
            }
            closed => {
                if let Some(ref segment) = closed {
                    log::debug!(
                        "Student boundary at page {}: {} -> {}",
                        index,
                        segment.identity.national_id,
                        identity.national_id
                    );
                }
                let open = Segment {
                    identity,
                    pages: PageRange::single(index),
                };
                (Self { open: Some(open) }, closed)
            }
        }
    }

    /// Close the open segment at the end of the page stream.
    pub fn finish(self) -> Option<Segment> {
        self.open
    }
}

/// Splits a page stream into contiguous per-student segments.
///
/// Pages are grouped by national id. A page whose national id cannot be
/// read keeps the signature "unknown", which equals any other unknown: a run
/// of unreadable pages stays in one segment instead of splitting on every
/// page. A signature seen again after an interruption opens a new segment.
#[derive(Debug)]
pub struct DocumentSegmenter {
    matcher: FieldMatcher,
    skip_cover: bool,
}

impl DocumentSegmenter {
    /// Create a segmenter that skips the cover page.
    pub fn new() -> Self {
        Self {
            matcher: FieldMatcher::new(),
            skip_cover: true,
        }
    }

    /// Set whether page 0 is a cover sheet to ignore.
    pub fn with_skip_cover(mut self, skip: bool) -> Self {
        self.skip_cover = skip;
        self
    }

    /// Replace the field matcher (custom rule catalogue).
    pub fn with_matcher(mut self, matcher: FieldMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    fn first_page(&self) -> usize {
        usize::from(self.skip_cover)
    }

    /// Segment decoded pages (index 0 is the first page of the document).
    pub fn segment(&self, pages: &[PageText]) -> Vec<Segment> {
        let identities = pages
            .iter()
            .enumerate()
            .skip(self.first_page())
            .map(|(index, page)| (index, self.matcher.identity(page)));
        collect_segments(identities)
    }

    /// Segment a document by reading page text from `source`.
    pub fn segment_source(&self, source: &dyn PageSource) -> Result<Vec<Segment>> {
        let identities = (self.first_page()..source.page_count())
            .map(|index| Ok((index, self.matcher.identity(&source.page_text(index)?))))
            .collect::<Result<Vec<_>>>()?;
        Ok(collect_segments(identities))
    }
}

impl Default for DocumentSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

fn collect_segments(identities: impl IntoIterator<Item = (usize, Identity)>) -> Vec<Segment> {
    let (state, mut segments) = identities.into_iter().fold(
        (SegmentState::default(), Vec::new()),
        |(state, mut segments), (index, identity)| {
            let (state, closed) = state.step(index, identity);
            segments.extend(closed);
            (state, segments)
        },
    );
    segments.extend(state.finish());
    log::info!("Detected {} student segments", segments.len());
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Field;

    fn student_page(name: &str, ine: &str) -> PageText {
        PageText::new([
            "Session unique".to_string(),
            name.to_string(),
            format!("INE: {}", ine),
        ])
    }

    fn cover() -> PageText {
        PageText::new(["Relevés de notes", "Promotion 2024"])
    }

    #[test]
    fn test_single_student() {
        let pages = vec![
            cover(),
            student_page("Jane Doe", "A1"),
            student_page("Jane Doe", "A1"),
            student_page("Jane Doe", "A1"),
        ];
        let segments = DocumentSegmenter::new().segment(&pages);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].pages, PageRange { first: 1, last: 3 });
    }

    #[test]
    fn test_repeated_signature_after_interruption() {
        let pages = vec![
            cover(),
            student_page("Ann", "A1"),
            student_page("Ann", "A1"),
            student_page("Bob", "B2"),
            student_page("Bob", "B2"),
            student_page("Bob", "B2"),
            student_page("Ann", "A1"),
        ];
        let segments = DocumentSegmenter::new().segment(&pages);
        let ranges: Vec<_> = segments.iter().map(|s| (s.pages.first, s.pages.last)).collect();
        assert_eq!(ranges, vec![(1, 2), (3, 5), (6, 6)]);
        assert_eq!(segments[1].identity.national_id, Field::known("B2"));
    }

    #[test]
    fn test_snapshot_from_first_page() {
        let pages = vec![
            cover(),
            student_page("Ann", "A1"),
            student_page("Ann Marie", "A1"),
        ];
        let segments = DocumentSegmenter::new().segment(&pages);
        assert_eq!(segments[0].identity.name, Field::known("Ann"));
    }

    #[test]
    fn test_unknown_pages_stay_together() {
        let pages = vec![cover(), PageText::new(["blank"]), PageText::new(["scan"])];
        let segments = DocumentSegmenter::new().segment(&pages);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].pages.len(), 2);
        assert_eq!(segments[0].identity.national_id, Field::Unknown);
    }

    #[test]
    fn test_cover_only() {
        assert!(DocumentSegmenter::new().segment(&[cover()]).is_empty());
        assert!(DocumentSegmenter::new().segment(&[]).is_empty());
    }

    #[test]
    fn test_keep_cover() {
        let pages = vec![student_page("Ann", "A1"), student_page("Ann", "A1")];
        let segments = DocumentSegmenter::new().with_skip_cover(false).segment(&pages);
        assert_eq!(segments[0].pages, PageRange { first: 0, last: 1 });
    }

    #[test]
    fn test_step_emits_on_boundary() {
        let a = Identity {
            national_id: Field::known("A"),
            ..Default::default()
        };
        let b = Identity {
            national_id: Field::known("B"),
            ..Default::default()
        };

        let state = SegmentState::default();
        let (state, closed) = state.step(1, a.clone());
        assert!(closed.is_none());
        let (state, closed) = state.step(2, a);
        assert!(closed.is_none());
        assert_eq!(state.open_segment().unwrap().pages.last, 2);

        let (state, closed) = state.step(3, b);
        assert_eq!(closed.unwrap().pages, PageRange { first: 1, last: 2 });
        assert_eq!(state.finish().unwrap().pages, PageRange::single(3));
    }
}
