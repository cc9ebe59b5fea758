//! Page sources: where page text and table fragments come from.
//!
//! The extraction core never touches PDF bytes. It reads pages through
//! [`PageSource`], which [`PdfSource`] implements with lopdf and
//! [`MemorySource`] implements over pre-decoded pages.

mod pdf;
pub mod spans;
pub mod table_detector;

pub use pdf::PdfSource;
pub use table_detector::{TableDetector, TableDetectorConfig};

use crate::error::{Error, Result};
use crate::model::{PageText, TableFragment};

/// Page-level access to a decoded document.
///
/// Page indices are zero-based.
pub trait PageSource {
    /// Get the number of pages.
    fn page_count(&self) -> usize;

    /// Get the text lines of a page, top to bottom.
    fn page_text(&self, index: usize) -> Result<PageText>;

    /// Get the table fragments of a page, top to bottom.
    fn page_tables(&self, index: usize) -> Result<Vec<TableFragment>>;
}

/// A page source over pages decoded elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pages: Vec<(PageText, Vec<TableFragment>)>,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page (builder style).
    pub fn with_page(mut self, text: PageText, tables: Vec<TableFragment>) -> Self {
        self.add_page(text, tables);
        self
    }

    /// Add a page.
    pub fn add_page(&mut self, text: PageText, tables: Vec<TableFragment>) {
        self.pages.push((text, tables));
    }

    fn page(&self, index: usize) -> Result<&(PageText, Vec<TableFragment>)> {
        self.pages
            .get(index)
            .ok_or(Error::PageOutOfRange(index, self.pages.len()))
    }
}

impl PageSource for MemorySource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<PageText> {
        Ok(self.page(index)?.0.clone())
    }

    fn page_tables(&self, index: usize) -> Result<Vec<TableFragment>> {
        Ok(self.page(index)?.1.clone())
    }
}
