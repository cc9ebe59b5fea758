//! lopdf-backed page source.

use std::path::Path;

use lopdf::{Document as LopdfDocument, ObjectId};

use crate::detect::detect_format_from_path;
use crate::error::{Error, Result};
use crate::model::{PageText, TableFragment};

use super::spans::{group_rows, page_ids, SpanExtractor, TextSpan};
use super::table_detector::TableDetector;
use super::PageSource;

/// Reads page text and tables from a PDF document.
///
/// Lines are rebuilt from positioned spans grouped by baseline. When a
/// page yields no spans (unusual content streams, Type3 fonts) its text falls
/// back to lopdf's plain extraction, and it has no tables.
pub struct PdfSource {
    doc: LopdfDocument,
    pages: Vec<ObjectId>,
    detector: TableDetector,
}

impl PdfSource {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        detect_format_from_path(path)?;

        let doc = LopdfDocument::load(path).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;
        Self::from_document(doc)
    }

    /// Load a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        Self::from_document(doc)
    }

    /// Wrap an already loaded document.
    pub fn from_document(doc: LopdfDocument) -> Result<Self> {
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        let pages = page_ids(&doc);
        log::debug!("Loaded PDF {} with {} pages", doc.version, pages.len());
        Ok(Self {
            doc,
            pages,
            detector: TableDetector::new(),
        })
    }

    /// Replace the table detector (builder style).
    pub fn with_detector(mut self, detector: TableDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Get the underlying lopdf document.
    pub fn document(&self) -> &LopdfDocument {
        &self.doc
    }

    /// Get the PDF version declared in the header.
    pub fn version(&self) -> &str {
        &self.doc.version
    }

    fn page_id(&self, index: usize) -> Result<ObjectId> {
        self.pages
            .get(index)
            .copied()
            .ok_or(Error::PageOutOfRange(index, self.pages.len()))
    }

    fn spans(&self, index: usize) -> Result<Vec<TextSpan>> {
        SpanExtractor::new(&self.doc).page_spans(self.page_id(index)?)
    }

    fn fallback_text(&self, index: usize) -> Result<PageText> {
        let text = self
            .doc
            .extract_text(&[index as u32 + 1])
            .map_err(|e| Error::PdfParse(format!("Page {}: {}", index + 1, e)))?;
        Ok(PageText::from_text(&text))
    }
}

impl PageSource for PdfSource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<PageText> {
        let spans = match self.spans(index) {
            Ok(spans) => spans,
            Err(Error::PageOutOfRange(i, n)) => return Err(Error::PageOutOfRange(i, n)),
            Err(e) => {
                log::debug!("Span extraction failed on page {}: {}", index + 1, e);
                Vec::new()
            }
        };

        if spans.is_empty() {
            return self.fallback_text(index);
        }

        let tolerance = self.detector.config().y_tolerance_factor;
        let lines: Vec<String> = group_rows(&spans, tolerance)
            .iter()
            .map(|row| row.text())
            .collect();
        Ok(PageText::new(lines))
    }

    fn page_tables(&self, index: usize) -> Result<Vec<TableFragment>> {
        let spans = match self.spans(index) {
            Ok(spans) => spans,
            Err(Error::PageOutOfRange(i, n)) => return Err(Error::PageOutOfRange(i, n)),
            Err(e) => {
                log::warn!("No tables read from page {}: {}", index + 1, e);
                return Ok(Vec::new());
            }
        };
        let tables = self.detector.detect(&spans);
        log::debug!("Page {}: {} table fragments", index + 1, tables.len());
        Ok(tables)
    }
}
