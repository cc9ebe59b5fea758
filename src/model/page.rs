//! Page text as seen by the extraction core.

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Ordered text lines of one page.
///
/// Lines are stored NFC-normalized so that accented anchors such as
/// `Née le` match regardless of how the PDF encoded the glyphs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    lines: Vec<String>,
}

impl PageText {
    /// Create page text from already split lines.
    pub fn new<S: AsRef<str>>(lines: impl IntoIterator<Item = S>) -> Self {
        Self {
            lines: lines
                .into_iter()
                .map(|l| l.as_ref().nfc().collect())
                .collect(),
        }
    }

    /// Create page text by splitting a block of text on line breaks.
    pub fn from_text(text: &str) -> Self {
        Self::new(text.lines())
    }

    /// Get the lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Get the number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the page has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl From<Vec<String>> for PageText {
    fn from(lines: Vec<String>) -> Self {
        Self::new(lines)
    }
}
