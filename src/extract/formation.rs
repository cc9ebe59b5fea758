//! Formation label lookup on the first page.

use regex::Regex;

use crate::error::{Error, Result};
use crate::model::PageText;

/// Finds the formation (degree programme) label.
///
/// The label is printed on its own line right above the student-number
/// line, possibly separated from it by blank lines.
#[derive(Debug, Clone)]
pub struct FormationLocator {
    anchor: Regex,
}

impl FormationLocator {
    /// Create a locator anchored on the student-number label.
    pub fn new() -> Self {
        Self {
            anchor: Regex::new(r"(?i)^N[°º]\s*[EÉ]tudiant").expect("built-in formation anchor"),
        }
    }

    /// Locate the label on `page`.
    ///
    /// Fails with [`Error::FormationNotFound`] when the anchor line is absent
    /// or has no non-blank line above it.
    pub fn locate(&self, page: &PageText) -> Result<String> {
        let lines = page.lines();
        let anchor = lines
            .iter()
            .position(|line| self.anchor.is_match(line.trim()))
            .ok_or(Error::FormationNotFound)?;

        lines[..anchor]
            .iter()
            .rev()
            .map(|line| line.trim())
            .find(|line| !line.is_empty())
            .map(str::to_string)
            .ok_or(Error::FormationNotFound)
    }
}

impl Default for FormationLocator {
    fn default() -> Self {
        Self::new()
    }
}
