//! Page-local table fragments.

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// A grid of cells detected on one page.
///
/// Rows may have different lengths and cells may be absent (`None`): table
/// detectors regularly drop trailing columns or leave merged cells empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableFragment {
    rows: Vec<Vec<Option<String>>>,
}

impl TableFragment {
    /// Create an empty fragment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fragment from raw optional cells.
    pub fn from_cells(rows: Vec<Vec<Option<String>>>) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| cell.map(|c| c.nfc().collect()))
                    .collect()
            })
            .collect();
        Self { rows }
    }

    /// Create a fragment where every cell is present.
    pub fn from_strings<R, S>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_cells(
            rows.into_iter()
                .map(|row| row.into_iter().map(|c| Some(c.into())).collect())
                .collect(),
        )
    }

    /// Add a row of cells.
    pub fn add_row(&mut self, row: Vec<Option<String>>) {
        self.rows.push(row.into_iter().map(|c| c.map(|c| c.nfc().collect())).collect());
    }

    /// Get all rows.
    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    /// Get a cell's text, `None` when the row or cell is absent.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .and_then(|c| c.as_deref())
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (based on first row).
    pub fn column_count(&self) -> usize {
        self.rows.first().map(|r| r.len()).unwrap_or(0)
    }

    /// Check if the fragment is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
