//! Extraction options and configuration.

use crate::model::SubjectTagSet;
use crate::render::{CsvOptions, JsonFormat};
use crate::source::TableDetectorConfig;

/// Options for extracting and exporting transcripts.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Subject tags a grade row's subject must contain
    pub tags: SubjectTagSet,

    /// Output format
    pub format: OutputFormat,

    /// CSV field delimiter
    pub delimiter: u8,

    /// Prefix CSV files with a UTF-8 BOM
    pub bom: bool,

    /// Treat page 0 as a cover sheet when segmenting
    pub skip_cover: bool,

    /// Process documents of a batch in parallel
    pub parallel: bool,

    /// Table detector column limit
    pub max_table_columns: usize,
}

impl ExtractOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the subject tags.
    pub fn with_tags(mut self, tags: SubjectTagSet) -> Self {
        self.tags = tags;
        self
    }

    /// Set the output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the CSV delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Enable or disable the CSV byte order mark.
    pub fn with_bom(mut self, bom: bool) -> Self {
        self.bom = bom;
        self
    }

    /// Set whether page 0 is a cover sheet.
    pub fn with_skip_cover(mut self, skip: bool) -> Self {
        self.skip_cover = skip;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the maximum number of columns a detected table may have.
    pub fn with_max_table_columns(mut self, columns: usize) -> Self {
        self.max_table_columns = columns;
        self
    }

    /// CSV writer options derived from these options.
    pub fn csv_options(&self) -> CsvOptions {
        CsvOptions {
            delimiter: self.delimiter,
            bom: self.bom,
        }
    }

    /// Table detector configuration derived from these options.
    pub fn detector_config(&self) -> TableDetectorConfig {
        TableDetectorConfig {
            max_columns: self.max_table_columns,
            ..Default::default()
        }
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            tags: SubjectTagSet::default(),
            format: OutputFormat::Csv,
            delimiter: b';',
            bom: true,
            skip_cover: true,
            parallel: true,
            max_table_columns: TableDetectorConfig::default().max_columns,
        }
    }
}

/// Output format of an extracted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Semicolon-separated CSV
    #[default]
    Csv,
    /// JSON document
    Json(JsonFormat),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_options_builder() {
        let options = ExtractOptions::new()
            .with_tags(SubjectTagSet::parse("UE, JS"))
            .with_delimiter(b',')
            .with_bom(false)
            .with_skip_cover(false)
            .with_max_table_columns(8)
            .sequential();

        assert_eq!(options.tags.len(), 2);
        assert_eq!(options.delimiter, b',');
        assert!(!options.skip_cover);
        assert!(!options.parallel);
        assert_eq!(options.detector_config().max_columns, 8);
        assert_eq!(
            options.csv_options(),
            CsvOptions {
                delimiter: b',',
                bom: false
            }
        );
    }

    #[test]
    fn test_defaults() {
        let options = ExtractOptions::default();
        assert_eq!(options.format, OutputFormat::Csv);
        assert_eq!(options.csv_options(), CsvOptions::default());
        assert!(options.skip_cover);
        assert!(options.parallel);
        assert_eq!(options.tags, SubjectTagSet::default());
    }
}
