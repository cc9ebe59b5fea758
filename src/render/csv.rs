//! CSV rendering of a transcript record.
//!
//! Layout, one record per file:
//!
//! ```text
//! Nom et Prénom;N° Étudiant;INE;Date de naissance;Lieu de naissance;Formation
//! <metadata values>
//!
//! Matière;Note/Barème;Résultat;Session;Crédits
//! <one line per grade row>
//! ```

use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};
use crate::extract::stitch::GRADE_HEADER;
use crate::model::TranscriptRecord;

use super::file::write_atomic;

/// Column titles of the metadata row, in export order.
pub const METADATA_HEADER: [&str; 6] = [
    "Nom et Prénom",
    "N° Étudiant",
    "INE",
    "Date de naissance",
    "Lieu de naissance",
    "Formation",
];

const BOM: &[u8] = "\u{feff}".as_bytes();

/// CSV output options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    /// Field delimiter
    pub delimiter: u8,
    /// Prefix the file with a UTF-8 byte order mark (spreadsheet friendly)
    pub bom: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b';',
            bom: true,
        }
    }
}

/// Write a record as CSV to any writer.
///
/// The metadata block and the grade table go through separate csv writers so
/// that the separator between them is a bare line terminator.
pub fn write_csv<W: Write>(record: &TranscriptRecord, mut out: W, options: CsvOptions) -> Result<()> {
    if options.bom {
        out.write_all(BOM)?;
    }

    let mut builder = ::csv::WriterBuilder::new();
    builder
        .delimiter(options.delimiter)
        .terminator(::csv::Terminator::CRLF)
        .flexible(true);

    {
        let mut writer = builder.from_writer(&mut out);
        writer.write_record(METADATA_HEADER)?;
        writer.write_record(record.metadata_values())?;
        writer.flush()?;
    }
    out.write_all(b"\r\n")?;

    let mut writer = builder.from_writer(&mut out);
    writer.write_record(GRADE_HEADER)?;
    for row in &record.grades {
        writer.write_record(row.columns())?;
    }
    writer.flush()?;
    Ok(())
}

/// Render a record to a CSV string (without BOM).
pub fn to_csv_string(record: &TranscriptRecord, delimiter: u8) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(
        record,
        &mut buf,
        CsvOptions {
            delimiter,
            bom: false,
        },
    )?;
    String::from_utf8(buf).map_err(|e| Error::Render(format!("CSV is not UTF-8: {}", e)))
}

/// Write a record as CSV to `path`, replacing any existing file.
///
/// The file is written under a temporary name and renamed into place.
pub fn write_csv_file<P: AsRef<Path>>(
    record: &TranscriptRecord,
    path: P,
    options: CsvOptions,
) -> Result<()> {
    let path = path.as_ref();
    write_atomic(path, |out| write_csv(record, out, options))?;
    log::info!("CSV written: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Field, GradeRow};

    fn record() -> TranscriptRecord {
        let mut record = TranscriptRecord::new();
        record.identity.name = Field::known("Jane Doe");
        record.identity.student_id = Field::known("12345");
        record.identity.national_id = Field::known("AB123");
        record.birth.date = Field::known("1 janvier 2000");
        record.formation = "Licence Mathématiques".to_string();
        record.grades = vec![
            GradeRow::new("UE1 Algebra", "15/20", "Validé", "S1", "6"),
            GradeRow::new("UE2 Analyse; partie 1", "N/A", "", "", ""),
        ];
        record
    }

    #[test]
    fn test_csv_layout() {
        let csv = to_csv_string(&record(), b';').unwrap();
        let lines: Vec<&str> = csv.split("\r\n").collect();

        assert_eq!(
            lines[0],
            "Nom et Prénom;N° Étudiant;INE;Date de naissance;Lieu de naissance;Formation"
        );
        assert_eq!(
            lines[1],
            "Jane Doe;12345;AB123;1 janvier 2000;Inconnu;Licence Mathématiques"
        );
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "Matière;Note/Barème;Résultat;Session;Crédits");
        assert_eq!(lines[4], "UE1 Algebra;15/20;Validé;S1;6");
        assert_eq!(lines[5], "\"UE2 Analyse; partie 1\";N/A;;;");
        assert_eq!(lines[6], "");
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn test_bom_prefix() {
        let mut buf = Vec::new();
        write_csv(&record(), &mut buf, CsvOptions::default()).unwrap();
        assert!(buf.starts_with(&[0xEF, 0xBB, 0xBF]));

        let mut buf = Vec::new();
        let options = CsvOptions {
            bom: false,
            ..Default::default()
        };
        write_csv(&record(), &mut buf, options).unwrap();
        assert!(buf.starts_with(b"Nom"));
    }

    #[test]
    fn test_separator_line_is_bare() {
        let mut record = record();
        record.grades.clear();
        let csv = to_csv_string(&record, b';').unwrap();
        assert!(csv.contains("Licence Mathématiques\r\n\r\nMatière;"));
        assert!(!csv.contains("\"\""));
        assert!(csv.ends_with("Crédits\r\n"));
    }

    #[test]
    fn test_custom_delimiter() {
        let csv = to_csv_string(&record(), b',').unwrap();
        assert!(csv.contains("UE1 Algebra,15/20,Validé,S1,6"));
    }

    #[test]
    fn test_write_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_csv_file(&record(), &path, CsvOptions::default()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with('\u{feff}'));
        assert!(content.contains("Jane Doe"));
    }

    #[test]
    fn test_write_csv_file_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "x".repeat(4096)).unwrap();

        write_csv_file(&record(), &path, CsvOptions::default()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains('x'));
        assert!(content.ends_with(";N/A;;;\r\n"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
