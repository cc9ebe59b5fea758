//! Rendering of extracted records to CSV and JSON.

mod csv;
mod file;
mod json;
mod naming;

pub use self::csv::{to_csv_string, write_csv, write_csv_file, CsvOptions, METADATA_HEADER};
pub use json::{record_to_json, segments_to_json, write_json_file, JsonFormat};
pub use naming::{csv_file_name, json_file_name, numbered_file_name};
