//! Row ingestion for the realty feed: readers for CSV and JSON exports and
//! the record normalizer.

pub mod csv_table;
pub mod error;
pub mod json_rows;
pub mod normalize;
pub mod raw;

use std::path::Path;

pub use csv_table::{detect_delimiter, parse_csv_rows, read_csv_rows, read_csv_rows_from_reader};
pub use error::{IngestError, Result};
pub use json_rows::{read_json_rows, rows_from_json_str};
pub use normalize::{NormalizedBatch, normalize, normalize_rows};
pub use raw::{RawRow, RawValue, canonical_column};

/// Read rows from a CSV or JSON export, chosen by file extension.
pub fn read_rows(path: &Path) -> Result<Vec<RawRow>> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "csv" | "tsv" | "txt" => read_csv_rows(path),
        "json" => read_json_rows(path),
        other => Err(IngestError::UnsupportedFormat(if other.is_empty() {
            path.display().to_string()
        } else {
            other.to_string()
        })),
    }
}
