use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::raw::{RawRow, RawValue};

const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Pick the delimiter that occurs most often in the header line.
///
/// Quoted sections are skipped. Falls back to `,` when nothing matches.
pub fn detect_delimiter(text: &str) -> u8 {
    let header = text.lines().find(|line| !line.trim().is_empty()).unwrap_or("");
    let mut counts = [0usize; CANDIDATE_DELIMITERS.len()];
    let mut in_quotes = false;
    for byte in header.bytes() {
        if byte == b'"' {
            in_quotes = !in_quotes;
            continue;
        }
        if in_quotes {
            continue;
        }
        if let Some(pos) = CANDIDATE_DELIMITERS.iter().position(|d| *d == byte) {
            counts[pos] += 1;
        }
    }
    let mut best = (b',', 0usize);
    for (delimiter, count) in CANDIDATE_DELIMITERS.iter().zip(counts) {
        if count > best.1 {
            best = (*delimiter, count);
        }
    }
    best.0
}

/// Read a CSV export into raw rows.
pub fn read_csv_rows(path: &Path) -> Result<Vec<RawRow>> {
    let text = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = parse_csv_rows(&text)?;
    debug!(path = %path.display(), rows = rows.len(), "read csv rows");
    Ok(rows)
}

/// Parse CSV text, detecting the delimiter from the header line.
pub fn parse_csv_rows(text: &str) -> Result<Vec<RawRow>> {
    read_csv_rows_from_reader(text.as_bytes(), detect_delimiter(text))
}

/// Read CSV rows with a known delimiter.
///
/// The first non-blank record is the header. Fully blank data rows are
/// skipped but still count toward row numbering, so indices match the sheet.
pub fn read_csv_rows_from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Vec<RawRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(reader);

    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    let mut index = 0usize;
    for record in reader.records() {
        let record = record?;
        let cells: Vec<String> = record.iter().map(normalize_cell).collect();
        let blank = cells.iter().all(|cell| cell.is_empty());
        let Some(columns) = headers.as_ref() else {
            if !blank {
                headers = Some(cells);
            }
            continue;
        };
        index += 1;
        if blank {
            continue;
        }
        let mut row = RawRow::new(index);
        for (column, cell) in columns.iter().zip(cells) {
            let value = if cell.is_empty() {
                RawValue::Empty
            } else {
                RawValue::Text(cell)
            };
            row.insert(column, value);
        }
        rows.push(row);
    }

    if headers.is_none() {
        return Err(IngestError::NoHeaders);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("id;price;area\n1;2;3"), b';');
        assert_eq!(detect_delimiter("id,price\n"), b',');
        assert_eq!(detect_delimiter("id\tprice\tarea\n"), b'\t');
        assert_eq!(detect_delimiter("\"a;b\",c,d\n"), b',');
        assert_eq!(detect_delimiter(""), b',');
    }

    #[test]
    fn test_blank_rows_keep_numbering() {
        let text = "internal_id,price\nU1,100\n,\nU3,300\n";
        let rows = parse_csv_rows(text).expect("parse");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].index, 1);
        assert_eq!(rows[1].index, 3);
        assert_eq!(rows[1].text("internal_id").as_deref(), Some("U3"));
    }

    #[test]
    fn test_empty_input_has_no_headers() {
        assert!(matches!(parse_csv_rows(""), Err(IngestError::NoHeaders)));
    }
}
