//! JSON row exports: an array of flat objects.

use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::raw::{RawRow, RawValue};

/// Read a JSON array of row objects from a file.
pub fn read_json_rows(path: &Path) -> Result<Vec<RawRow>> {
    let text = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = rows_from_json_str(&text)?;
    debug!(path = %path.display(), rows = rows.len(), "read json rows");
    Ok(rows)
}

/// Parse a JSON array of row objects. Row indices are 1-based array positions.
pub fn rows_from_json_str(text: &str) -> Result<Vec<RawRow>> {
    let objects: Vec<Map<String, Value>> = serde_json::from_str(text)?;
    Ok(objects
        .into_iter()
        .enumerate()
        .map(|(position, object)| row_from_object(position + 1, object))
        .collect())
}

fn row_from_object(index: usize, object: Map<String, Value>) -> RawRow {
    let mut row = RawRow::new(index);
    for (column, value) in object {
        row.insert(&column, raw_value(value));
    }
    row
}

fn raw_value(value: Value) -> RawValue {
    match value {
        Value::Null => RawValue::Empty,
        Value::Bool(flag) => RawValue::Bool(flag),
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                RawValue::Integer(int)
            } else if let Some(float) = number.as_f64() {
                RawValue::Float(float)
            } else {
                RawValue::Text(number.to_string())
            }
        }
        Value::String(text) => RawValue::Text(text),
        // Lists become delimiter-joined cells so `images` arrays work.
        Value::Array(items) => RawValue::Text(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(text) => Some(text),
                    Value::Null => None,
                    other => Some(other.to_string()),
                })
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        Value::Object(_) => RawValue::Text(value.to_string()),
    }
}
