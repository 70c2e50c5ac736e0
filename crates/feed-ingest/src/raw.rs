//! Untyped input rows, as handed over by the sheet reader.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::normalize::text::is_missing;

/// A raw cell value of unknown cleanliness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Empty,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl RawValue {
    /// Render the cell as text, or `None` when it is absent or a missing sentinel.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        let text: Cow<'_, str> = match self {
            RawValue::Empty => return None,
            RawValue::Bool(value) => Cow::Owned(value.to_string()),
            RawValue::Integer(value) => Cow::Owned(value.to_string()),
            RawValue::Float(value) => {
                if !value.is_finite() {
                    return None;
                }
                Cow::Owned(format_float(*value))
            }
            RawValue::Text(value) => Cow::Borrowed(value.as_str()),
        };
        if is_missing(&text) { None } else { Some(text) }
    }

    /// Raw text used when reporting a coercion failure.
    pub fn display(&self) -> String {
        match self {
            RawValue::Empty => String::new(),
            RawValue::Bool(value) => value.to_string(),
            RawValue::Integer(value) => value.to_string(),
            RawValue::Float(value) => format_float(*value),
            RawValue::Text(value) => value.clone(),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Integer(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Float(value)
    }
}

/// Integral floats render without a fractional part (`12.0` → `12`).
fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// One source row: canonical column name → raw value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    /// 1-based data row number (header excluded).
    pub index: usize,
    pub fields: BTreeMap<String, RawValue>,
}

impl RawRow {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            fields: BTreeMap::new(),
        }
    }

    /// Build a row from `(column, value)` pairs; column names are canonicalized.
    pub fn from_pairs<K, V, I>(index: usize, pairs: I) -> Self
    where
        K: AsRef<str>,
        V: Into<RawValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut row = Self::new(index);
        for (key, value) in pairs {
            row.insert(key.as_ref(), value.into());
        }
        row
    }

    /// Insert a cell under its canonical column name.
    ///
    /// When two source columns map to the same canonical name (an alias and
    /// the canonical column), the first present value is kept.
    pub fn insert(&mut self, column: &str, value: RawValue) {
        let key = canonical_column(column);
        if key.is_empty() {
            return;
        }
        let keep_existing = self
            .fields
            .get(&key)
            .is_some_and(|existing| existing.as_text().is_some());
        if !keep_existing {
            self.fields.insert(key, value);
        }
    }

    pub fn get(&self, column: &str) -> Option<&RawValue> {
        self.fields.get(column)
    }

    /// Cell text for a canonical column, with missing sentinels filtered out.
    pub fn text(&self, column: &str) -> Option<Cow<'_, str>> {
        self.get(column).and_then(RawValue::as_text)
    }

    pub fn is_blank(&self) -> bool {
        self.fields.values().all(|value| value.as_text().is_none())
    }
}

/// Normalize a header to its canonical column name.
///
/// Trims, strips a BOM, lowercases and turns runs of spaces or hyphens into
/// `_`, then resolves aliases used by partner templates.
pub fn canonical_column(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}').to_lowercase();
    let mut normalized = String::with_capacity(trimmed.len());
    let mut last_sep = false;
    for ch in trimmed.chars() {
        if ch.is_whitespace() || ch == '-' || ch == '_' {
            if !last_sep && !normalized.is_empty() {
                normalized.push('_');
            }
            last_sep = true;
        } else {
            normalized.push(ch);
            last_sep = false;
        }
    }
    while normalized.ends_with('_') {
        normalized.pop();
    }
    match normalized.as_str() {
        "image_urls" | "image_url" | "image" => "images".to_string(),
        "id" => "internal_id".to_string(),
        "complex" => "complex_name".to_string(),
        "building" => "building_name".to_string(),
        "number" => "apartment_number".to_string(),
        "area" => "area_total".to_string(),
        "renovation_type" => "renovation".to_string(),
        _ => normalized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_column_handles_spacing_and_aliases() {
        assert_eq!(canonical_column("  Internal ID "), "internal_id");
        assert_eq!(canonical_column("\u{feff}image_urls"), "images");
        assert_eq!(canonical_column("Floors-Total"), "floors_total");
        assert_eq!(canonical_column("id"), "internal_id");
        assert_eq!(canonical_column("   "), "");
    }

    #[test]
    fn raw_value_text_filters_sentinels() {
        assert_eq!(RawValue::Text("nan".into()).as_text(), None);
        assert_eq!(RawValue::Text("  ".into()).as_text(), None);
        assert_eq!(RawValue::Empty.as_text(), None);
        assert_eq!(RawValue::Float(f64::NAN).as_text(), None);
        assert_eq!(RawValue::Float(12.0).as_text().as_deref(), Some("12"));
        assert_eq!(RawValue::Float(54.2).as_text().as_deref(), Some("54.2"));
    }

    #[test]
    fn insert_keeps_first_present_value_for_aliases() {
        let mut row = RawRow::new(1);
        row.insert("image_urls", RawValue::from("a.jpg"));
        row.insert("images", RawValue::from("b.jpg"));
        assert_eq!(row.text("images").as_deref(), Some("a.jpg"));

        let mut row = RawRow::new(1);
        row.insert("id", RawValue::from(""));
        row.insert("internal_id", RawValue::from("U1"));
        assert_eq!(row.text("internal_id").as_deref(), Some("U1"));
    }

    #[test]
    fn untagged_json_values() {
        let values: Vec<RawValue> =
            serde_json::from_str(r#"[null, true, 3, 4.5, "x"]"#).expect("parse values");
        assert_eq!(
            values,
            vec![
                RawValue::Empty,
                RawValue::Bool(true),
                RawValue::Integer(3),
                RawValue::Float(4.5),
                RawValue::Text("x".into()),
            ]
        );
    }
}
