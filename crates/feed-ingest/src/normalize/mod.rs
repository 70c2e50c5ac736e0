//! Record normalization: raw rows to typed [`UnitRecord`]s.
//!
//! Coercion failures never abort a row early. Every bad cell in a row is
//! reported, and the row is dropped only after all of its fields were tried.

pub mod numeric;
pub mod text;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, trace, warn};

use feed_model::{DEFAULT_CURRENCY, FieldError, Price, UnitRecord};

use crate::raw::{RawRow, RawValue};

pub use numeric::{parse_decimal, parse_integer};
pub use text::{MISSING_SENTINELS, clean_text, is_missing, split_images};

/// Canonical column names the normalizer understands.
pub const KNOWN_COLUMNS: &[&str] = &[
    "internal_id",
    "complex_name",
    "building_name",
    "address",
    "price",
    "currency",
    "price_sale",
    "area_total",
    "area_living",
    "area_kitchen",
    "floor",
    "floors_total",
    "rooms",
    "built_year",
    "ceiling_height",
    "property_type",
    "category",
    "description",
    "apartment_number",
    "renovation",
    "windows_view",
    "metro_station",
    "images",
];

/// Outcome of normalizing a batch of rows, in source order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NormalizedBatch {
    pub records: Vec<UnitRecord>,
    pub field_errors: Vec<FieldError>,
}

impl NormalizedBatch {
    /// Number of rows dropped because of field errors.
    pub fn rejected_rows(&self) -> usize {
        let mut rows: Vec<usize> = self.field_errors.iter().map(|e| e.row).collect();
        rows.dedup();
        rows.len()
    }
}

/// Accumulates field errors while reading one row.
struct RowReader<'a> {
    row: &'a RawRow,
    errors: Vec<FieldError>,
}

impl<'a> RowReader<'a> {
    fn new(row: &'a RawRow) -> Self {
        Self {
            row,
            errors: Vec::new(),
        }
    }

    fn text(&self, column: &str) -> Option<String> {
        self.row
            .text(column)
            .and_then(|value| clean_text(value.as_ref()))
    }

    fn decimal(&mut self, column: &str) -> Option<Decimal> {
        let value = self.row.text(column)?;
        match parse_decimal(value.as_ref()) {
            Some(parsed) => Some(parsed),
            None => {
                self.reject(column, "not a decimal number");
                None
            }
        }
    }

    fn integer(&mut self, column: &str) -> Option<i32> {
        let value = self.row.text(column)?;
        match parse_integer(value.as_ref()) {
            Some(parsed) => Some(parsed),
            None => {
                self.reject(column, "not a whole number");
                None
            }
        }
    }

    fn images(&self) -> Vec<String> {
        self.row
            .text("images")
            .map(|value| split_images(value.as_ref()))
            .unwrap_or_default()
    }

    fn reject(&mut self, column: &str, message: &str) {
        let value = self
            .row
            .get(column)
            .map(RawValue::display)
            .unwrap_or_default();
        self.errors
            .push(FieldError::new(self.row.index, column, value, message));
    }
}

/// Normalize one raw row.
///
/// Returns the typed record, or every field error found in the row.
pub fn normalize(row: &RawRow) -> Result<UnitRecord, Vec<FieldError>> {
    let mut reader = RowReader::new(row);

    let price_value = reader.decimal("price");
    let currency = reader
        .text("currency")
        .map(|code| code.to_uppercase())
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

    let record = UnitRecord {
        raw_row_index: row.index,
        internal_id: reader.text("internal_id"),
        complex_name: reader.text("complex_name"),
        building_name: reader.text("building_name"),
        address: reader.text("address"),
        price: price_value.map(|value| Price::new(value, currency)),
        price_sale: reader.decimal("price_sale"),
        area_total: reader.decimal("area_total"),
        area_living: reader.decimal("area_living"),
        area_kitchen: reader.decimal("area_kitchen"),
        floor: reader.integer("floor"),
        floors_total: reader.integer("floors_total"),
        rooms: reader.integer("rooms"),
        built_year: reader.integer("built_year"),
        ceiling_height: reader.decimal("ceiling_height"),
        property_type: reader.text("property_type"),
        category: reader.text("category"),
        description: reader.text("description"),
        apartment_number: reader.text("apartment_number"),
        renovation: reader.text("renovation"),
        windows_view: reader.text("windows_view"),
        metro_station: reader.text("metro_station"),
        images: reader.images(),
    };

    if reader.errors.is_empty() {
        Ok(record)
    } else {
        Err(reader.errors)
    }
}

/// Normalize a batch, keeping source order in both outputs.
pub fn normalize_rows(rows: &[RawRow]) -> NormalizedBatch {
    log_unknown_columns(rows);
    let mut batch = NormalizedBatch::default();
    for row in rows {
        match normalize(row) {
            Ok(record) => {
                trace!(row = row.index, id = record.internal_id.as_deref(), "row normalized");
                batch.records.push(record);
            }
            Err(errors) => {
                warn!(
                    row = row.index,
                    error_count = errors.len(),
                    "row rejected by normalizer"
                );
                batch.field_errors.extend(errors);
            }
        }
    }
    debug!(
        rows = rows.len(),
        records = batch.records.len(),
        field_errors = batch.field_errors.len(),
        "normalized rows"
    );
    batch
}

fn log_unknown_columns(rows: &[RawRow]) {
    let mut unknown: Vec<&str> = rows
        .iter()
        .flat_map(|row| row.fields.keys())
        .map(String::as_str)
        .filter(|column| !KNOWN_COLUMNS.contains(column))
        .collect();
    unknown.sort_unstable();
    unknown.dedup();
    if !unknown.is_empty() {
        debug!(columns = ?unknown, "ignoring unknown columns");
    }
}
