use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Currency used when a row carries no `currency` column.
pub const DEFAULT_CURRENCY: &str = "RUB";

/// Currency-tagged price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub value: Decimal,
    pub currency: String,
}

impl Price {
    pub fn new(value: Decimal, currency: impl Into<String>) -> Self {
        Self {
            value,
            currency: currency.into(),
        }
    }
}

/// A fully typed listing row produced by the normalizer.
///
/// Every optional column is an explicit `Option`; an absent cell is never
/// stored as zero or as an empty string. Required columns (`internal_id`,
/// `address`, `price`, `area_total`) are optional here too: their absence is
/// reported by validation, not by normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitRecord {
    /// 1-based data row number in the source sheet (header excluded).
    pub raw_row_index: usize,
    pub internal_id: Option<String>,
    pub complex_name: Option<String>,
    pub building_name: Option<String>,
    pub address: Option<String>,
    pub price: Option<Price>,
    /// Discounted sale price, in the currency of `price`.
    pub price_sale: Option<Decimal>,
    pub area_total: Option<Decimal>,
    pub area_living: Option<Decimal>,
    pub area_kitchen: Option<Decimal>,
    pub floor: Option<i32>,
    pub floors_total: Option<i32>,
    pub rooms: Option<i32>,
    pub built_year: Option<i32>,
    pub ceiling_height: Option<Decimal>,
    pub property_type: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub apartment_number: Option<String>,
    pub renovation: Option<String>,
    pub windows_view: Option<String>,
    pub metro_station: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

impl UnitRecord {
    pub fn new(raw_row_index: usize) -> Self {
        Self {
            raw_row_index,
            ..Self::default()
        }
    }

    /// Identifier used in paths and messages; falls back to the row number.
    pub fn label(&self) -> String {
        match self.internal_id.as_deref() {
            Some(id) => id.to_string(),
            None => format!("row {}", self.raw_row_index),
        }
    }

    /// Price divided by total area, when both are present and the area is positive.
    pub fn price_per_meter(&self) -> Option<Decimal> {
        let price = self.price.as_ref()?;
        let area = self.area_total?;
        if area <= Decimal::ZERO {
            return None;
        }
        price.value.checked_div(area)
    }
}
