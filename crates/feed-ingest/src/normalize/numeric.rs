//! Numeric coercion for spreadsheet cells.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Parses a decimal as written in partner sheets.
///
/// Whitespace (including non-breaking spaces used for thousand grouping) is
/// removed, and a lone comma with no dot is read as the decimal separator.
/// Returns `None` when the text is not a number.
pub fn parse_decimal(value: &str) -> Option<Decimal> {
    let mut compact: String = value
        .chars()
        .filter(|ch| !ch.is_whitespace() && *ch != '\u{a0}' && *ch != '\u{202f}')
        .collect();
    if compact.is_empty() {
        return None;
    }
    if !compact.contains('.') && compact.matches(',').count() == 1 {
        compact = compact.replace(',', ".");
    }
    if compact.contains(['e', 'E']) {
        return Decimal::from_scientific(&compact).ok();
    }
    Decimal::from_str(&compact).ok()
}

/// Parses an integer, accepting integral decimals such as `12.0`.
pub fn parse_integer(value: &str) -> Option<i32> {
    let trimmed = value.trim();
    if let Ok(parsed) = trimmed.parse::<i32>() {
        return Some(parsed);
    }
    let decimal = parse_decimal(trimmed)?;
    if decimal.fract() != Decimal::ZERO {
        return None;
    }
    decimal.to_i32()
}
