//! Validation check modules, one per tree level.

pub mod building;
pub mod complex;
pub mod unit;

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use feed_model::{Catalog, IssueKind, NodeLocation, SourceRef, ValidationIssue, node_path};

use crate::policy::SeverityPolicy;

/// A rule hit before it is placed in the tree and graded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub kind: IssueKind,
    pub field: Option<&'static str>,
    pub message: String,
}

impl Finding {
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            field: None,
            message: message.into(),
        }
    }

    pub fn field(kind: IssueKind, field: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind,
            field: Some(field),
            message: message.into(),
        }
    }

    fn into_issue(self, location: NodeLocation, source_ref: SourceRef) -> ValidationIssue {
        let issue = ValidationIssue::new(self.kind, location, source_ref, self.message);
        match self.field {
            Some(field) => issue.with_field(field),
            None => issue,
        }
    }
}

/// Run every rule over the tree in traversal order.
///
/// Complex checks come first, then each building's checks followed by its
/// units, so the result is already ordered by [`NodeLocation`].
pub fn run_all(catalog: &Catalog, policy: &SeverityPolicy) -> Vec<ValidationIssue> {
    let expensive_above = expensive_thresholds(catalog);
    let mut issues = Vec::new();
    for (ci, complex) in catalog.complexes.iter().enumerate() {
        let complex_path = complex.label().to_string();
        for finding in complex::check(complex) {
            issues.push(finding.into_issue(
                NodeLocation::complex(ci),
                SourceRef::node(complex_path.clone()),
            ));
        }

        for (bi, building) in complex.buildings.iter().enumerate() {
            let building_path = node_path(&[&complex_path, building.label()]);
            for finding in building::check(building) {
                issues.push(finding.into_issue(
                    NodeLocation::building(ci, bi),
                    SourceRef::node(building_path.clone()),
                ));
            }

            let bound = unit::FloorBound::of(building);
            for (ui, unit) in building.units.iter().enumerate() {
                let record = &unit.record;
                let context = unit::UnitContext {
                    expensive_above: record
                        .price
                        .as_ref()
                        .and_then(|price| expensive_above.get(&price.currency).copied()),
                    ..unit::UnitContext::new(bound, policy.reference_year())
                };
                let unit_path = node_path(&[&building_path, &record.label()]);
                for finding in unit::check(record, &context) {
                    issues.push(finding.into_issue(
                        NodeLocation::unit(ci, bi, ui),
                        SourceRef::row(record.raw_row_index, unit_path.clone()),
                    ));
                }
            }
        }
    }
    issues
}

/// Price quantile, in tenths, above which a listing needs a description.
const EXPENSIVE_QUANTILE_TENTHS: usize = 8;

/// 80th percentile of positive prices, per currency.
fn expensive_thresholds(catalog: &Catalog) -> BTreeMap<String, Decimal> {
    let mut prices: BTreeMap<String, Vec<Decimal>> = BTreeMap::new();
    for unit in catalog.units() {
        if let Some(price) = &unit.record.price
            && price.value > Decimal::ZERO
        {
            prices
                .entry(price.currency.clone())
                .or_default()
                .push(price.value);
        }
    }
    prices
        .into_iter()
        .filter_map(|(currency, mut values)| {
            values.sort_unstable();
            quantile(&values, EXPENSIVE_QUANTILE_TENTHS).map(|value| (currency, value))
        })
        .collect()
}

/// Linear-interpolated quantile of sorted values, `tenths / 10`.
///
/// `None` for an empty slice or when interpolation overflows.
fn quantile(sorted: &[Decimal], tenths: usize) -> Option<Decimal> {
    let last = sorted.len().checked_sub(1)?;
    let scaled = last * tenths;
    let lower = sorted[scaled / 10];
    let fraction = Decimal::from(scaled % 10) / Decimal::TEN;
    if fraction.is_zero() {
        return Some(lower);
    }
    let upper = sorted[scaled / 10 + 1];
    upper
        .checked_sub(lower)
        .and_then(|gap| gap.checked_mul(fraction))
        .and_then(|step| lower.checked_add(step))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decimals(values: &[i64]) -> Vec<Decimal> {
        values.iter().map(|value| Decimal::from(*value)).collect()
    }

    #[test]
    fn quantile_interpolates_between_neighbours() {
        assert_eq!(quantile(&[], 8), None);
        assert_eq!(quantile(&decimals(&[5]), 8), Some(Decimal::from(5)));
        assert_eq!(
            quantile(&decimals(&[4_000_000, 9_000_000, 12_500_000]), 8),
            Some(Decimal::from(11_100_000))
        );
        assert_eq!(
            quantile(&decimals(&[1, 2, 3, 4, 5, 6]), 8),
            Some(Decimal::from(5))
        );
    }
}
