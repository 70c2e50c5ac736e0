//! Unit-level checks.

use rust_decimal::Decimal;

use feed_model::{Building, DEFAULT_CURRENCY, FloorsTotalSource, IssueKind, UnitRecord};

use super::Finding;

/// Plausible price per square metre, in the default currency.
pub const MIN_PRICE_PER_METER: Decimal = Decimal::from_parts(50_000, 0, 0, false, 0);
pub const MAX_PRICE_PER_METER: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

pub const MIN_BUILT_YEAR: i32 = 1900;
/// Off-plan listings may announce completion this many years ahead.
pub const YEARS_AHEAD_ALLOWED: i32 = 10;

/// Finishing types accepted in `renovation` (compared case-insensitively).
pub const RENOVATION_TYPES: &[&str] = &["без отделки", "черновая", "чистовая"];

/// Upper floor bound a unit is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloorBound {
    /// Stated by the source rows.
    Declared(i32),
    /// Inferred or unknown: only `floor >= 1` can be checked.
    Unstated,
}

impl FloorBound {
    pub fn of(building: &Building) -> Self {
        match (building.floors_total_source, building.floors_total) {
            (FloorsTotalSource::Declared, Some(total)) => Self::Declared(total),
            _ => Self::Unstated,
        }
    }
}

/// Everything a unit is checked against besides its own record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitContext {
    pub bound: FloorBound,
    pub reference_year: i32,
    /// Price above which a listing is expected to carry a description.
    pub expensive_above: Option<Decimal>,
}

impl UnitContext {
    pub fn new(bound: FloorBound, reference_year: i32) -> Self {
        Self {
            bound,
            reference_year,
            expensive_above: None,
        }
    }
}

pub fn check(record: &UnitRecord, context: &UnitContext) -> Vec<Finding> {
    let mut findings = Vec::new();
    check_identity(record, &mut findings);
    check_price(record, &mut findings);
    check_areas(record, &mut findings);
    check_floor(record, context.bound, &mut findings);
    check_images(record, &mut findings);
    check_address(record, &mut findings);
    check_price_per_meter(record, &mut findings);
    check_built_year(record, context.reference_year, &mut findings);
    check_recommended_fields(record, &mut findings);
    check_renovation(record, &mut findings);
    check_description(record, context.expensive_above, &mut findings);
    findings
}

fn check_identity(record: &UnitRecord, findings: &mut Vec<Finding>) {
    if record.internal_id.is_none() {
        findings.push(Finding::field(
            IssueKind::MissingId,
            "internal_id",
            format!("row {} has no internal_id", record.raw_row_index),
        ));
    }
}

fn check_price(record: &UnitRecord, findings: &mut Vec<Finding>) {
    match &record.price {
        None => findings.push(Finding::field(
            IssueKind::MissingPrice,
            "price",
            "price is absent",
        )),
        Some(price) if price.value <= Decimal::ZERO => findings.push(Finding::field(
            IssueKind::NonPositivePrice,
            "price",
            format!("price must be positive, got {}", price.value),
        )),
        Some(_) => {}
    }
    if let Some(sale) = record.price_sale
        && sale <= Decimal::ZERO
    {
        findings.push(Finding::field(
            IssueKind::NonPositivePrice,
            "price_sale",
            format!("price_sale must be positive, got {sale}"),
        ));
    }
}

fn check_areas(record: &UnitRecord, findings: &mut Vec<Finding>) {
    match record.area_total {
        None => findings.push(Finding::field(
            IssueKind::MissingArea,
            "area_total",
            "area_total is absent",
        )),
        Some(area) => non_positive_area("area_total", area, findings),
    }
    if let Some(area) = record.area_living {
        non_positive_area("area_living", area, findings);
    }
    if let Some(area) = record.area_kitchen {
        non_positive_area("area_kitchen", area, findings);
    }

    let positive = |value: Option<Decimal>| value.filter(|v| *v > Decimal::ZERO);
    let Some(total) = positive(record.area_total) else {
        return;
    };
    let living = positive(record.area_living);
    if let Some(living) = living
        && living >= total
    {
        findings.push(Finding::field(
            IssueKind::LivingAreaExceedsTotal,
            "area_living",
            format!("area_living {living} is not smaller than area_total {total}"),
        ));
        return;
    }
    // An overflowing sum is certainly larger than any total.
    if let (Some(living), Some(kitchen)) = (living, positive(record.area_kitchen))
        && living.checked_add(kitchen).is_none_or(|sum| sum > total)
    {
        findings.push(Finding::field(
            IssueKind::RoomAreasExceedTotal,
            "area_kitchen",
            format!("area_living {living} + area_kitchen {kitchen} exceeds area_total {total}"),
        ));
    }
}

fn non_positive_area(field: &'static str, area: Decimal, findings: &mut Vec<Finding>) {
    if area <= Decimal::ZERO {
        findings.push(Finding::field(
            IssueKind::NonPositiveArea,
            field,
            format!("{field} must be positive, got {area}"),
        ));
    }
}

fn check_floor(record: &UnitRecord, bound: FloorBound, findings: &mut Vec<Finding>) {
    let Some(floor) = record.floor else {
        return;
    };
    match bound {
        FloorBound::Declared(total) => {
            if floor < 1 || floor > total {
                findings.push(Finding::field(
                    IssueKind::FloorOutOfRange,
                    "floor",
                    format!("floor {floor} outside 1..={total}"),
                ));
            }
        }
        FloorBound::Unstated => {
            if floor < 1 {
                findings.push(Finding::field(
                    IssueKind::FloorOutOfRange,
                    "floor",
                    format!("floor {floor} is below 1"),
                ));
            } else {
                findings.push(Finding::field(
                    IssueKind::FloorBoundUnchecked,
                    "floor",
                    format!("floor {floor} not checked: building floors_total is not stated"),
                ));
            }
        }
    }
}

fn check_images(record: &UnitRecord, findings: &mut Vec<Finding>) {
    if record.images.is_empty() {
        findings.push(Finding::field(
            IssueKind::MissingImages,
            "images",
            "unit has no images",
        ));
        return;
    }
    for image in &record.images {
        if !is_http_url(image) {
            findings.push(Finding::field(
                IssueKind::InvalidImageUrl,
                "images",
                format!("image {image} is not an http(s) URL"),
            ));
        }
    }
}

fn is_http_url(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    ["http://", "https://"]
        .iter()
        .any(|scheme| lower.starts_with(scheme) && lower.len() > scheme.len())
}

fn check_address(record: &UnitRecord, findings: &mut Vec<Finding>) {
    if record.address.is_none() {
        findings.push(Finding::field(
            IssueKind::MissingAddress,
            "address",
            "address is absent",
        ));
    }
}

fn check_price_per_meter(record: &UnitRecord, findings: &mut Vec<Finding>) {
    let Some(price) = &record.price else {
        return;
    };
    // Thresholds are in roubles.
    if price.currency != DEFAULT_CURRENCY || price.value <= Decimal::ZERO {
        return;
    }
    let Some(per_meter) = record.price_per_meter() else {
        return;
    };
    if !(MIN_PRICE_PER_METER..=MAX_PRICE_PER_METER).contains(&per_meter) {
        findings.push(Finding::field(
            IssueKind::SuspiciousPricePerMeter,
            "price",
            format!(
                "price per square meter {} outside {MIN_PRICE_PER_METER}..={MAX_PRICE_PER_METER}",
                per_meter.round_dp(2)
            ),
        ));
    }
}

fn check_built_year(record: &UnitRecord, reference_year: i32, findings: &mut Vec<Finding>) {
    let Some(year) = record.built_year else {
        return;
    };
    let latest = reference_year.saturating_add(YEARS_AHEAD_ALLOWED);
    if !(MIN_BUILT_YEAR..=latest).contains(&year) {
        findings.push(Finding::field(
            IssueKind::BuiltYearOutOfRange,
            "built_year",
            format!("built_year {year} outside {MIN_BUILT_YEAR}..={latest}"),
        ));
    }
}

fn check_recommended_fields(record: &UnitRecord, findings: &mut Vec<Finding>) {
    let missing: Vec<&str> = [
        ("rooms", record.rooms.is_none()),
        ("renovation", record.renovation.is_none()),
        ("windows_view", record.windows_view.is_none()),
    ]
    .into_iter()
    .filter_map(|(field, absent)| absent.then_some(field))
    .collect();
    if !missing.is_empty() {
        findings.push(Finding::new(
            IssueKind::MissingRecommendedField,
            format!("recommended fields not filled: {}", missing.join(", ")),
        ));
    }
}

fn check_renovation(record: &UnitRecord, findings: &mut Vec<Finding>) {
    let Some(renovation) = record.renovation.as_deref() else {
        return;
    };
    let lower = renovation.to_lowercase();
    if !RENOVATION_TYPES.contains(&lower.as_str()) {
        findings.push(Finding::field(
            IssueKind::UnknownRenovationType,
            "renovation",
            format!(
                "renovation {renovation} is not one of {}",
                RENOVATION_TYPES.join(", ")
            ),
        ));
    }
}

fn check_description(
    record: &UnitRecord,
    expensive_above: Option<Decimal>,
    findings: &mut Vec<Finding>,
) {
    let (Some(price), Some(threshold)) = (&record.price, expensive_above) else {
        return;
    };
    if record.description.is_none() && price.value > threshold {
        findings.push(Finding::field(
            IssueKind::ExpensiveWithoutDescription,
            "description",
            format!(
                "price {} is above the batch 80th percentile {} but there is no description",
                price.value.normalize(),
                threshold.normalize()
            ),
        ));
    }
}

#[cfg(test)]
mod tests {
    use feed_model::Price;

    use super::*;

    fn valid() -> UnitRecord {
        UnitRecord {
            internal_id: Some("U1".into()),
            address: Some("Москва, ул. Ленина, 1".into()),
            price: Some(Price::new(Decimal::new(9_000_000, 0), DEFAULT_CURRENCY)),
            area_total: Some(Decimal::new(45, 0)),
            floor: Some(3),
            rooms: Some(2),
            renovation: Some("Чистовая".into()),
            windows_view: Some("во двор".into()),
            images: vec!["https://cdn.example.com/1.jpg".into()],
            ..UnitRecord::new(1)
        }
    }

    fn declared(total: i32) -> UnitContext {
        UnitContext::new(FloorBound::Declared(total), 2026)
    }

    fn kinds(findings: &[Finding]) -> Vec<IssueKind> {
        findings.iter().map(|f| f.kind).collect()
    }

    #[test]
    fn valid_unit_with_declared_bound_is_clean() {
        assert!(check(&valid(), &declared(9)).is_empty());
    }

    #[test]
    fn unstated_bound_warns_once() {
        let findings = check(&valid(), &UnitContext::new(FloorBound::Unstated, 2026));
        assert_eq!(kinds(&findings), vec![IssueKind::FloorBoundUnchecked]);
    }

    #[test]
    fn floor_outside_declared_bound() {
        let mut record = valid();
        record.floor = Some(10);
        assert_eq!(
            kinds(&check(&record, &declared(9))),
            vec![IssueKind::FloorOutOfRange]
        );
        record.floor = Some(0);
        assert_eq!(
            kinds(&check(&record, &UnitContext::new(FloorBound::Unstated, 2026))),
            vec![IssueKind::FloorOutOfRange]
        );
    }

    #[test]
    fn missing_and_non_positive_values() {
        let mut record = valid();
        record.internal_id = None;
        record.price = Some(Price::new(Decimal::ZERO, DEFAULT_CURRENCY));
        record.area_total = None;
        record.address = None;
        record.images.clear();
        assert_eq!(
            kinds(&check(&record, &declared(9))),
            vec![
                IssueKind::MissingId,
                IssueKind::NonPositivePrice,
                IssueKind::MissingArea,
                IssueKind::MissingImages,
                IssueKind::MissingAddress,
            ]
        );
    }

    #[test]
    fn living_and_kitchen_against_total() {
        let mut record = valid();
        record.area_living = Some(Decimal::new(45, 0));
        assert_eq!(
            kinds(&check(&record, &declared(9))),
            vec![IssueKind::LivingAreaExceedsTotal]
        );

        record.area_living = Some(Decimal::new(30, 0));
        record.area_kitchen = Some(Decimal::new(16, 0));
        assert_eq!(
            kinds(&check(&record, &declared(9))),
            vec![IssueKind::RoomAreasExceedTotal]
        );

        record.area_kitchen = Some(Decimal::new(-1, 0));
        assert_eq!(
            kinds(&check(&record, &declared(9))),
            vec![IssueKind::NonPositiveArea]
        );
    }

    #[test]
    fn suspicious_price_per_meter_only_in_roubles() {
        let mut record = valid();
        record.price = Some(Price::new(Decimal::new(100_000, 0), DEFAULT_CURRENCY));
        assert_eq!(
            kinds(&check(&record, &declared(9))),
            vec![IssueKind::SuspiciousPricePerMeter]
        );
        record.price = Some(Price::new(Decimal::new(100_000, 0), "USD"));
        assert!(check(&record, &declared(9)).is_empty());
    }

    #[test]
    fn invalid_image_urls_reported_per_image() {
        let mut record = valid();
        record.images = vec![
            "https://cdn.example.com/1.jpg".into(),
            "photos/2.jpg".into(),
            "ftp://host/3.jpg".into(),
        ];
        assert_eq!(
            kinds(&check(&record, &declared(9))),
            vec![IssueKind::InvalidImageUrl, IssueKind::InvalidImageUrl]
        );
    }

    #[test]
    fn built_year_window_follows_reference_year() {
        let mut record = valid();
        record.built_year = Some(2036);
        assert!(check(&record, &declared(9)).is_empty());
        record.built_year = Some(2037);
        assert_eq!(
            kinds(&check(&record, &declared(9))),
            vec![IssueKind::BuiltYearOutOfRange]
        );
        record.built_year = Some(1899);
        assert_eq!(
            kinds(&check(&record, &declared(9))),
            vec![IssueKind::BuiltYearOutOfRange]
        );
    }

    #[test]
    fn overflowing_room_areas_exceed_total() {
        let max = Decimal::MAX;
        let mut record = valid();
        record.price = Some(Price::new(max, DEFAULT_CURRENCY));
        record.area_total = Some(max);
        record.area_living = Some(max - Decimal::ONE);
        record.area_kitchen = Some(max - Decimal::ONE);
        let found = kinds(&check(&record, &declared(9)));
        assert!(found.contains(&IssueKind::RoomAreasExceedTotal));
        assert!(!found.contains(&IssueKind::LivingAreaExceedsTotal));
    }

    #[test]
    fn built_year_window_saturates_at_max_reference_year() {
        let mut record = valid();
        record.built_year = Some(i32::MAX);
        let context = UnitContext::new(FloorBound::Declared(9), i32::MAX);
        assert!(check(&record, &context).is_empty());
    }

    #[test]
    fn recommended_fields_reported_together() {
        let mut record = valid();
        record.rooms = None;
        record.windows_view = None;
        let findings = check(&record, &declared(9));
        assert_eq!(kinds(&findings), vec![IssueKind::MissingRecommendedField]);
        assert_eq!(
            findings[0].message,
            "recommended fields not filled: rooms, windows_view"
        );
    }

    #[test]
    fn renovation_must_be_a_known_type() {
        let mut record = valid();
        record.renovation = Some("евро".into());
        assert_eq!(
            kinds(&check(&record, &declared(9))),
            vec![IssueKind::UnknownRenovationType]
        );
        record.renovation = Some("БЕЗ ОТДЕЛКИ".into());
        assert!(check(&record, &declared(9)).is_empty());
    }

    #[test]
    fn expensive_listing_needs_description() {
        let mut context = declared(9);
        context.expensive_above = Some(Decimal::new(8_000_000, 0));
        assert_eq!(
            kinds(&check(&valid(), &context)),
            vec![IssueKind::ExpensiveWithoutDescription]
        );

        let mut described = valid();
        described.description = Some("Светлая квартира".into());
        assert!(check(&described, &context).is_empty());

        context.expensive_above = Some(Decimal::new(9_000_000, 0));
        assert!(check(&valid(), &context).is_empty());
    }

    #[test]
    fn non_positive_sale_price() {
        let mut record = valid();
        record.price_sale = Some(Decimal::ZERO);
        let findings = check(&record, &declared(9));
        assert_eq!(kinds(&findings), vec![IssueKind::NonPositivePrice]);
        assert_eq!(findings[0].field, Some("price_sale"));
    }
}
