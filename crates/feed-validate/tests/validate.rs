//! End-to-end validation over built catalogs.

use proptest::prelude::*;
use rust_decimal::Decimal;

use feed_core::build;
use feed_model::{
    Building, Catalog, Complex, DEFAULT_CURRENCY, FloorsTotalSource, IssueKind, IssueScope,
    NodeLocation, Price, Severity, Unit, UnitRecord,
};
use feed_validate::{SeverityPolicy, ValidationReport, validate};

fn unit(row: usize, complex: &str, building: &str, id: &str) -> UnitRecord {
    UnitRecord {
        internal_id: Some(id.to_string()),
        complex_name: Some(complex.to_string()),
        building_name: Some(building.to_string()),
        address: Some("Москва, ул. Ленина, 1".to_string()),
        price: Some(Price::new(Decimal::new(9_000_000, 0), DEFAULT_CURRENCY)),
        area_total: Some(Decimal::new(45, 0)),
        floor: Some(3),
        floors_total: Some(9),
        rooms: Some(2),
        renovation: Some("чистовая".to_string()),
        windows_view: Some("во двор".to_string()),
        images: vec!["https://cdn.example.com/1.jpg".to_string()],
        ..UnitRecord::new(row)
    }
}

fn run(records: Vec<UnitRecord>) -> (feed_model::Catalog, ValidationReport) {
    let output = build(records);
    validate(output.catalog, output.issues, &SeverityPolicy::new(2026))
}

#[test]
fn clean_catalog_has_no_issues() {
    let (_, report) = run(vec![unit(1, "Sunrise", "B1", "U1"), unit(2, "Sunrise", "B1", "U2")]);
    assert!(report.is_empty());
    assert!(!report.has_errors());
}

#[test]
fn duplicate_id_blocks_with_single_error() {
    let (catalog, report) = run(vec![unit(1, "Sunrise", "B1", "U1"), unit(2, "Sunrise", "B1", "U1")]);
    assert_eq!(report.error_count(), 1);
    assert_eq!(report.warning_count(), 0);
    let issue = &report.issues[0];
    assert_eq!(issue.kind, IssueKind::DuplicateId);
    assert_eq!(issue.source_ref.row, Some(2));
    let second = &catalog.complexes[0].buildings[0].units[1];
    assert_eq!(second.diagnostics.len(), 1);
    assert_eq!(second.diagnostics[0].severity, Severity::Error);
}

#[test]
fn unstated_floors_total_is_inferred_and_warned() {
    let mut record = unit(1, "Sunrise", "B1", "U1");
    record.floors_total = None;
    record.floor = Some(5);
    let (catalog, report) = run(vec![record]);

    let building = &catalog.complexes[0].buildings[0];
    assert_eq!(building.floors_total, Some(5));
    assert_eq!(building.floors_total_source, FloorsTotalSource::Inferred);
    assert!(!report.has_errors());
    assert_eq!(report.warning_count(), 1);
    assert_eq!(report.issues[0].kind, IssueKind::FloorBoundUnchecked);
    assert_eq!(building.units[0].diagnostics.len(), 1);
}

#[test]
fn floor_above_declared_total_is_one_error() {
    let mut record = unit(1, "Sunrise", "B1", "U1");
    record.floor = Some(12);
    let (_, report) = run(vec![record]);
    let errors: Vec<_> = report.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, IssueKind::FloorOutOfRange);
    assert_eq!(errors[0].location, NodeLocation::unit(0, 0, 0));
    assert_eq!(errors[0].source_ref.path, "Sunrise/B1/U1");
}

#[test]
fn issues_follow_traversal_order_with_structural_first() {
    let mut conflicting = unit(3, "Sunrise", "B1", "U3");
    conflicting.floors_total = Some(12);
    conflicting.address = Some("Москва, ул. Мира, 2".to_string());
    let mut no_images = unit(4, "Lakeside", "L1", "U4");
    no_images.images.clear();
    let mut duplicate = unit(2, "Sunrise", "B1", "U1");
    duplicate.address = None;

    let (_, report) = run(vec![
        unit(1, "Sunrise", "B1", "U1"),
        duplicate,
        conflicting,
        no_images,
    ]);
    let kinds: Vec<_> = report.issues.iter().map(|issue| issue.kind).collect();
    assert_eq!(
        kinds,
        vec![
            IssueKind::FloorsTotalConflict,
            IssueKind::InconsistentBuildingAddress,
            IssueKind::DuplicateId,
            IssueKind::MissingAddress,
            IssueKind::MissingImages,
        ]
    );
}

#[test]
fn strict_policy_blocks_on_warnings() {
    let mut record = unit(1, "Sunrise", "B1", "U1");
    record.images.clear();
    let output = build(vec![record]);
    let policy = SeverityPolicy::new(2026).into_strict();
    let (_, report) = validate(output.catalog, output.issues, &policy);
    assert!(report.has_errors());
    assert_eq!(report.issues[0].kind, IssueKind::MissingImages);
}

#[test]
fn policy_regrades_structural_issues() {
    let output = build(vec![unit(1, "Sunrise", "B1", "U1"), unit(2, "Sunrise", "B1", "U1")]);
    let policy = SeverityPolicy::new(2026).with_override(IssueKind::DuplicateId, Severity::Warning);
    let (_, report) = validate(output.catalog, output.issues, &policy);
    assert!(!report.has_errors());
    assert_eq!(report.warning_count(), 1);
}

#[test]
fn missing_id_is_an_error_even_alone() {
    let mut record = unit(1, "Sunrise", "B1", "U1");
    record.internal_id = None;
    let (_, report) = run(vec![record]);
    assert_eq!(report.error_count(), 1);
    assert_eq!(report.issues[0].kind, IssueKind::MissingId);
    assert_eq!(report.issues[0].source_ref.path, "Sunrise/B1/row 1");
}

#[test]
fn report_serializes_in_order() {
    let mut record = unit(1, "Sunrise", "B1", "U1");
    record.images.clear();
    let (_, report) = run(vec![record]);
    let json = serde_json::to_value(&report).expect("serialize report");
    assert_eq!(json["issues"][0]["kind"], "missing-images");
    assert_eq!(json["issues"][0]["source_ref"]["path"], "Sunrise/B1/U1");
}

#[test]
fn empty_complex_reported_ahead_of_later_nodes() {
    let mut lakeside = Complex::new("Lakeside");
    lakeside.buildings.push(Building::new("L1"));
    let mut sunrise = Complex::new("Sunrise");
    let mut b1 = Building::new("B1");
    b1.floors_total = Some(9);
    b1.floors_total_source = FloorsTotalSource::Declared;
    let mut record = unit(1, "Sunrise", "B1", "U1");
    record.images.clear();
    b1.units.push(Unit::new(record));
    sunrise.buildings.push(b1);
    let catalog = Catalog {
        complexes: vec![Complex::new("Empty"), lakeside, sunrise],
    };

    let (catalog, report) = validate(catalog, Vec::new(), &SeverityPolicy::new(2026));
    let found: Vec<_> = report
        .issues
        .iter()
        .map(|issue| (issue.kind, issue.scope, issue.location))
        .collect();
    assert_eq!(
        found,
        vec![
            (IssueKind::EmptyComplex, IssueScope::Complex, NodeLocation::complex(0)),
            (IssueKind::EmptyBuilding, IssueScope::Building, NodeLocation::building(1, 0)),
            (IssueKind::MissingImages, IssueScope::Unit, NodeLocation::unit(2, 0, 0)),
        ]
    );
    assert_eq!(report.issues[0].source_ref.path, "Empty");
    assert_eq!(report.issues[0].severity, Severity::Warning);
    assert_eq!(catalog.complexes[0].diagnostics.len(), 1);
    assert_eq!(catalog.complexes[0].diagnostics[0].kind, IssueKind::EmptyComplex);
}

#[test]
fn huge_room_areas_do_not_abort_validation() {
    let max = Decimal::MAX;
    let mut record = unit(1, "Sunrise", "B1", "U1");
    record.area_total = Some(max);
    record.area_living = Some(max - Decimal::ONE);
    record.area_kitchen = Some(max - Decimal::ONE);
    let (_, report) = run(vec![record]);
    let errors: Vec<_> = report.errors().map(|issue| issue.kind).collect();
    assert_eq!(errors, vec![IssueKind::RoomAreasExceedTotal]);
}

#[test]
fn expensive_listing_without_description_in_batch() {
    let mut cheap = unit(1, "Sunrise", "B1", "U1");
    cheap.price = Some(Price::new(Decimal::new(4_000_000, 0), DEFAULT_CURRENCY));
    cheap.area_total = Some(Decimal::new(40, 0));
    let middle = unit(2, "Sunrise", "B1", "U2");
    let mut expensive = unit(3, "Sunrise", "B1", "U3");
    expensive.price = Some(Price::new(Decimal::new(12_500_000, 0), DEFAULT_CURRENCY));
    expensive.area_total = Some(Decimal::new(62, 0));

    let (_, report) = run(vec![cheap, middle, expensive.clone()]);
    let found: Vec<_> = report
        .issues
        .iter()
        .map(|issue| (issue.kind, issue.source_ref.row))
        .collect();
    assert_eq!(found, vec![(IssueKind::ExpensiveWithoutDescription, Some(3))]);

    expensive.description = Some("Видовая квартира".to_string());
    let (_, report) = run(vec![unit(1, "Sunrise", "B1", "U1"), expensive]);
    assert!(report.is_empty());
}

#[test]
fn counts_by_kind_groups_issues() {
    let mut first = unit(1, "Sunrise", "B1", "U1");
    first.images.clear();
    first.built_year = Some(2020);
    let mut second = unit(2, "Sunrise", "B1", "U2");
    second.images.clear();
    second.built_year = Some(2021);
    let (_, report) = run(vec![first, second]);
    let counts = report.counts_by_kind();
    assert_eq!(counts.get(&IssueKind::MissingImages), Some(&2));
    assert_eq!(counts.get(&IssueKind::InconsistentBuiltYear), Some(&1));
    assert_eq!(counts.len(), 2);
}

proptest! {
    #[test]
    fn validation_is_deterministic(
        specs in prop::collection::vec((0usize..2, 0usize..2, 0usize..4, -1i32..12, any::<bool>()), 1..30)
    ) {
        let records: Vec<UnitRecord> = specs
            .iter()
            .enumerate()
            .map(|(pos, (c, b, id, floor, images))| {
                let mut record = unit(pos + 1, &format!("C{c}"), &format!("B{b}"), &format!("U{id}"));
                record.floor = Some(*floor);
                if !*images {
                    record.images.clear();
                }
                record
            })
            .collect();
        let first = run(records.clone());
        let second = run(records);
        prop_assert_eq!(&first.1, &second.1);
        prop_assert_eq!(first.0, second.0);

        let locations: Vec<NodeLocation> = first.1.issues.iter().map(|i| i.location).collect();
        let mut sorted = locations.clone();
        sorted.sort();
        prop_assert_eq!(locations, sorted);
    }
}
