//! Hierarchy builder tests.

use proptest::prelude::*;

use feed_core::build;
use feed_model::{FloorsTotalSource, IssueKind, NodeLocation, Severity, UnitRecord};

fn unit(row: usize, complex: &str, building: &str, id: &str) -> UnitRecord {
    UnitRecord {
        internal_id: Some(id.to_string()),
        complex_name: Some(complex.to_string()),
        building_name: Some(building.to_string()),
        ..UnitRecord::new(row)
    }
}

#[test]
fn groups_preserve_first_seen_order() {
    let output = build(vec![
        unit(1, "Sunrise", "B2", "U1"),
        unit(2, "Lakeside", "L1", "U2"),
        unit(3, "Sunrise", "B1", "U3"),
        unit(4, "Sunrise", "B2", "U4"),
    ]);
    let catalog = output.catalog;
    let names: Vec<_> = catalog.complexes.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Sunrise", "Lakeside"]);
    let buildings: Vec<_> = catalog.complexes[0]
        .buildings
        .iter()
        .map(|b| b.name.as_str())
        .collect();
    assert_eq!(buildings, vec!["B2", "B1"]);
    let units: Vec<_> = catalog.complexes[0].buildings[0]
        .units
        .iter()
        .map(|u| u.record.raw_row_index)
        .collect();
    assert_eq!(units, vec![1, 4]);
}

#[test]
fn duplicate_ids_flag_every_later_occurrence() {
    let output = build(vec![
        unit(1, "Sunrise", "B1", "U1"),
        unit(2, "Sunrise", "B1", "U1"),
        unit(3, "Lakeside", "L1", "U1"),
        unit(4, "Sunrise", "B1", "U2"),
    ]);
    let duplicates: Vec<_> = output
        .issues
        .iter()
        .filter(|issue| issue.kind == IssueKind::DuplicateId)
        .collect();
    assert_eq!(duplicates.len(), 2);
    assert_eq!(duplicates[0].source_ref.row, Some(2));
    assert_eq!(duplicates[0].location, NodeLocation::unit(0, 0, 1));
    assert_eq!(duplicates[0].severity, Severity::Error);
    assert_eq!(duplicates[0].source_ref.path, "Sunrise/B1/U1");
    assert!(duplicates[0].message.contains("row 1"));
    assert_eq!(duplicates[1].source_ref.row, Some(3));
    // Duplicates stay in the tree so every occurrence can be attributed.
    assert_eq!(output.catalog.unit_count(), 4);
}

#[test]
fn floors_total_conflict_keeps_first_value() {
    let mut first = unit(1, "Sunrise", "B1", "U1");
    first.floors_total = Some(9);
    let mut second = unit(2, "Sunrise", "B1", "U2");
    second.floors_total = Some(12);
    let mut third = unit(3, "Sunrise", "B1", "U3");
    third.floors_total = Some(9);

    let output = build(vec![first, second, third]);
    let building = &output.catalog.complexes[0].buildings[0];
    assert_eq!(building.floors_total, Some(9));
    assert_eq!(building.floors_total_source, FloorsTotalSource::Declared);
    assert_eq!(output.issues.len(), 1);
    let issue = &output.issues[0];
    assert_eq!(issue.kind, IssueKind::FloorsTotalConflict);
    assert_eq!(issue.location, NodeLocation::building(0, 0));
    assert_eq!(issue.source_ref.row, Some(2));
    assert_eq!(issue.field.as_deref(), Some("floors_total"));
}

#[test]
fn floors_total_left_unset_when_never_declared() {
    let output = build(vec![unit(1, "Sunrise", "B1", "U1")]);
    let building = &output.catalog.complexes[0].buildings[0];
    assert_eq!(building.floors_total, None);
    assert_eq!(building.floors_total_source, FloorsTotalSource::Unknown);
}

#[test]
fn records_without_id_are_not_duplicates() {
    let output = build(vec![UnitRecord::new(1), UnitRecord::new(2)]);
    assert!(output.issues.is_empty());
    assert_eq!(output.catalog.unit_count(), 2);
}

proptest! {
    #[test]
    fn units_keep_source_order_within_buildings(
        assignments in prop::collection::vec((0usize..3, 0usize..3), 1..40)
    ) {
        let records: Vec<UnitRecord> = assignments
            .iter()
            .enumerate()
            .map(|(pos, (c, b))| unit(pos + 1, &format!("C{c}"), &format!("B{b}"), &format!("U{pos}")))
            .collect();
        let output = build(records);
        prop_assert!(output.issues.is_empty());
        prop_assert_eq!(output.catalog.unit_count(), assignments.len());
        for complex in &output.catalog.complexes {
            for building in &complex.buildings {
                let rows: Vec<usize> = building.units.iter().map(|u| u.record.raw_row_index).collect();
                let mut sorted = rows.clone();
                sorted.sort_unstable();
                prop_assert_eq!(rows, sorted);
            }
        }
        let first_rows: Vec<usize> = output
            .catalog
            .complexes
            .iter()
            .map(|c| c.buildings[0].units[0].record.raw_row_index)
            .collect();
        let mut sorted = first_rows.clone();
        sorted.sort_unstable();
        prop_assert_eq!(first_rows, sorted);
    }
}
