//! Hierarchy builder: groups typed records into Complex → Building → Unit.
//!
//! Grouping preserves first-seen order at every level and never reorders
//! units. Structural conflicts (duplicate ids, disagreeing `floors_total`)
//! are returned as issues for the validator to merge.

use std::collections::BTreeMap;

use tracing::{debug, info_span};

use feed_model::{
    Building, Catalog, Complex, FloorsTotalSource, IssueKind, NodeLocation, SourceRef, Unit,
    UnitRecord, ValidationIssue, node_path,
};

/// The built tree plus the structural issues found while building it.
#[derive(Debug, Clone, Default)]
pub struct BuildOutput {
    pub catalog: Catalog,
    pub issues: Vec<ValidationIssue>,
}

#[derive(Default)]
struct ComplexSlot {
    index: usize,
    buildings: BTreeMap<String, usize>,
}

/// First occurrence of an `internal_id`.
struct FirstSeen {
    row: usize,
    path: String,
}

/// Build the catalog tree from normalized records, in source order.
pub fn build(records: Vec<UnitRecord>) -> BuildOutput {
    let span = info_span!("build_hierarchy", records = records.len());
    let _guard = span.enter();

    let mut catalog = Catalog::new();
    let mut issues = Vec::new();
    let mut complexes: BTreeMap<String, ComplexSlot> = BTreeMap::new();
    let mut seen_ids: BTreeMap<String, FirstSeen> = BTreeMap::new();

    for record in records {
        let complex_key = record.complex_name.clone().unwrap_or_default();
        let building_key = record.building_name.clone().unwrap_or_default();

        let slot = complexes.entry(complex_key.clone()).or_insert_with(|| {
            catalog.complexes.push(Complex::new(complex_key.clone()));
            ComplexSlot {
                index: catalog.complexes.len() - 1,
                buildings: BTreeMap::new(),
            }
        });
        let ci = slot.index;
        let complex = &mut catalog.complexes[ci];
        let bi = *slot.buildings.entry(building_key.clone()).or_insert_with(|| {
            complex.buildings.push(Building::new(building_key.clone()));
            complex.buildings.len() - 1
        });
        let complex_label = complex.label().to_string();
        let building = &mut complex.buildings[bi];
        let building_path = node_path(&[&complex_label, building.label()]);

        if let Some(declared) = record.floors_total {
            match building.floors_total {
                None => {
                    building.floors_total = Some(declared);
                    building.floors_total_source = FloorsTotalSource::Declared;
                }
                Some(kept) if kept != declared => {
                    issues.push(
                        ValidationIssue::new(
                            IssueKind::FloorsTotalConflict,
                            NodeLocation::building(ci, bi),
                            SourceRef::row(record.raw_row_index, building_path.clone()),
                            format!(
                                "floors_total {declared} conflicts with {kept} declared earlier; keeping {kept}"
                            ),
                        )
                        .with_field("floors_total"),
                    );
                }
                Some(_) => {}
            }
        }

        let ui = building.units.len();
        let unit_path = node_path(&[&building_path, &record.label()]);
        if let Some(id) = record.internal_id.as_deref() {
            match seen_ids.get(id) {
                Some(first) => {
                    issues.push(
                        ValidationIssue::new(
                            IssueKind::DuplicateId,
                            NodeLocation::unit(ci, bi, ui),
                            SourceRef::row(record.raw_row_index, unit_path),
                            format!(
                                "internal_id {id} already used by row {} ({})",
                                first.row, first.path
                            ),
                        )
                        .with_field("internal_id"),
                    );
                }
                None => {
                    seen_ids.insert(
                        id.to_string(),
                        FirstSeen {
                            row: record.raw_row_index,
                            path: unit_path,
                        },
                    );
                }
            }
        }

        building.units.push(Unit::new(record));
    }

    debug!(
        complexes = catalog.complexes.len(),
        buildings = catalog.building_count(),
        units = catalog.unit_count(),
        structural_issues = issues.len(),
        "built catalog tree"
    );
    BuildOutput { catalog, issues }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(row: usize, complex: &str, building: &str, id: &str) -> UnitRecord {
        UnitRecord {
            internal_id: Some(id.to_string()),
            complex_name: (!complex.is_empty()).then(|| complex.to_string()),
            building_name: (!building.is_empty()).then(|| building.to_string()),
            ..UnitRecord::new(row)
        }
    }

    #[test]
    fn absent_names_share_implicit_nodes() {
        let output = build(vec![
            record(1, "", "", "U1"),
            record(2, "", "", "U2"),
            record(3, "", "B1", "U3"),
        ]);
        let catalog = output.catalog;
        assert_eq!(catalog.complexes.len(), 1);
        assert!(catalog.complexes[0].is_implicit());
        assert_eq!(catalog.complexes[0].buildings.len(), 2);
        assert!(catalog.complexes[0].buildings[0].is_implicit());
        assert_eq!(catalog.complexes[0].buildings[0].units.len(), 2);
        assert!(output.issues.is_empty());
    }

    #[test]
    fn same_building_name_in_two_complexes_is_two_buildings() {
        let output = build(vec![record(1, "A", "B1", "U1"), record(2, "B", "B1", "U2")]);
        assert_eq!(output.catalog.complexes.len(), 2);
        assert_eq!(output.catalog.building_count(), 2);
    }
}
