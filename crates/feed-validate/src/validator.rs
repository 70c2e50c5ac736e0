//! Validation pass over the catalog tree.

use tracing::{debug, info, info_span};

use feed_model::{Catalog, Diagnostic, FloorsTotalSource, NodeLocation, ValidationIssue};

use crate::checks;
use crate::policy::SeverityPolicy;
use crate::report::ValidationReport;

/// Validate a built catalog.
///
/// Infers missing `floors_total` values, runs every rule, grades structural
/// and rule issues with `policy`, and attaches each issue to its node as a
/// [`Diagnostic`]. The returned report is ordered by traversal position, with
/// structural issues ahead of rule issues on the same node.
pub fn validate(
    mut catalog: Catalog,
    structural_issues: Vec<ValidationIssue>,
    policy: &SeverityPolicy,
) -> (Catalog, ValidationReport) {
    let span = info_span!("validate", units = catalog.unit_count());
    let _guard = span.enter();

    infer_floors_total(&mut catalog);

    let rule_issues = checks::run_all(&catalog, policy);
    let mut issues: Vec<ValidationIssue> = structural_issues
        .into_iter()
        .chain(rule_issues)
        .map(|issue| policy.apply(issue))
        .collect();
    // Stable: keeps structural issues first within a node.
    issues.sort_by_key(|issue| issue.location);

    attach_diagnostics(&mut catalog, &issues);

    let report = ValidationReport::new(issues);
    info!(
        errors = report.error_count(),
        warnings = report.warning_count(),
        "validation finished"
    );
    (catalog, report)
}

/// Fill an unset `floors_total` with the highest unit floor.
fn infer_floors_total(catalog: &mut Catalog) {
    for complex in &mut catalog.complexes {
        for building in &mut complex.buildings {
            if building.floors_total.is_some() {
                continue;
            }
            if let Some(max_floor) = building.max_unit_floor().filter(|floor| *floor >= 1) {
                building.floors_total = Some(max_floor);
                building.floors_total_source = FloorsTotalSource::Inferred;
                debug!(
                    building = building.label(),
                    floors_total = max_floor,
                    "inferred floors_total"
                );
            }
        }
    }
}

fn attach_diagnostics(catalog: &mut Catalog, issues: &[ValidationIssue]) {
    for issue in issues {
        let diagnostic = Diagnostic {
            kind: issue.kind,
            severity: issue.severity,
            message: issue.message.clone(),
        };
        if let Some(slot) = diagnostics_at(catalog, issue.location) {
            slot.push(diagnostic);
        }
    }
}

fn diagnostics_at(catalog: &mut Catalog, location: NodeLocation) -> Option<&mut Vec<Diagnostic>> {
    let complex = catalog.complexes.get_mut(location.complex)?;
    let Some(bi) = location.building else {
        return Some(&mut complex.diagnostics);
    };
    let building = complex.buildings.get_mut(bi)?;
    let Some(ui) = location.unit else {
        return Some(&mut building.diagnostics);
    };
    building.units.get_mut(ui).map(|unit| &mut unit.diagnostics)
}
