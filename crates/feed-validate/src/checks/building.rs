//! Building-level checks.

use std::collections::BTreeSet;

use feed_model::{Building, IssueKind};

use super::Finding;

pub fn check(building: &Building) -> Vec<Finding> {
    let mut findings = Vec::new();

    if building.units.is_empty() {
        findings.push(Finding::new(
            IssueKind::EmptyBuilding,
            format!("building {} has no units", building.label()),
        ));
        return findings;
    }

    // Addresses compare case-insensitively; absent ones are a unit concern.
    let addresses: BTreeSet<String> = building
        .units
        .iter()
        .filter_map(|unit| unit.record.address.as_deref())
        .map(str::to_lowercase)
        .collect();
    if addresses.len() > 1 {
        findings.push(Finding::field(
            IssueKind::InconsistentBuildingAddress,
            "address",
            format!(
                "building {} has {} different addresses",
                building.label(),
                addresses.len()
            ),
        ));
    }

    let years: BTreeSet<i32> = building
        .units
        .iter()
        .filter_map(|unit| unit.record.built_year)
        .collect();
    if years.len() > 1 {
        let listed: Vec<String> = years.iter().map(ToString::to_string).collect();
        findings.push(Finding::field(
            IssueKind::InconsistentBuiltYear,
            "built_year",
            format!(
                "building {} states built years {}",
                building.label(),
                listed.join(", ")
            ),
        ));
    }

    findings
}
