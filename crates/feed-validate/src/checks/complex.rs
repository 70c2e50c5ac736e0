use feed_model::{Complex, IssueKind};

use super::Finding;

pub fn check(complex: &Complex) -> Vec<Finding> {
    let mut findings = Vec::new();
    if complex.buildings.is_empty() {
        findings.push(Finding::new(
            IssueKind::EmptyComplex,
            format!("complex {} has no buildings", complex.label()),
        ));
    }
    findings
}
