use std::collections::BTreeMap;

use chrono::{Datelike, Utc};

use feed_model::{IssueKind, Severity, ValidationIssue};

/// Maps each issue kind to the severity it is reported with.
///
/// Also carries the reference year for built-year checks, so validation
/// itself never reads the clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeverityPolicy {
    overrides: BTreeMap<IssueKind, Severity>,
    reference_year: i32,
}

impl Default for SeverityPolicy {
    fn default() -> Self {
        Self::new(Utc::now().year())
    }
}

impl SeverityPolicy {
    /// Default severities with an explicit reference year.
    pub fn new(reference_year: i32) -> Self {
        Self {
            overrides: BTreeMap::new(),
            reference_year,
        }
    }

    /// Escalate every warning to an error.
    pub fn strict() -> Self {
        Self::default().into_strict()
    }

    #[must_use]
    pub fn into_strict(mut self) -> Self {
        for kind in IssueKind::ALL {
            if kind.default_severity() == Severity::Warning {
                self.overrides.insert(kind, Severity::Error);
            }
        }
        self
    }

    #[must_use]
    pub fn with_override(mut self, kind: IssueKind, severity: Severity) -> Self {
        self.set(kind, severity);
        self
    }

    #[must_use]
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = year;
        self
    }

    pub fn set(&mut self, kind: IssueKind, severity: Severity) {
        if kind.default_severity() == severity {
            self.overrides.remove(&kind);
        } else {
            self.overrides.insert(kind, severity);
        }
    }

    pub fn severity_of(&self, kind: IssueKind) -> Severity {
        self.overrides
            .get(&kind)
            .copied()
            .unwrap_or_else(|| kind.default_severity())
    }

    pub fn is_overridden(&self, kind: IssueKind) -> bool {
        self.overrides.contains_key(&kind)
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    /// Re-grade an issue according to this policy.
    pub fn apply(&self, issue: ValidationIssue) -> ValidationIssue {
        let severity = self.severity_of(issue.kind);
        issue.with_severity(severity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_uses_kind_defaults() {
        let policy = SeverityPolicy::new(2026);
        for kind in IssueKind::ALL {
            assert_eq!(policy.severity_of(kind), kind.default_severity());
        }
    }

    #[test]
    fn strict_escalates_warnings() {
        let policy = SeverityPolicy::new(2026).into_strict();
        for kind in IssueKind::ALL {
            assert_eq!(policy.severity_of(kind), Severity::Error);
        }
        assert_eq!(policy.reference_year(), 2026);
    }

    #[test]
    fn overrides_can_demote_and_reset() {
        let mut policy =
            SeverityPolicy::new(2026).with_override(IssueKind::DuplicateId, Severity::Warning);
        assert_eq!(policy.severity_of(IssueKind::DuplicateId), Severity::Warning);
        assert!(policy.is_overridden(IssueKind::DuplicateId));
        policy.set(IssueKind::DuplicateId, Severity::Error);
        assert!(!policy.is_overridden(IssueKind::DuplicateId));
    }
}
