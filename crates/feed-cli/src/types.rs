use std::path::PathBuf;

use serde::Serialize;

use feed_model::{Catalog, FieldError, ValidationIssue};
use feed_report::{FeedLocation, feed_digest};
use feed_validate::ValidationReport;

/// Everything one pipeline pass produced.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub rows_read: usize,
    /// Rows dropped by the normalizer.
    pub rejected_rows: usize,
    pub catalog: Catalog,
    pub report: ValidationReport,
    pub field_errors: Vec<FieldError>,
    /// Generated document; `None` when blocked by error-severity issues.
    pub feed: Option<Vec<u8>>,
}

impl PipelineOutcome {
    pub fn is_blocked(&self) -> bool {
        self.feed.is_none()
    }

    pub fn records(&self) -> usize {
        self.catalog.unit_count()
    }

    pub fn digest(&self) -> Option<String> {
        self.feed.as_deref().map(feed_digest)
    }
}

/// Result of a CLI command, used for the summary and exit code.
#[derive(Debug)]
pub struct RunResult {
    pub input: PathBuf,
    pub outcome: PipelineOutcome,
    /// Where the feed was written; `None` for checks and blocked runs.
    pub location: Option<FeedLocation>,
    pub dry_run: bool,
    pub report_path: Option<PathBuf>,
}

impl RunResult {
    pub fn has_errors(&self) -> bool {
        self.outcome.is_blocked()
    }
}

/// JSON issue report written with `--report`.
#[derive(Debug, Serialize)]
pub struct IssueReportFile<'a> {
    pub input: String,
    pub generated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    pub rows_read: usize,
    pub rejected_rows: usize,
    pub units: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub field_errors: &'a [FieldError],
    pub issues: &'a [ValidationIssue],
}

impl<'a> IssueReportFile<'a> {
    pub fn new(input: String, outcome: &'a PipelineOutcome) -> Self {
        Self {
            input,
            generated: !outcome.is_blocked(),
            digest: outcome.digest(),
            rows_read: outcome.rows_read,
            rejected_rows: outcome.rejected_rows,
            units: outcome.records(),
            error_count: outcome.report.error_count(),
            warning_count: outcome.report.warning_count(),
            field_errors: &outcome.field_errors,
            issues: &outcome.report.issues,
        }
    }
}
