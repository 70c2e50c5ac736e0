//! Feed pipeline with explicit stages.
//!
//! 1. **Normalize**: raw rows to typed unit records
//! 2. **Build**: group records into the catalog tree
//! 3. **Validate**: run rules, grade issues, attach diagnostics
//! 4. **Generate**: serialize the feed, unless blocked by errors
//! 5. **Publish**: hand the bytes to a [`FeedSink`]
//!
//! Stages 1–4 are pure; only publishing performs I/O.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info, info_span, warn};

use feed_core::build;
use feed_ingest::{RawRow, normalize_rows, read_rows};
use feed_report::{FeedLocation, FeedOptions, FeedSink, generate};
use feed_validate::{SeverityPolicy, validate};

use crate::types::PipelineOutcome;

/// Options shared by every stage.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub policy: SeverityPolicy,
    pub feed: FeedOptions,
}

/// Read an input export and run the pipeline on it.
pub fn run_file(path: &Path, options: &PipelineOptions) -> Result<PipelineOutcome> {
    let span = info_span!("input", path = %path.display());
    let _guard = span.enter();
    let rows = read_rows(path).with_context(|| format!("read rows: {}", path.display()))?;
    run_pipeline(&rows, options)
}

/// Run normalization, building, validation and generation over raw rows.
pub fn run_pipeline(rows: &[RawRow], options: &PipelineOptions) -> Result<PipelineOutcome> {
    let start = Instant::now();

    let batch = {
        let _stage = info_span!("normalize").entered();
        normalize_rows(rows)
    };
    info!(
        rows = rows.len(),
        records = batch.records.len(),
        field_errors = batch.field_errors.len(),
        "normalized"
    );
    let rejected_rows = batch.rejected_rows();

    let built = build(batch.records);
    let (catalog, report) = validate(built.catalog, built.issues, &options.policy);

    let feed = if report.has_errors() {
        warn!(
            errors = report.error_count(),
            "feed generation blocked by validation errors"
        );
        None
    } else {
        Some(generate(&catalog, &options.feed).context("generate feed")?)
    };

    debug!(elapsed_ms = start.elapsed().as_millis(), "pipeline finished");
    Ok(PipelineOutcome {
        rows_read: rows.len(),
        rejected_rows,
        catalog,
        report,
        field_errors: batch.field_errors,
        feed,
    })
}

/// Write the generated feed through `sink`. Blocked outcomes write nothing.
pub fn publish(outcome: &PipelineOutcome, sink: &mut dyn FeedSink) -> Result<Option<FeedLocation>> {
    let Some(bytes) = outcome.feed.as_deref() else {
        return Ok(None);
    };
    let location = sink.write(bytes).context("write feed")?;
    Ok(Some(location))
}
