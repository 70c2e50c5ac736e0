use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use comfy_table::{Cell, Table};
use tracing::info_span;

use feed_cli::pipeline::{PipelineOptions, publish, run_file};
use feed_cli::types::{IssueReportFile, PipelineOutcome, RunResult};
use feed_model::{IssueKind, Severity};
use feed_report::{FeedOptions, FileSink, MemorySink};
use feed_validate::SeverityPolicy;

use crate::cli::{CheckArgs, GenerateArgs, PolicyArgs};
use crate::summary::{apply_table_style, severity_cell};

pub fn run_rules() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Kind", "Scope", "Default", "Description"]);
    apply_table_style(&mut table);
    for kind in IssueKind::ALL {
        table.add_row(vec![
            Cell::new(kind.code()),
            Cell::new(kind.scope().label()),
            severity_cell(kind.default_severity()),
            Cell::new(kind.description()),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_generate(args: &GenerateArgs) -> Result<RunResult> {
    let span = info_span!("generate", input = %args.input.display());
    let _guard = span.enter();

    let generation_date = if args.no_generation_date {
        None
    } else {
        Some(args.generation_date.unwrap_or_else(Utc::now))
    };
    let mut feed = FeedOptions {
        verbose: args.verbose_feed,
        generation_date,
        ..FeedOptions::default()
    };
    if let Some(country) = &args.country {
        feed.country.clone_from(country);
    }
    let options = PipelineOptions {
        policy: policy_from_args(&args.policy),
        feed,
    };

    let outcome = run_file(&args.input, &options)?;
    let location = if args.dry_run {
        publish(&outcome, &mut MemorySink::new())?
    } else {
        publish(&outcome, &mut FileSink::new(output_path(args)))?
    };

    write_report_if_requested(args.report.as_deref(), &args.input, &outcome)?;
    Ok(RunResult {
        input: args.input.clone(),
        outcome,
        location,
        dry_run: args.dry_run,
        report_path: args.report.clone(),
    })
}

pub fn run_check(args: &CheckArgs) -> Result<RunResult> {
    let span = info_span!("check", input = %args.input.display());
    let _guard = span.enter();

    let options = PipelineOptions {
        policy: policy_from_args(&args.policy),
        feed: FeedOptions::default(),
    };
    let outcome = run_file(&args.input, &options)?;
    write_report_if_requested(args.report.as_deref(), &args.input, &outcome)?;
    Ok(RunResult {
        input: args.input.clone(),
        outcome,
        location: None,
        dry_run: true,
        report_path: args.report.clone(),
    })
}

fn output_path(args: &GenerateArgs) -> PathBuf {
    args.output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("xml"))
}

/// Build the severity policy: defaults, then --strict, --error-on, --warn-on.
fn policy_from_args(args: &PolicyArgs) -> SeverityPolicy {
    let mut policy = SeverityPolicy::default();
    if let Some(year) = args.reference_year {
        policy = policy.with_reference_year(year);
    }
    if args.strict {
        policy = policy.into_strict();
    }
    for kind in &args.error_on {
        policy.set(*kind, Severity::Error);
    }
    for kind in &args.warn_on {
        policy.set(*kind, Severity::Warning);
    }
    policy
}

fn write_report_if_requested(
    path: Option<&Path>,
    input: &Path,
    outcome: &PipelineOutcome,
) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let report = IssueReportFile::new(input.display().to_string(), outcome);
    let json = serde_json::to_string_pretty(&report).context("serialize issue report")?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create report directory: {}", parent.display()))?;
    }
    fs::write(path, json).with_context(|| format!("write report: {}", path.display()))?;
    Ok(())
}
