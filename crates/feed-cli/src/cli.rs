//! CLI argument definitions for the realty feed tool.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use feed_model::IssueKind;

#[derive(Parser)]
#[command(
    name = "realty-feed",
    version,
    about = "Realty feed generator - turn inventory sheets into an XML listing feed",
    long_about = "Turn real-estate inventory exports (CSV or JSON rows) into a validated\n\
                  XML feed for listing portals.\n\n\
                  Rows are normalized, grouped into complexes and buildings, validated,\n\
                  and serialized only when no blocking errors remain."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate an inventory export and write the XML feed.
    Generate(GenerateArgs),

    /// Validate an inventory export without generating a feed.
    Check(CheckArgs),

    /// List every validation rule with its default severity.
    Rules,
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Inventory export (.csv, .tsv or .json).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Feed destination (default: <INPUT> with an .xml extension).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Render warnings as <diagnostic> elements inside the feed.
    #[arg(long = "verbose-feed")]
    pub verbose_feed: bool,

    /// Run the whole pipeline but do not write the feed file.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Write the issue report as JSON.
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Omit <generation-date> (makes output depend on input only).
    #[arg(long = "no-generation-date", conflicts_with = "generation_date")]
    pub no_generation_date: bool,

    /// Use this RFC 3339 timestamp as the generation date instead of now.
    #[arg(long = "generation-date", value_name = "RFC3339")]
    pub generation_date: Option<DateTime<Utc>>,

    /// Country written into every offer location.
    #[arg(long = "country", value_name = "NAME")]
    pub country: Option<String>,

    #[command(flatten)]
    pub policy: PolicyArgs,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Inventory export (.csv, .tsv or .json).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Write the issue report as JSON.
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,

    #[command(flatten)]
    pub policy: PolicyArgs,
}

/// Severity policy flags.
#[derive(Args, Default)]
pub struct PolicyArgs {
    /// Treat every warning as a blocking error.
    #[arg(long = "strict")]
    pub strict: bool,

    /// Report this issue kind as an error (repeatable).
    #[arg(long = "error-on", value_name = "KIND")]
    pub error_on: Vec<IssueKind>,

    /// Report this issue kind as a warning (repeatable).
    ///
    /// Applied after --strict and --error-on.
    #[arg(long = "warn-on", value_name = "KIND")]
    pub warn_on: Vec<IssueKind>,

    /// Reference year for built-year checks (default: current year).
    #[arg(long = "reference-year", value_name = "YEAR")]
    pub reference_year: Option<i32>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
