//! Error types for row ingestion.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading row exports.
///
/// These are operational failures (unreadable files, malformed containers).
/// Bad cell values never end up here; they become
/// [`FieldError`](feed_model::FieldError)s during normalization.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid JSON rows: {0}")]
    Json(#[from] serde_json::Error),

    #[error("input has no header row")]
    NoHeaders,

    #[error("unsupported input format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, IngestError>;
