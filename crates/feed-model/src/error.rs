use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown issue kind: {0}")]
    UnknownIssueKind(String),
    #[error("unknown severity: {0}")]
    UnknownSeverity(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
