//! Destinations for generated feed bytes.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::SinkError;

/// Where a feed ended up after a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedLocation {
    pub uri: String,
    pub bytes_written: usize,
}

/// Receives the generated document. Called at most once per run, and only
/// when generation was not blocked.
pub trait FeedSink {
    fn write(&mut self, bytes: &[u8]) -> Result<FeedLocation, SinkError>;
}

/// Writes the feed to a local file.
///
/// Bytes go to a staging file in the target directory first and are renamed
/// into place, so readers never observe a partially written feed.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "feed.xml".to_string());
        self.path.with_file_name(format!(".{name}.partial"))
    }

    fn io_error(&self, source: std::io::Error) -> SinkError {
        SinkError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl FeedSink for FileSink {
    fn write(&mut self, bytes: &[u8]) -> Result<FeedLocation, SinkError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        let staging = self.staging_path();
        fs::write(&staging, bytes).map_err(|source| self.io_error(source))?;
        if let Err(source) = fs::rename(&staging, &self.path) {
            let _ = fs::remove_file(&staging);
            return Err(self.io_error(source));
        }
        info!(path = %self.path.display(), bytes = bytes.len(), "feed written");
        Ok(FeedLocation {
            uri: self.path.display().to_string(),
            bytes_written: bytes.len(),
        })
    }
}

/// Keeps written feeds in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    bytes: Vec<u8>,
    writes: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes of the last write.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl FeedSink for MemorySink {
    fn write(&mut self, bytes: &[u8]) -> Result<FeedLocation, SinkError> {
        self.bytes = bytes.to_vec();
        self.writes += 1;
        Ok(FeedLocation {
            uri: "memory://feed.xml".to_string(),
            bytes_written: bytes.len(),
        })
    }
}
