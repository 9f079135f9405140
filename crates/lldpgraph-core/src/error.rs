//! Error types for graph builds.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for graph build operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors raised while scanning, parsing or writing.
///
/// Only `DirectoryNotFound` and `Write` abort a run; read and schema
/// failures are logged and the offending file or entry is skipped.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Input directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("Cannot read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unexpected content in {}: {reason}", path.display())]
    Schema { path: PathBuf, reason: String },

    #[error("Cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON encode error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl GraphError {
    pub fn schema(path: &Path, reason: impl Into<String>) -> Self {
        Self::Schema {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Whether the run has to stop on this error.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::DirectoryNotFound { .. } | Self::Write { .. } | Self::Serialize(_)
        )
    }
}
