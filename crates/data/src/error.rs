use std::path::PathBuf;
use thiserror::Error;

/// Errors reading or writing flat-file state.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected layout in {}: {reason}", path.display())]
    Layout { path: PathBuf, reason: String },
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

/// Errors loading the account directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("account directory not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("malformed account directory: {0}")]
    Malformed(#[from] StorageError),
}
