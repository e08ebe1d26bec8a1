//! Error types for spyce-fs

use std::path::PathBuf;

/// Result type for spyce-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in spyce-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid backup format {format:?}: {message}")]
    InvalidBackupFormat { format: String, message: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
