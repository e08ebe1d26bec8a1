//! Error types for spyce-core

use crate::codec::CodecError;

/// Result type for spyce-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in spyce-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{file}@{line}: duplicated spyce {name:?}")]
    DuplicateJar {
        file: String,
        line: usize,
        name: String,
    },

    #[error("{file}@{line}: unexpected end of spyce {name:?} (open: {})", .open.as_deref().unwrap_or("<none>"))]
    UnexpectedEnd {
        file: String,
        line: usize,
        name: String,
        open: Option<String>,
    },

    #[error("{file}@{line}: configuration {key:?} must directly follow a start marker or another configuration line")]
    MisplacedConfiguration {
        file: String,
        line: usize,
        key: String,
    },

    #[error("{file}@{line}: invalid configuration value for {key:?}: {message}")]
    InvalidConfiguration {
        file: String,
        line: usize,
        key: String,
        message: String,
    },

    #[error("{file}@{line}: unknown spyce type {payload_type:?}")]
    UnknownPayloadType {
        file: String,
        line: usize,
        payload_type: String,
    },

    #[error("{file}@{line}: invalid marker: {message}")]
    InvalidMarker {
        file: String,
        line: usize,
        message: String,
    },

    #[error("Invalid spyce name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Invalid configuration key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("Invalid marker syntax: {message}")]
    InvalidMarkerSyntax { message: String },

    #[error("{file}: spyce {name:?}: {source}")]
    Codec {
        file: String,
        name: String,
        #[source]
        source: CodecError,
    },

    #[error("Spyce not found: {name}")]
    JarNotFound { name: String },

    #[error("Unknown anchor spyce: {name}")]
    UnknownAnchor { name: String },

    #[error("Invalid insert position at line {line}: {message}")]
    InvalidPosition { line: usize, message: String },

    #[error("Text spyce {name:?} contains a marker line at payload line {line}; store it as bytes")]
    MarkerInPayload { name: String, line: usize },

    #[error("{file}: path is not set and no output path was given")]
    PathNotSet { file: String },

    #[error("Invalid pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error(transparent)]
    Fs(#[from] spyce_fs::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn codec(file: &str, name: &str, source: CodecError) -> Self {
        Self::Codec {
            file: file.to_string(),
            name: name.to_string(),
            source,
        }
    }
}
