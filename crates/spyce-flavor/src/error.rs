//! Error types for spyce-flavor

use std::path::PathBuf;

use spyce_core::PayloadType;

/// Result type for spyce-flavor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building a flavor or producing its content
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown flavor category {category:?}")]
    UnknownCategory { category: String },

    #[error("{category} flavor: missing key {key:?}")]
    MissingKey {
        category: &'static str,
        key: &'static str,
    },

    #[error("{category} flavor: spyce name not set")]
    NameNotSet { category: &'static str },

    #[error("{category} flavor: {path} is not a file")]
    NotAFile {
        category: &'static str,
        path: PathBuf,
    },

    #[error("{category} flavor: {path} is not a directory")]
    NotADirectory {
        category: &'static str,
        path: PathBuf,
    },

    #[error("{category} flavor: type {payload_type} is not supported")]
    UnsupportedType {
        category: &'static str,
        payload_type: PayloadType,
    },

    #[error("{origin}: content is not valid UTF-8 text")]
    NotUtf8 { origin: String },

    #[error("Failed to fetch {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error(transparent)]
    Codec(#[from] spyce_core::CodecError),

    #[error(transparent)]
    Core(#[from] spyce_core::Error),

    #[error(transparent)]
    Fs(#[from] spyce_fs::Error),
}
