//! Error types for spyce-wok

use std::path::PathBuf;

/// Result type for wok operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("wok file {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("wok file {}, section {section}: {message}", .path.display())]
    Invalid {
        path: PathBuf,
        section: String,
        message: String,
    },

    #[error("wok file {}, section {section}: {source}", .path.display())]
    Flavor {
        path: PathBuf,
        section: String,
        #[source]
        source: spyce_flavor::Error,
    },

    #[error("{}: spyce {name:?}: {source}", .target.display())]
    Produce {
        target: PathBuf,
        name: String,
        #[source]
        source: spyce_flavor::Error,
    },

    #[error("{}: source file {} missing", .target.display(), .missing.display())]
    SourceMissing { target: PathBuf, missing: PathBuf },

    #[error("No {} found in {} or any parent directory", crate::WOK_FILE_NAME, .start.display())]
    NotFound { start: PathBuf },

    #[error(transparent)]
    Core(#[from] spyce_core::Error),

    #[error(transparent)]
    Fs(#[from] spyce_fs::Error),
}

impl Error {
    pub(crate) fn invalid(
        path: impl Into<PathBuf>,
        section: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Invalid {
            path: path.into(),
            section: section.into(),
            message: message.into(),
        }
    }
}
