//! Scoped edits that write the document back only when it changed

use std::path::PathBuf;

use spyce_fs::{BackupFormat, Timestamp, is_same_file, write_preserving_mode};

use crate::error::Error;
use crate::spycy_file::SpycyFile;

/// Where and how a scoped edit writes its result.
#[derive(Debug, Clone, Default)]
pub struct RefactorOptions {
    /// Write here instead of the document's own path, even if nothing changed
    pub output: Option<PathBuf>,
    /// Copy the original aside before overwriting it in place
    pub backup: bool,
    pub backup_format: BackupFormat,
}

impl RefactorOptions {
    pub fn output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn backup(mut self, backup_format: BackupFormat) -> Self {
        self.backup = true;
        self.backup_format = backup_format;
        self
    }
}

/// Outcome of [`SpycyFile::refactor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refactored<T> {
    /// What the body returned
    pub value: T,
    /// File that was written, if any
    pub written: Option<PathBuf>,
    /// Backup copy that was made, if any
    pub backup: Option<PathBuf>,
}

impl SpycyFile {
    /// Run `body` against this document, then write it out.
    ///
    /// Without an explicit output the document is written back to its own
    /// path only if `body` changed it. With an output it is always written
    /// there. Permission bits of the original file carry over to the result.
    ///
    /// If `body` fails nothing is written; the in-memory document keeps
    /// whatever changes `body` made before failing.
    pub fn refactor<T, E, F>(
        &mut self,
        options: &RefactorOptions,
        body: F,
    ) -> std::result::Result<Refactored<T>, E>
    where
        F: FnOnce(&mut Self) -> std::result::Result<T, E>,
        E: From<Error>,
    {
        let target = match options.output.clone().or_else(|| self.path().map(PathBuf::from)) {
            Some(target) => target,
            None => {
                return Err(Error::PathNotSet {
                    file: self.name().to_string(),
                }
                .into());
            }
        };

        let before = self.version;
        let value = body(self)?;

        if options.output.is_none() && self.version == before {
            tracing::debug!(file = %self.name(), "no changes; nothing written");
            return Ok(Refactored {
                value,
                written: None,
                backup: None,
            });
        }

        let source = self.path().map(PathBuf::from);
        let in_place = source
            .as_deref()
            .is_some_and(|source| is_same_file(source, &target));

        let mut backup = None;
        if options.backup && in_place && target.exists() {
            let path = options
                .backup_format
                .backup(&target, Timestamp::now())
                .map_err(Error::from)?;
            backup = Some(path);
        }

        let mode_source = source.unwrap_or_else(|| target.clone());
        write_preserving_mode(&target, self.render().as_bytes(), &mode_source)
            .map_err(Error::from)?;
        if in_place {
            self.flushed_version = self.version;
        }
        tracing::info!(
            file = %self.name(),
            target = %target.display(),
            version = self.version,
            "wrote spycy file"
        );

        Ok(Refactored {
            value,
            written: Some(target),
            backup,
        })
    }
}
