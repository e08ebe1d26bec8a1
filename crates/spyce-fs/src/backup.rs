//! Timestamped backup copies

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};

use crate::{Error, Result};

/// Template used when no backup format is given.
pub const DEFAULT_BACKUP_FORMAT: &str = "{path}.bck.{timestamp}";

const PLACEHOLDERS: &[&str] = &["path", "timestamp"];

/// Point in time rendered as `YYYYmmdd-HHMMSS` inside backup names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    pub fn now() -> Self {
        Self(Local::now().naive_local())
    }

    pub fn from_naive(value: NaiveDateTime) -> Self {
        Self(value)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y%m%d-%H%M%S"))
    }
}

/// Backup path template with `{path}` and `{timestamp}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupFormat {
    template: String,
}

impl Default for BackupFormat {
    fn default() -> Self {
        Self {
            template: DEFAULT_BACKUP_FORMAT.to_string(),
        }
    }
}

impl BackupFormat {
    /// Validate and wrap a template.
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        let invalid = |message: String| Error::InvalidBackupFormat {
            format: template.clone(),
            message,
        };

        let mut rest = template.as_str();
        while let Some(open) = rest.find('{') {
            let after = &rest[open + 1..];
            let close = after
                .find('}')
                .ok_or_else(|| invalid("unclosed '{'".to_string()))?;
            let name = &after[..close];
            if !PLACEHOLDERS.contains(&name) {
                return Err(invalid(format!("unknown placeholder {{{name}}}")));
            }
            rest = &after[close + 1..];
        }
        if template.trim().is_empty() {
            return Err(invalid("empty template".to_string()));
        }

        Ok(Self { template })
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Render the backup path for `path` at `timestamp`.
    pub fn render(&self, path: &Path, timestamp: Timestamp) -> PathBuf {
        PathBuf::from(
            self.template
                .replace("{path}", &path.to_string_lossy())
                .replace("{timestamp}", &timestamp.to_string()),
        )
    }

    /// Copy `path` to its rendered backup location.
    ///
    /// Refuses a template that renders back onto the source itself.
    pub fn backup(&self, path: &Path, timestamp: Timestamp) -> Result<PathBuf> {
        let backup_path = self.render(path, timestamp);
        if crate::io::is_same_file(path, &backup_path) {
            return Err(Error::InvalidBackupFormat {
                format: self.template.clone(),
                message: format!("backup path {} is the file itself", backup_path.display()),
            });
        }
        if let Some(parent) = backup_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        fs::copy(path, &backup_path).map_err(|e| Error::io(&backup_path, e))?;
        tracing::info!(
            source = %path.display(),
            backup = %backup_path.display(),
            "saved backup"
        );
        Ok(backup_path)
    }
}

impl fmt::Display for BackupFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}
