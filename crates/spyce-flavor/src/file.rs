//! Flavors that read a single local file

use std::fs;
use std::path::{Path, PathBuf};

use spyce_core::{Payload, PayloadType};

use crate::error::{Error, Result};
use crate::flavor::{Flavor, FlavorOptions, Settings, typed_payload};
use crate::kind::FlavorKind;

/// Content of a file, stored as bytes unless told otherwise.
#[derive(Debug, Clone)]
pub struct FileFlavor {
    path: PathBuf,
    settings: Settings,
}

impl FileFlavor {
    pub fn new(path: impl Into<PathBuf>, options: FlavorOptions) -> Result<Self> {
        let path = path.into();
        check_file(FlavorKind::File, &path)?;
        let settings = options.resolve(FlavorKind::File, file_name(&path), PayloadType::Bytes)?;
        Ok(Self { path, settings })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Flavor for FileFlavor {
    fn kind(&self) -> FlavorKind {
        FlavorKind::File
    }

    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn source(&self) -> Option<String> {
        Some(self.path.display().to_string())
    }

    fn produce_content(&self) -> Result<Payload> {
        read_file(&self.path, self.settings.payload_type)
    }
}

/// Source code file, stored as text.
#[derive(Debug, Clone)]
pub struct SourceFlavor {
    path: PathBuf,
    settings: Settings,
}

impl SourceFlavor {
    pub fn new(path: impl Into<PathBuf>, options: FlavorOptions) -> Result<Self> {
        let path = path.into();
        check_file(FlavorKind::Source, &path)?;
        let settings = options.resolve(FlavorKind::Source, file_name(&path), PayloadType::Text)?;
        Ok(Self { path, settings })
    }
}

impl Flavor for SourceFlavor {
    fn kind(&self) -> FlavorKind {
        FlavorKind::Source
    }

    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn source(&self) -> Option<String> {
        Some(self.path.display().to_string())
    }

    fn produce_content(&self) -> Result<Payload> {
        read_file(&self.path, self.settings.payload_type)
    }
}

pub(crate) fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

fn check_file(kind: FlavorKind, path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(Error::NotAFile {
            category: kind.as_str(),
            path: path.to_path_buf(),
        })
    }
}

fn read_file(path: &Path, payload_type: PayloadType) -> Result<Payload> {
    let bytes = fs::read(path).map_err(|e| spyce_fs::Error::io(path, e))?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "read flavor source");
    typed_payload(payload_type, bytes, &path.display().to_string())
}
