//! Directory trees packed as gzip tarballs

use std::path::PathBuf;

use flate2::Compression as GzLevel;
use flate2::write::GzEncoder;
use spyce_core::{Payload, PayloadType};

use crate::error::{Error, Result};
use crate::file::file_name;
use crate::flavor::{Flavor, FlavorOptions, Settings};
use crate::kind::FlavorKind;

/// A directory, archived under its own name. Always bytes.
#[derive(Debug, Clone)]
pub struct DirFlavor {
    path: PathBuf,
    settings: Settings,
}

impl DirFlavor {
    pub fn new(path: impl Into<PathBuf>, options: FlavorOptions) -> Result<Self> {
        let path = path.into();
        if !path.is_dir() {
            return Err(Error::NotADirectory {
                category: FlavorKind::Dir.as_str(),
                path,
            });
        }
        let settings = options.resolve(FlavorKind::Dir, file_name(&path), PayloadType::Bytes)?;
        if settings.payload_type != PayloadType::Bytes {
            return Err(Error::UnsupportedType {
                category: FlavorKind::Dir.as_str(),
                payload_type: settings.payload_type,
            });
        }
        Ok(Self { path, settings })
    }

    fn archive(&self) -> std::io::Result<Vec<u8>> {
        let root = file_name(&self.path).unwrap_or_else(|| self.settings.name.clone());
        let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), GzLevel::best()));
        builder.follow_symlinks(false);
        builder.append_dir_all(&root, &self.path)?;
        builder.into_inner()?.finish()
    }
}

impl Flavor for DirFlavor {
    fn kind(&self) -> FlavorKind {
        FlavorKind::Dir
    }

    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn source(&self) -> Option<String> {
        Some(self.path.display().to_string())
    }

    fn produce_content(&self) -> Result<Payload> {
        let bytes = self
            .archive()
            .map_err(|e| spyce_fs::Error::io(&self.path, e))?;
        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "archived directory");
        Ok(Payload::Bytes(bytes))
    }
}
