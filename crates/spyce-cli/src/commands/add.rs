//! Add command implementation

use std::path::{Path, PathBuf};

use spyce_core::{Compression, Encoding, PayloadType, Position, RefactorOptions, SpycyFile};
use spyce_flavor::{
    ApiFlavor, DirFlavor, FileFlavor, Flavor, FlavorOptions, InlineFlavor, SourceFlavor,
    UrlFlavor,
};

use super::{report_edit, report_written};
use crate::error::{CliError, Result};

/// Where the new content comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dose {
    Api,
    Source(PathBuf),
    File(PathBuf),
    Dir(PathBuf),
    Url(String),
    Inline(String),
}

impl Dose {
    pub fn from_args(
        api: bool,
        source: Option<PathBuf>,
        file: Option<PathBuf>,
        dir: Option<PathBuf>,
        url: Option<String>,
        inline: Option<String>,
    ) -> Result<Self> {
        let dose = if api {
            Self::Api
        } else if let Some(path) = source {
            Self::Source(path)
        } else if let Some(path) = file {
            Self::File(path)
        } else if let Some(path) = dir {
            Self::Dir(path)
        } else if let Some(url) = url {
            Self::Url(url)
        } else if let Some(text) = inline {
            Self::Inline(text)
        } else {
            return Err(CliError::user(
                "one of --api, --source, --file, --dir, --url or --inline is required",
            ));
        };
        Ok(dose)
    }

    fn build(self, options: FlavorOptions) -> Result<Box<dyn Flavor>> {
        let flavor: Box<dyn Flavor> = match self {
            Self::Api => Box::new(ApiFlavor::new(options)?),
            Self::Source(path) => Box::new(SourceFlavor::new(path, options)?),
            Self::File(path) => Box::new(FileFlavor::new(path, options)?),
            Self::Dir(path) => Box::new(DirFlavor::new(path, options)?),
            Self::Url(url) => Box::new(UrlFlavor::new(url, options)?),
            Self::Inline(text) => Box::new(InlineFlavor::new(text, options)?),
        };
        Ok(flavor)
    }
}

pub fn flavor_options(
    name: Option<String>,
    payload_type: Option<PayloadType>,
    gzip: bool,
    base85: bool,
) -> FlavorOptions {
    FlavorOptions {
        name,
        payload_type,
        encoding: base85.then_some(Encoding::Base85),
        compression: gzip.then_some(Compression::Gzip),
    }
}

/// Run the add command
pub fn run_add(
    input: &Path,
    dose: Dose,
    options: FlavorOptions,
    position: Position,
    refactor: &RefactorOptions,
) -> Result<()> {
    let flavor = dose.build(options)?;
    let spyce = flavor.spyce()?;
    tracing::debug!(name = %spyce.name, kind = %flavor.kind(), "produced spyce");

    let mut file = SpycyFile::open(input)?;
    let done = file.refactor(refactor, |file| {
        file.set(spyce, position).map_err(CliError::from)
    })?;
    report_edit(&done.value);
    report_written(&done);
    Ok(())
}
