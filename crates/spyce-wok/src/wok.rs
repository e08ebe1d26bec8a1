//! Applying a wok: regenerate every listed spyce into its target file

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use spyce_core::{Edit, FileDiff, Position, RefactorOptions, Refactored, Spyce, SpycyFile};
use spyce_flavor::Flavor;
use spyce_fs::Timestamp;

use crate::error::{Error, Result};

/// The spyces one target file should carry.
#[derive(Debug)]
pub struct WokFile {
    target: PathBuf,
    source: PathBuf,
    flavors: Vec<Box<dyn Flavor>>,
}

impl WokFile {
    /// A target rebuilt from `source`, or from itself when there is none.
    pub fn new(target: impl Into<PathBuf>, source: Option<PathBuf>) -> Self {
        let target = target.into();
        Self {
            source: source.unwrap_or_else(|| target.clone()),
            target,
            flavors: Vec::new(),
        }
    }

    pub fn push(&mut self, flavor: Box<dyn Flavor>) {
        self.flavors.push(flavor);
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn flavors(&self) -> &[Box<dyn Flavor>] {
        &self.flavors
    }

    pub fn names(&self) -> Vec<&str> {
        self.flavors.iter().map(|flavor| flavor.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.flavors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flavors.is_empty()
    }

    pub(crate) fn has_separate_source(&self) -> bool {
        !spyce_fs::is_same_file(&self.source, &self.target)
    }

    /// Freshly produced spyces, in wok order.
    pub(crate) fn produce(&self) -> Result<Vec<Spyce>> {
        self.flavors
            .iter()
            .map(|flavor| {
                flavor.spyce().map_err(|source| Error::Produce {
                    target: self.target.clone(),
                    name: flavor.name().to_string(),
                    source,
                })
            })
            .collect()
    }

    /// Open whichever of source and target was modified last.
    ///
    /// Returns the document and whether it came from a separate source.
    fn open_input(&self) -> Result<(SpycyFile, bool)> {
        if !self.source.is_file() {
            return Err(Error::SourceMissing {
                target: self.target.clone(),
                missing: self.source.clone(),
            });
        }
        let from_source = self.has_separate_source()
            && (!self.target.is_file() || modified(&self.source)? > modified(&self.target)?);
        let input = if from_source {
            &self.source
        } else {
            &self.target
        };
        tracing::debug!(input = %input.display(), target = %self.target.display(), "opening wok input");
        Ok((SpycyFile::open(input)?, from_source))
    }

    /// Store every spyce into the target file.
    ///
    /// When the input is the target itself nothing is written unless a
    /// spyce changed. A target rebuilt from a separate source is always
    /// written, and a requested backup then copies the old target.
    pub fn apply(&self, options: &RefactorOptions) -> Result<Refactored<Vec<Edit>>> {
        let spyces = self.produce()?;
        let (mut file, from_source) = self.open_input()?;
        let mut options = options.clone();
        options.output = from_source.then(|| self.target.clone());
        tracing::info!(
            input = %file.name(),
            target = %self.target.display(),
            spyces = spyces.len(),
            "applying wok file"
        );

        let mut backup = None;
        if from_source && options.backup && self.target.is_file() {
            backup = Some(options.backup_format.backup(&self.target, Timestamp::now())?);
        }

        let mut done = file.refactor(&options, |file| {
            spyces
                .into_iter()
                .map(|spyce| file.set(spyce, Position::Auto).map_err(Error::from))
                .collect()
        })?;
        done.backup = done.backup.or(backup);
        Ok(done)
    }

    /// What [`WokFile::apply`] would change in the target, without writing.
    pub fn diff(&self) -> Result<FileDiff> {
        let spyces = self.produce()?;
        let (mut file, _) = self.open_input()?;
        for spyce in spyces {
            file.set(spyce, Position::Auto)?;
        }
        let current = if self.target.is_file() {
            spyce_fs::read_text(&self.target)?
        } else {
            String::new()
        };
        let name = self.target.display().to_string();
        Ok(FileDiff::compute(&current, &file.render(), &name, &name))
    }
}

pub(crate) fn modified(path: &Path) -> Result<SystemTime> {
    let meta = std::fs::metadata(path).map_err(|e| spyce_fs::Error::io(path, e))?;
    Ok(meta.modified().map_err(|e| spyce_fs::Error::io(path, e))?)
}

/// A loaded wok file: every target it lists.
#[derive(Debug)]
pub struct Wok {
    path: PathBuf,
    files: Vec<WokFile>,
}

impl Wok {
    pub fn new(path: impl Into<PathBuf>, files: Vec<WokFile>) -> Self {
        Self {
            path: path.into(),
            files,
        }
    }

    /// Where the wok was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn files(&self) -> &[WokFile] {
        &self.files
    }

    pub fn get(&self, target: &Path) -> Option<&WokFile> {
        self.files
            .iter()
            .find(|file| spyce_fs::is_same_file(file.target(), target))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Apply every file in order, stopping at the first failure.
    pub fn apply(&self, options: &RefactorOptions) -> Result<Vec<Refactored<Vec<Edit>>>> {
        self.files.iter().map(|file| file.apply(options)).collect()
    }

    pub fn diff(&self) -> Result<Vec<FileDiff>> {
        self.files.iter().map(WokFile::diff).collect()
    }
}
