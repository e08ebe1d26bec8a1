//! Drift between a wok and the files on disk

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use spyce_core::SpycyFile;

use crate::error::Result;
use crate::wok::{Wok, WokFile, modified};

/// State of one spyce in its target file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpyceState {
    /// The target has no jar of that name (or no target at all)
    Missing,
    /// The stored jar differs from freshly produced content
    Outdated,
    UpToDate,
}

impl SpyceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Outdated => "outdated",
            Self::UpToDate => "up-to-date",
        }
    }
}

impl fmt::Display for SpyceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpyceStatus {
    pub name: String,
    pub state: SpyceState,
}

/// Report for one target file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileStatus {
    pub target: PathBuf,
    pub exists: bool,
    /// A separate source was modified after the target
    pub source_newer: bool,
    pub spyces: Vec<SpyceStatus>,
}

impl FileStatus {
    /// Applying the wok would not change this target.
    pub fn is_up_to_date(&self) -> bool {
        self.exists
            && !self.source_newer
            && self
                .spyces
                .iter()
                .all(|spyce| spyce.state == SpyceState::UpToDate)
    }
}

impl WokFile {
    /// Compare freshly produced content with what the target holds.
    pub fn status(&self) -> Result<FileStatus> {
        let spyces = self.produce()?;
        let target = self.target();
        let exists = target.is_file();

        let source_newer = exists
            && self.has_separate_source()
            && self.source().is_file()
            && modified(self.source())? > modified(target)?;

        let states = if exists {
            let file = SpycyFile::open(target)?;
            spyces
                .iter()
                .map(|spyce| {
                    let state = if !file.contains(&spyce.name) {
                        SpyceState::Missing
                    } else if file.is_up_to_date(spyce)? {
                        SpyceState::UpToDate
                    } else {
                        SpyceState::Outdated
                    };
                    Ok(SpyceStatus {
                        name: spyce.name.clone(),
                        state,
                    })
                })
                .collect::<Result<Vec<_>>>()?
        } else {
            spyces
                .iter()
                .map(|spyce| SpyceStatus {
                    name: spyce.name.clone(),
                    state: SpyceState::Missing,
                })
                .collect()
        };

        tracing::debug!(target = %target.display(), exists, source_newer, "checked wok file");
        Ok(FileStatus {
            target: target.to_path_buf(),
            exists,
            source_newer,
            spyces: states,
        })
    }
}

impl Wok {
    pub fn status(&self) -> Result<Vec<FileStatus>> {
        self.files().iter().map(WokFile::status).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use spyce_core::RefactorOptions;
    use spyce_flavor::{FlavorOptions, InlineFlavor};
    use spyce_test_utils::{SCRIPT, TestProject};

    fn wok_file(project: &TestProject, text: &str) -> WokFile {
        let mut wok_file = WokFile::new(project.path("tool.py"), None);
        wok_file.push(Box::new(
            InlineFlavor::new(text, FlavorOptions::named("greeting")).unwrap(),
        ));
        wok_file
    }

    fn states(status: &FileStatus) -> Vec<SpyceState> {
        status.spyces.iter().map(|spyce| spyce.state).collect()
    }

    #[test]
    fn missing_target_reports_everything_missing() {
        let project = TestProject::new();
        let status = wok_file(&project, "hello").status().unwrap();
        assert!(!status.exists);
        assert_eq!(states(&status), vec![SpyceState::Missing]);
        assert!(!status.is_up_to_date());
    }

    #[test]
    fn status_follows_apply_and_drift() {
        let project = TestProject::new();
        project.write("tool.py", SCRIPT);

        let before = wok_file(&project, "hello").status().unwrap();
        assert_eq!(states(&before), vec![SpyceState::Missing]);

        wok_file(&project, "hello")
            .apply(&RefactorOptions::default())
            .unwrap();
        let after = wok_file(&project, "hello").status().unwrap();
        assert_eq!(states(&after), vec![SpyceState::UpToDate]);
        assert!(after.is_up_to_date());

        let drifted = wok_file(&project, "hello again").status().unwrap();
        assert_eq!(states(&drifted), vec![SpyceState::Outdated]);
    }

    #[test]
    fn newer_source_is_flagged() {
        let project = TestProject::new();
        project.write("tool.py", SCRIPT);
        std::thread::sleep(std::time::Duration::from_millis(20));
        let source = project.write("templates/tool.py", SCRIPT);

        let wok_file = WokFile::new(project.path("tool.py"), Some(source));
        let status = wok_file.status().unwrap();
        assert!(status.exists);
        assert!(status.source_newer);
        assert!(!status.is_up_to_date());
    }

    #[test]
    fn state_labels() {
        assert_eq!(SpyceState::UpToDate.to_string(), "up-to-date");
        assert_eq!(SpyceState::Missing.as_str(), "missing");
    }
}
