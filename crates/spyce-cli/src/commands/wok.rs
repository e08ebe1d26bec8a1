//! Wok commands: status, diff, apply

use std::path::PathBuf;

use colored::Colorize;
use spyce_core::{EditKind, RefactorOptions};
use spyce_wok::{SpyceState, Wok, find_wok_path, load_wok};

use super::{report_edit, report_written};
use crate::error::Result;

/// Load the given wok file, or the nearest one above the working directory.
fn open_wok(path: Option<PathBuf>) -> Result<Wok> {
    let path = match path {
        Some(path) => path,
        None => {
            let cwd = std::env::current_dir()?;
            find_wok_path(&cwd).ok_or(spyce_wok::Error::NotFound { start: cwd })?
        }
    };
    tracing::debug!(wok = %path.display(), "loading wok");
    Ok(load_wok(&path)?)
}

/// Run the status command
pub fn run_status(path: Option<PathBuf>, json: bool) -> Result<()> {
    let wok = open_wok(path)?;
    let report = wok.status()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for file in &report {
        let summary = if !file.exists {
            "missing".red()
        } else if file.is_up_to_date() {
            "up to date".green()
        } else {
            "outdated".yellow()
        };
        println!("{} ({summary})", file.target.display().to_string().bold());
        if file.source_newer {
            println!("  {}", "source is newer than target".yellow());
        }
        for spyce in &file.spyces {
            let state = match spyce.state {
                SpyceState::UpToDate => spyce.state.as_str().green(),
                SpyceState::Outdated => spyce.state.as_str().yellow(),
                SpyceState::Missing => spyce.state.as_str().red(),
            };
            println!("  {:<24} {state}", spyce.name);
        }
    }
    Ok(())
}

/// Run the diff command
pub fn run_diff(path: Option<PathBuf>) -> Result<()> {
    let wok = open_wok(path)?;
    for diff in wok.diff()? {
        if diff.is_empty() {
            continue;
        }
        for line in diff.unified.lines() {
            let line = if line.starts_with("+++") || line.starts_with("---") {
                line.bold()
            } else if line.starts_with('+') {
                line.green()
            } else if line.starts_with('-') {
                line.red()
            } else if line.starts_with("@@") {
                line.cyan()
            } else {
                line.normal()
            };
            println!("{line}");
        }
    }
    Ok(())
}

/// Run the apply command
pub fn run_apply(path: Option<PathBuf>, refactor: &RefactorOptions) -> Result<()> {
    let wok = open_wok(path)?;
    for (file, done) in wok.files().iter().zip(wok.apply(refactor)?) {
        println!("{}", file.target().display().to_string().bold());
        for edit in done.value.iter().filter(|e| e.kind != EditKind::Unchanged) {
            report_edit(edit);
        }
        report_written(&done);
    }
    Ok(())
}
