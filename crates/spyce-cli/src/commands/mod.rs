//! Command implementations for spyce-cli

pub mod add;
pub mod del;
pub mod extract;
pub mod list;
pub mod wok;

use std::path::PathBuf;

use colored::Colorize;
use spyce_core::{Edit, EditKind, RefactorOptions, Refactored};
use spyce_fs::BackupFormat;

use crate::cli::BackupArgs;
use crate::error::Result;

pub use add::{Dose, flavor_options, run_add};
pub use del::run_del;
pub use extract::{run_extract, run_show};
pub use list::run_list;
pub use wok::{run_apply, run_diff, run_status};

/// Output path and backup flags as the core wants them.
pub fn refactor_options(output: Option<PathBuf>, backup: &BackupArgs) -> Result<RefactorOptions> {
    let mut options = RefactorOptions::default();
    if let Some(output) = output {
        options = options.output(output);
    }
    if backup.backup {
        options = options.backup(BackupFormat::new(backup.backup_format.clone())?);
    }
    Ok(options)
}

/// One line per edit: what happened to which spyce, and where.
pub(crate) fn report_edit(edit: &Edit) {
    let label = match edit.kind {
        EditKind::Insert => "added".green(),
        EditKind::Replace => "replaced".yellow(),
        EditKind::Delete => "removed".red(),
        EditKind::Unchanged => "unchanged".dimmed(),
    };
    if edit.kind == EditKind::Delete {
        println!("{label} {} (at line {})", edit.name.cyan(), edit.lines.start + 1);
    } else {
        println!(
            "{label} {} (lines {}-{})",
            edit.name.cyan(),
            edit.lines.start + 1,
            edit.lines.end
        );
    }
}

pub(crate) fn report_written<T>(done: &Refactored<T>) {
    if let Some(backup) = &done.backup {
        println!("{} {}", "backup".dimmed(), backup.display());
    }
    match &done.written {
        Some(path) => println!("{} {}", "wrote".green(), path.display()),
        None => println!("{}", "nothing to write".dimmed()),
    }
}
