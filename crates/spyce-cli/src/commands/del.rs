//! Del command implementation

use std::path::Path;

use spyce_core::{Pattern, RefactorOptions, SpycyFile};

use super::{report_edit, report_written};
use crate::error::{CliError, Result};

/// Run the del command
pub fn run_del(
    input: &Path,
    filters: &[Pattern],
    content_only: bool,
    refactor: &RefactorOptions,
) -> Result<()> {
    let mut file = SpycyFile::open(input)?;
    let names: Vec<String> = file.filter(filters).into_iter().map(String::from).collect();
    if names.is_empty() {
        tracing::warn!(file = %input.display(), "no spyce matches the filters");
    }

    let done = file.refactor(refactor, |file| {
        names
            .iter()
            .map(|name| file.delete(name, content_only).map_err(CliError::from))
            .collect::<Result<Vec<_>>>()
    })?;
    for edit in &done.value {
        report_edit(edit);
    }
    report_written(&done);
    Ok(())
}
