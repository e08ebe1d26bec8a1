//! Show and extract command implementations

use std::io::Write;
use std::path::{Path, PathBuf};

use colored::Colorize;
use spyce_core::{Payload, SpycyFile};

use crate::error::Result;

/// Run the show command: decoded content on stdout, unchanged
pub fn run_show(input: &Path, name: &str) -> Result<()> {
    let file = SpycyFile::open(input)?;
    let payload = file.content(name)?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(payload.as_bytes())?;
    if let Payload::Text(text) = payload {
        if !text.is_empty() && !text.ends_with('\n') {
            stdout.write_all(b"\n")?;
        }
    }
    stdout.flush()?;
    Ok(())
}

/// Run the extract command
pub fn run_extract(
    input: &Path,
    name: &str,
    output: Option<PathBuf>,
    untar: Option<PathBuf>,
) -> Result<()> {
    let file = SpycyFile::open(input)?;
    let payload = file.content(name)?;
    match untar {
        Some(dir) => {
            payload.untar(&dir)?;
            println!("{} {} into {}", "unpacked".green(), name.cyan(), dir.display());
        }
        None => {
            let output = output.unwrap_or_else(|| PathBuf::from(name));
            payload.write_to(&output)?;
            println!(
                "{} {} to {} ({} bytes)",
                "extracted".green(),
                name.cyan(),
                output.display(),
                payload.len()
            );
        }
    }
    Ok(())
}
