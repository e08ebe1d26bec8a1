//! List command implementation

use std::path::Path;

use colored::Colorize;
use spyce_core::{Pattern, SpycyFile};

use crate::error::Result;

const HEADER: [&str; 4] = ["name", "type", "lines", "size"];

/// Run the list command
pub fn run_list(input: &Path, filters: &[Pattern], show_lines: bool, show_header: bool) -> Result<()> {
    let file = SpycyFile::open(input)?;
    let names = file.filter(filters);
    if names.is_empty() {
        return Ok(());
    }

    let mut rows = Vec::with_capacity(names.len());
    for name in &names {
        let jar = file.get(name)?;
        let size: usize = jar
            .lines(file.lines(), true)
            .iter()
            .map(|line| line.chars().count())
            .sum();
        rows.push([
            jar.name().to_string(),
            jar.payload_type().to_string(),
            format!("{}:{}", jar.start() + 1, jar.end()),
            size.to_string(),
        ]);
    }

    let mut widths = HEADER.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }
    let format_row = |cells: [&str; 4]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:width$}"))
            .collect::<Vec<_>>()
            .join(" ")
            .trim_end()
            .to_string()
    };

    if show_header {
        println!("{}", format_row(HEADER).as_str().bold());
        println!("{}", format_row(widths.map(|w| "-".repeat(w)).each_ref().map(String::as_str)));
    }
    for (name, row) in names.iter().zip(&rows) {
        println!("{}", format_row(row.each_ref().map(String::as_str)));
        if show_lines {
            let jar = file.get(name)?;
            for (offset, line) in jar.lines(file.lines(), true).iter().enumerate() {
                let number = jar.start() + offset + 1;
                let number = format!("{number:<6}");
                println!("  {} {}", number.as_str().dimmed(), line.trim_end());
            }
        }
    }
    Ok(())
}
