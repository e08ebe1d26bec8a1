//! spyce CLI
//!
//! Embed files, directories and URLs in source files, and keep them fresh
//! from a `.wok-project.yaml`.

mod cli;
mod commands;
mod error;
mod logging;

use std::error::Error as _;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, ColorChoice, Commands};
use error::Result;

fn main() {
    let cli = Cli::parse();
    match cli.color {
        ColorChoice::Always => colored::control::set_override(true),
        ColorChoice::Never => colored::control::set_override(false),
        ColorChoice::Auto => {}
    }
    logging::init(cli.verbose, cli.quiet);

    let trace = cli.trace;
    if let Err(e) = execute_command(cli.command) {
        eprintln!("{}: {}", "error".red().bold(), e);
        if trace {
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  {} {}", "caused by:".dimmed(), cause);
                source = cause.source();
            }
        }
        std::process::exit(1);
    }
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::List {
            input,
            filters,
            lines,
            no_header,
        } => commands::run_list(&input, &filters.patterns(), lines, !no_header),
        Commands::Show { input, name } => commands::run_show(&input, &name),
        Commands::Add {
            input,
            output,
            api,
            source,
            file,
            dir,
            url,
            inline,
            name,
            payload_type,
            position,
            gzip,
            base85,
            backup,
        } => {
            let dose = commands::Dose::from_args(api, source, file, dir, url, inline)?;
            let options = commands::flavor_options(name, payload_type, gzip, base85);
            let refactor = commands::refactor_options(output, &backup)?;
            commands::run_add(&input, dose, options, position, &refactor)
        }
        Commands::Extract {
            input,
            name,
            output,
            untar,
        } => commands::run_extract(&input, &name, output, untar),
        Commands::Del {
            input,
            output,
            filters,
            content_only,
            backup,
        } => {
            if filters.is_empty() {
                return Err(error::CliError::user(
                    "del needs at least one of --filter, --flavor or --from",
                ));
            }
            let refactor = commands::refactor_options(output, &backup)?;
            commands::run_del(&input, &filters.patterns(), content_only, &refactor)
        }
        Commands::Status { wok, json } => commands::run_status(wok, json),
        Commands::Diff { wok } => commands::run_diff(wok),
        Commands::Apply { wok, backup } => {
            let refactor = commands::refactor_options(None, &backup)?;
            commands::run_apply(wok, &refactor)
        }
    }
}
