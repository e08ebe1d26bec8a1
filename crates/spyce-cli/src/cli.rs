//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use spyce_core::{PayloadType, Pattern, Position};
use spyce_fs::DEFAULT_BACKUP_FORMAT;

/// spyce - embed files, directories and URLs in source files
#[derive(Parser, Debug)]
#[command(name = "spyce")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (repeatable)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Show the full cause chain of an error
    #[arg(long, global = true)]
    pub trace: bool,

    /// When to color the output
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List the spyces of a file
    List {
        /// Input file
        input: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        /// Print every line of each spyce
        #[arg(short, long)]
        lines: bool,

        /// Do not print the table header
        #[arg(short = 'H', long)]
        no_header: bool,
    },

    /// Print the decoded content of a spyce
    Show {
        input: PathBuf,
        name: String,
    },

    /// Add or replace a spyce
    ///
    /// Examples:
    ///   spyce add tool.py -f img/logo.png          # bytes spyce "logo.png"
    ///   spyce add tool.py -s lib/helpers.py -n helpers
    ///   spyce add tool.py -d assets -z             # gzip tarball
    ///   spyce add tool.py -a                       # get_spyce() reader
    #[command(visible_alias = "set")]
    #[command(group(ArgGroup::new("dose").required(true).args(["api", "source", "file", "dir", "url", "inline"])))]
    Add {
        input: PathBuf,

        /// Write the result here instead of changing the input in place
        output: Option<PathBuf>,

        /// The get_spyce() reader
        #[arg(short, long)]
        api: bool,

        /// A text file
        #[arg(short, long, value_name = "PATH")]
        source: Option<PathBuf>,

        /// A file, bytes unless --type says otherwise
        #[arg(short, long, value_name = "PATH")]
        file: Option<PathBuf>,

        /// A directory, stored as a tarball
        #[arg(short, long, value_name = "PATH")]
        dir: Option<PathBuf>,

        /// The body of an HTTP GET
        #[arg(short, long)]
        url: Option<String>,

        /// Literal text
        #[arg(short, long, value_name = "TEXT")]
        inline: Option<String>,

        /// Spyce name (default: derived from the path or URL)
        #[arg(short, long)]
        name: Option<String>,

        /// Spyce type: text or bytes
        #[arg(short = 't', long = "type")]
        payload_type: Option<PayloadType>,

        /// auto, start, end, before:NAME, after:NAME or line:N
        #[arg(long, default_value = "auto", value_parser = parse_position)]
        position: Position,

        /// Gzip bytes before encoding
        #[arg(short = 'z', long)]
        gzip: bool,

        /// Encode bytes as base85 instead of base64
        #[arg(long)]
        base85: bool,

        #[command(flatten)]
        backup: BackupArgs,
    },

    /// Write the content of a spyce to a file
    Extract {
        input: PathBuf,
        name: String,

        /// Output file (default: the spyce name)
        #[arg(short, long, conflicts_with = "untar")]
        output: Option<PathBuf>,

        /// Unpack a tarball spyce into this directory
        #[arg(long, value_name = "DIR")]
        untar: Option<PathBuf>,
    },

    /// Remove spyces
    Del {
        input: PathBuf,

        /// Write the result here instead of changing the input in place
        output: Option<PathBuf>,

        #[command(flatten)]
        filters: FilterArgs,

        /// Keep the markers, drop only the content
        #[arg(long)]
        content_only: bool,

        #[command(flatten)]
        backup: BackupArgs,
    },

    /// Report which spyces of the wok are missing or outdated
    Status {
        /// Wok file (default: nearest .wok-project.yaml)
        wok: Option<PathBuf>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Preview what apply would change
    Diff {
        wok: Option<PathBuf>,
    },

    /// Store every spyce of the wok into its file
    Apply {
        wok: Option<PathBuf>,

        #[command(flatten)]
        backup: BackupArgs,
    },
}

/// Spyce selection; all given patterns must match.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Pattern on name and type, e.g. 'logo*', ':bytes', '~api'
    #[arg(short, long = "filter", value_name = "[~][NAME][:TYPE]")]
    pub filter: Vec<Pattern>,

    /// Pattern on the flavor tag
    #[arg(long = "flavor", value_name = "[~]GLOB", value_parser = Pattern::flavor)]
    pub flavor: Vec<Pattern>,

    /// Pattern on the source path or URL
    #[arg(long = "from", value_name = "[~]GLOB", value_parser = Pattern::source)]
    pub source: Vec<Pattern>,
}

impl FilterArgs {
    pub fn patterns(&self) -> Vec<Pattern> {
        self.filter
            .iter()
            .chain(&self.flavor)
            .chain(&self.source)
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.filter.is_empty() && self.flavor.is_empty() && self.source.is_empty()
    }
}

#[derive(Args, Debug, Clone)]
pub struct BackupArgs {
    /// Keep a copy of the file before changing it
    #[arg(short, long)]
    pub backup: bool,

    /// Backup file name template
    #[arg(short = 'B', long, default_value = DEFAULT_BACKUP_FORMAT)]
    pub backup_format: String,
}

fn parse_position(value: &str) -> Result<Position, String> {
    let position = match value.split_once(':') {
        None => match value {
            "auto" => Position::Auto,
            "start" => Position::Start,
            "end" => Position::End,
            _ => return Err(format!("unknown position {value:?}")),
        },
        Some(("before", name)) if !name.is_empty() => Position::Before(name.to_string()),
        Some(("after", name)) if !name.is_empty() => Position::After(name.to_string()),
        Some(("line", line)) => Position::Line(
            line.parse()
                .map_err(|e| format!("invalid line {line:?}: {e}"))?,
        ),
        Some(_) => return Err(format!("unknown position {value:?}")),
    };
    Ok(position)
}
