use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

use crate::unpack::DEFAULT_LOG_FILE;

pub mod dir;
pub mod file;
pub mod info;

/// Log file flags shared by the unpack commands
#[derive(Args, Debug, Clone)]
pub struct LogArgs {
    /// Log file receiving per-block decode details
    #[arg(long, value_name = "PATH", default_value = DEFAULT_LOG_FILE)]
    pub log: PathBuf,

    /// Do not write a log file
    #[arg(long, conflicts_with = "log")]
    pub no_log: bool,
}

impl LogArgs {
    /// The log path, or None when logging is disabled
    pub fn path(&self) -> Option<&Path> {
        (!self.no_log).then_some(self.log.as_path())
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Unpack a single container
    File {
        /// Source container (.CGO/.DGO)
        source: PathBuf,

        /// Output file (defaults to the source with a U-prefixed extension, e.g. GAME.UCGO)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        log: LogArgs,
    },

    /// Unpack every container in a directory
    Dir {
        /// Source directory
        source: PathBuf,

        /// Output directory (defaults to writing next to each container)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also search subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// Container extension to pick up, repeatable (default: CGO, DGO)
        #[arg(short = 'e', long = "ext", value_name = "EXT")]
        extensions: Vec<String>,

        /// Suppress progress bar and per-file messages
        #[arg(short, long)]
        quiet: bool,

        #[command(flatten)]
        log: LogArgs,
    },

    /// Show the header and block table of a container
    Info {
        /// Source container
        source: PathBuf,

        /// Print the layout as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::File {
                source,
                output,
                log,
            } => file::execute(source, output.as_deref(), log.path()),
            Commands::Dir {
                source,
                output,
                recursive,
                extensions,
                quiet,
                log,
            } => dir::execute(
                source,
                output.as_deref(),
                *recursive,
                extensions,
                *quiet,
                log.path(),
            ),
            Commands::Info { source, json } => info::execute(source, *json),
        }
    }
}
