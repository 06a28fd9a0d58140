use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::application::data::LogLevel;
use crate::config::SETTINGS_FILE_NAME;

/// Turn tree-style directory listings into real files and directories
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(long, short, default_value = "warn", value_enum, global = true)]
    pub log_level: LogLevel,

    /// Settings file with defaults for the other options
    #[clap(long, short, default_value = SETTINGS_FILE_NAME, global = true)]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the files and directories described by a tree listing
    Create {
        /// File holding the tree text, or `-` for stdin
        input: String,
        /// Directory the tree is created in
        #[clap(long, short)]
        target: Option<String>,
        /// Report what would be created without touching the disk
        #[clap(long)]
        dry_run: bool,
    },
    /// Print every path a tree listing would create
    Preview {
        /// File holding the tree text, or `-` for stdin
        input: String,
        /// Directory the paths are placed under
        #[clap(long, short)]
        target: Option<String>,
    },
    /// Print an existing directory as tree text
    Render {
        dir: PathBuf,
        /// How many levels below the directory to descend
        #[clap(long, short = 'd')]
        max_depth: Option<usize>,
    },
}
