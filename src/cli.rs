//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// DevOps command-line toolkit.
///
/// Bulk downloads, regex text extraction, and a catalog of the modules
/// shipped with dops.
#[derive(Parser, Debug)]
#[command(name = "dops")]
#[command(author, version, about, arg_required_else_help = true)]
pub struct Cli {
    /// Increase output verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Read defaults from this config file instead of the XDG location
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available modules.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download multiple files from a list
    #[command(name = "bulkdownload", visible_alias = "bd")]
    BulkDownload(BulkDownloadArgs),

    /// Extracts text using regex from a file
    #[command(name = "extract-text")]
    ExtractText(ExtractArgs),

    /// List and search modules
    #[command(name = "modules", visible_alias = "mods")]
    Modules(ModulesArgs),
}

/// Arguments for `dops bulkdownload`.
#[derive(Args, Debug, Clone, Default)]
pub struct BulkDownloadArgs {
    /// Load URLs from FILE, one per line [default: urls.txt]
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Save the downloaded files to DIR [default: current directory]
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Download NUMBER files concurrently [default: 3]
    #[arg(short, long, value_name = "NUMBER", value_parser = clap::value_parser!(u16))]
    pub concurrent: Option<u16>,

    /// Give up on a single download after SECS seconds [default: no deadline]
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub timeout: Option<u64>,

    /// Give up connecting after SECS seconds [default: no deadline]
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub connect_timeout: Option<u64>,

    /// Exit with a non-zero status if any download failed
    #[arg(long)]
    pub fail_on_error: bool,
}

/// Arguments for `dops extract-text`.
#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    /// Extract matching strings with PATTERN
    #[arg(short, long, value_name = "PATTERN")]
    pub regex: String,

    /// Use FILE as input [default: stdin]
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Write matches to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for `dops modules`.
#[derive(Args, Debug, Clone, Default)]
pub struct ModulesArgs {
    /// Search for modules whose name matches PATTERN (regex)
    #[arg(short, long, value_name = "PATTERN")]
    pub search: Option<String>,

    /// List all modules
    #[arg(short, long, visible_alias = "ls")]
    pub list: bool,

    /// Describe all modules
    #[arg(short, long)]
    pub describe: bool,

    /// Describe all modules as Markdown
    #[arg(short, long, visible_alias = "md")]
    pub markdown: bool,

    /// Count all modules
    #[arg(short, long)]
    pub count: bool,
}
