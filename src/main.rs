//! CLI entry point for the dops toolkit.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

mod app;
mod cli;
mod commands;

use app::{config, terminal};
use cli::{Cli, Command};

/// Process outcome, mapped to the exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessExit {
    Success,
    Failure,
    Interrupted,
}

impl ProcessExit {
    fn code(self) -> ExitCode {
        match self {
            Self::Success => ExitCode::SUCCESS,
            Self::Failure => ExitCode::from(1),
            Self::Interrupted => ExitCode::from(130),
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let cli = Cli::parse();

    let default_level = terminal::resolve_default_log_level(cli.quiet, cli.debug, cli.verbose);
    terminal::init_tracing(default_level);
    debug!(?cli, "CLI arguments parsed");

    let exit = match &cli.command {
        Command::BulkDownload(args) => {
            let file_config = config::load_config(cli.config.as_deref())?;
            commands::run_bulkdownload_command(args, file_config.as_ref(), cli.quiet).await?
        }
        Command::ExtractText(args) => {
            commands::run_extract_command(args)?;
            ProcessExit::Success
        }
        Command::Modules(args) => {
            commands::run_modules_command(args)?;
            ProcessExit::Success
        }
    };

    Ok(exit.code())
}
