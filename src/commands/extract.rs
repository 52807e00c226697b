//! `dops extract-text`: print or save every regex match in a file.

use std::io::{self, Write};

use anyhow::{Context, Result};
use dops_core::extract;
use tracing::info;

use crate::cli::ExtractArgs;

pub(crate) fn run_extract_command(args: &ExtractArgs) -> Result<()> {
    let pattern = extract::compile_pattern(&args.regex)?;
    let text = extract::read_input(args.input.as_deref())?;
    let matches = extract::find_matches(&pattern, &text);
    info!(matches = matches.len(), "Extracted matches");

    if let Some(path) = args.output.as_deref() {
        extract::write_matches(path, &matches)?;
        return Ok(());
    }

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(extract::render_matches(&matches).as_bytes())
        .and_then(|()| stdout.flush())
        .context("Failed to write matches to stdout")?;
    Ok(())
}
