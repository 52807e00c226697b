//! Regex-based text extraction.
//!
//! Finds every match of a pattern in a file (or stdin) and either prints the
//! matches or writes them to a file, one per line.

use std::io::Read;
use std::path::{Path, PathBuf};

use regex::Regex;
use thiserror::Error;
use tracing::debug;

/// Errors from the extract module.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The pattern is not a valid regular expression.
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// The rejected pattern.
        pattern: String,
        /// The regex compiler's complaint.
        #[source]
        source: regex::Error,
    },

    /// The input file or stdin could not be read.
    #[error("cannot read input {}: {source}", display_source(.path.as_deref()))]
    ReadInput {
        /// The input path, `None` for stdin.
        path: Option<PathBuf>,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The output file could not be written.
    #[error("cannot write matches to {path}: {source}")]
    WriteOutput {
        /// The output path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

fn display_source(path: Option<&Path>) -> String {
    path.map_or_else(|| "<stdin>".to_string(), |p| p.display().to_string())
}

/// Compiles `pattern`.
///
/// # Errors
///
/// Returns [`ExtractError::InvalidPattern`] if the pattern does not compile.
pub fn compile_pattern(pattern: &str) -> Result<Regex, ExtractError> {
    Regex::new(pattern).map_err(|source| ExtractError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Returns every non-overlapping match of `pattern` in `text`, in order.
#[must_use]
pub fn find_matches<'t>(pattern: &Regex, text: &'t str) -> Vec<&'t str> {
    pattern.find_iter(text).map(|m| m.as_str()).collect()
}

/// Reads the whole input: the file at `path`, or stdin when `None`.
///
/// # Errors
///
/// Returns [`ExtractError::ReadInput`] if reading fails or the input is not
/// valid UTF-8.
pub fn read_input(path: Option<&Path>) -> Result<String, ExtractError> {
    let read_error = |source| ExtractError::ReadInput {
        path: path.map(Path::to_path_buf),
        source,
    };
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(read_error),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(read_error)?;
            Ok(buffer)
        }
    }
}

/// Renders matches as newline-terminated lines.
#[must_use]
pub fn render_matches(matches: &[&str]) -> String {
    let mut out = String::with_capacity(matches.iter().map(|m| m.len() + 1).sum());
    for m in matches {
        out.push_str(m);
        out.push('\n');
    }
    out
}

/// Writes matches to `path`, creating or truncating it.
///
/// # Errors
///
/// Returns [`ExtractError::WriteOutput`] if the file cannot be written.
pub fn write_matches(path: &Path, matches: &[&str]) -> Result<(), ExtractError> {
    std::fs::write(path, render_matches(matches)).map_err(|source| ExtractError::WriteOutput {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), matches = matches.len(), "wrote matches");
    Ok(())
}
