//! URL list input for bulk downloads.
//!
//! The list format is deliberately dumb: one URL per line, nothing else.
//! Blank and whitespace-only lines are skipped; every other line is kept
//! verbatim, so no comment syntax and no trimming.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Default URL list filename.
pub const DEFAULT_INPUT_FILE: &str = "urls.txt";

/// The URL list could not be read. Fatal to a run.
#[derive(Debug, Error)]
pub enum InputError {
    /// Opening or reading the list failed.
    #[error("cannot read URL list {path}: {source}")]
    Read {
        /// The list path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Splits list text into URLs, one per non-blank line, in input order.
#[must_use]
pub fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads and parses a URL list file.
///
/// # Errors
///
/// Returns [`InputError::Read`] if the file cannot be opened or is not
/// valid UTF-8.
pub async fn read_url_list(path: &Path) -> Result<Vec<String>, InputError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| InputError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    let urls = parse_url_list(&text);
    debug!(path = %path.display(), urls = urls.len(), "read URL list");
    Ok(urls)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_parse_keeps_input_order_and_duplicates() {
        let urls = parse_url_list("https://a/1\nhttps://b/2\nhttps://a/1\n");
        assert_eq!(urls, vec!["https://a/1", "https://b/2", "https://a/1"]);
    }

    #[test]
    fn test_parse_skips_blank_and_whitespace_lines() {
        let urls = parse_url_list("\n   \nhttps://a/1\n\t\n\nhttps://b/2");
        assert_eq!(urls, vec!["https://a/1", "https://b/2"]);
    }

    #[test]
    fn test_parse_handles_crlf() {
        let urls = parse_url_list("https://a/1\r\nhttps://b/2\r\n");
        assert_eq!(urls, vec!["https://a/1", "https://b/2"]);
    }

    #[test]
    fn test_parse_does_not_treat_hash_as_comment() {
        let urls = parse_url_list("# https://a/1\n");
        assert_eq!(urls, vec!["# https://a/1"]);
    }

    #[test]
    fn test_parse_empty_text_yields_nothing() {
        assert!(parse_url_list("").is_empty());
        assert!(parse_url_list(" \n\n  \n").is_empty());
    }

    #[tokio::test]
    async fn test_read_url_list_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("urls.txt");
        std::fs::write(&path, "https://example.com/a.zip\nhttps://example.com/b.zip\n").unwrap();

        let urls = read_url_list(&path).await.unwrap();

        assert_eq!(urls.len(), 2);
        assert_eq!(urls[0], "https://example.com/a.zip");
    }

    #[tokio::test]
    async fn test_read_url_list_missing_file_is_input_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.txt");

        let err = read_url_list(&path).await.unwrap_err();

        let InputError::Read { path: reported, .. } = &err;
        assert_eq!(reported, &path);
        assert!(err.to_string().contains("missing.txt"));
    }
}
