//! Error types for the download module.
//!
//! Every variant is a per-item failure: the engine reports it to the sink
//! and keeps going. Nothing here aborts a batch.

use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of a per-item failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The GET could not be issued or the body could not be read.
    Transfer,
    /// The body could not be persisted locally.
    Write,
    /// The run was cancelled while the item was in flight.
    Cancelled,
}

/// Errors that can occur while transferring a single URL.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The optional per-request deadline elapsed.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// The provided URL is malformed or invalid.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// The URL has no final path segment to name the output file after.
    #[error("cannot derive a filename from {url}: final path segment is empty")]
    MissingFilename {
        /// The URL whose final segment was empty or unusable.
        url: String,
    },

    /// File system error while creating the directory or writing the file.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The run was cancelled before the transfer finished.
    #[error("download of {url} cancelled")]
    Cancelled {
        /// The URL whose transfer was abandoned.
        url: String,
    },

    /// The transfer task panicked.
    #[error("download task for {url} panicked")]
    TaskPanicked {
        /// The URL the panicking task was handling.
        url: String,
    },
}

impl DownloadError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates a missing-filename error.
    pub fn missing_filename(url: impl Into<String>) -> Self {
        Self::MissingFilename { url: url.into() }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a cancellation error.
    pub fn cancelled(url: impl Into<String>) -> Self {
        Self::Cancelled { url: url.into() }
    }

    /// Creates a task-panicked error.
    pub fn task_panicked(url: impl Into<String>) -> Self {
        Self::TaskPanicked { url: url.into() }
    }

    /// Classifies the error as a transfer, write, or cancellation failure.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Network { .. }
            | Self::Timeout { .. }
            | Self::InvalidUrl { .. }
            | Self::TaskPanicked { .. } => FailureKind::Transfer,
            Self::MissingFilename { .. } | Self::Io { .. } => FailureKind::Write,
            Self::Cancelled { .. } => FailureKind::Cancelled,
        }
    }
}

// No From<reqwest::Error> / From<std::io::Error>: every variant needs the
// url or path that the source error does not carry.
