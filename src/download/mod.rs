//! Bounded-concurrency bulk downloader.
//!
//! This module downloads a list of URLs into a directory with a fixed cap on
//! parallel transfers, reporting progress and per-item outcomes to a
//! [`ProgressSink`].
//!
//! # Features
//!
//! - Streaming downloads (memory-efficient for large files)
//! - Filename taken from the URL's final path segment
//! - Non-success HTTP statuses are warnings; the body is still written
//! - Per-item failures never abort the batch; they are collected in the
//!   [`DownloadReport`]
//! - Optional per-request deadlines and cooperative cancellation
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use dops_core::download::{DownloadEngine, HttpClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = DownloadEngine::new(5, Arc::new(HttpClient::new()?));
//! let urls = vec!["https://example.com/archive.tar.gz".to_string()];
//! let report = engine.run(&urls, Path::new("./downloads")).await;
//! for failure in report.failures() {
//!     eprintln!("{}: {}", failure.url, failure.error);
//! }
//! # Ok(())
//! # }
//! ```

mod cancel;
mod client;
mod engine;
mod error;
mod filename;
mod sink;

pub use cancel::CancelFlag;
pub use client::{BodyStream, FetchResponse, Fetcher, HttpClient, Timeouts};
pub use engine::{
    CompletedDownload, DEFAULT_CONCURRENCY, DownloadEngine, DownloadJob, DownloadReport,
    FailedDownload, SavedFile,
};
pub use error::{DownloadError, FailureKind};
pub use filename::filename_from_url;
pub use sink::{ProgressSink, ProgressState, SilentSink};

// No module-local Result aliases: use `Result<T, DownloadError>` explicitly.
