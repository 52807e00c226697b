//! dops core library
//!
//! This library provides the functionality behind the `dops` command-line
//! toolkit: a bounded-concurrency bulk downloader plus a few small text and
//! formatting utilities.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`download`] - Bounded-concurrency bulk download engine
//! - [`parser`] - URL list input
//! - [`extract`] - Regex-based text extraction
//! - [`modules`] - Catalog of the commands the CLI ships
//! - [`size`] - Human-readable byte sizes

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod download;
pub mod extract;
pub mod modules;
pub mod parser;
pub mod size;

// Re-export commonly used types
pub use download::{
    CancelFlag, DEFAULT_CONCURRENCY, DownloadEngine, DownloadError, DownloadReport, Fetcher,
    HttpClient, ProgressSink, ProgressState, Timeouts,
};
pub use parser::{DEFAULT_INPUT_FILE, InputError, parse_url_list, read_url_list};
