//! Download engine for bounded-concurrency bulk downloads.
//!
//! This module provides the [`DownloadEngine`], which fans out one task per
//! URL behind a semaphore-based admission gate and fans the results back in
//! over a completion channel.
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
//! let client = Arc::new(HttpClient::new()?);
//! let engine = DownloadEngine::new(3, client);
//! let urls = vec!["https://example.com/a.zip".to_string()];
//! let report = engine.run(&urls, Path::new("./downloads")).await;
//! println!("Completed: {}, Failed: {}", report.completed(), report.failed());
//! # Ok(())
//! # }
//! ```

mod task;

use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::FutureExt;
use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, info, instrument, warn};

pub use task::SavedFile;

use super::cancel::CancelFlag;
use super::client::Fetcher;
use super::sink::{ProgressSink, ProgressState, SilentSink};
use super::DownloadError;

/// Default concurrency if not specified.
pub const DEFAULT_CONCURRENCY: usize = 3;

/// One URL to fetch into one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadJob {
    url: String,
    destination_dir: PathBuf,
}

impl DownloadJob {
    /// Creates a job.
    #[must_use]
    pub fn new(url: impl Into<String>, destination_dir: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            destination_dir: destination_dir.into(),
        }
    }

    /// The URL to fetch.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Directory the file is written into. Empty means the working directory.
    #[must_use]
    pub fn destination_dir(&self) -> &Path {
        &self.destination_dir
    }
}

/// A job that finished writing its file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedDownload {
    /// Source URL.
    pub url: String,
    /// File written.
    pub saved: SavedFile,
}

/// A job that failed.
#[derive(Debug)]
pub struct FailedDownload {
    /// Source URL.
    pub url: String,
    /// Why it failed.
    pub error: DownloadError,
}

/// Outcome of one [`DownloadEngine::run`] call.
///
/// Per-item failures never turn a run into an error; callers that need
/// strict semantics check [`failed`](Self::failed) or
/// [`failures`](Self::failures).
#[derive(Debug, Default)]
pub struct DownloadReport {
    total: usize,
    completed: Vec<CompletedDownload>,
    failures: Vec<FailedDownload>,
    interrupted: bool,
    elapsed: Duration,
}

impl DownloadReport {
    /// Number of URLs the run was given.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of jobs that wrote their file.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.len()
    }

    /// Number of jobs that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Number of jobs that reached a terminal state.
    #[must_use]
    pub fn finished(&self) -> usize {
        self.completed() + self.failed()
    }

    /// Jobs never dispatched because the run was cancelled.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.total - self.finished()
    }

    /// Successful jobs in completion order.
    #[must_use]
    pub fn completed_downloads(&self) -> &[CompletedDownload] {
        &self.completed
    }

    /// Failed jobs in completion order.
    #[must_use]
    pub fn failures(&self) -> &[FailedDownload] {
        &self.failures
    }

    /// Total bytes written across successful jobs.
    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        self.completed.iter().map(|c| c.saved.bytes).sum()
    }

    /// True if the cancel flag stopped the run early.
    #[must_use]
    pub fn was_interrupted(&self) -> bool {
        self.interrupted
    }

    /// True if every job succeeded and nothing was skipped.
    #[must_use]
    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty() && self.skipped() == 0
    }

    /// Wall-clock duration of the run.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

/// Completion message sent by a transfer task exactly once.
struct JobResult {
    job: DownloadJob,
    outcome: Result<SavedFile, DownloadError>,
}

/// Download engine for concurrent bulk downloads.
///
/// # Concurrency Model
///
/// - Each job runs in its own Tokio task
/// - A permit from a per-run semaphore is acquired before spawning a job,
///   so at most `concurrency` transfers are ever in flight
/// - Permits are released when the task ends (RAII)
/// - Tasks report over a per-run channel; the dispatch loop drains it while
///   waiting for permits and returns once every task has reported
///
/// Runs share no state, so one engine may serve concurrent `run` calls.
pub struct DownloadEngine {
    concurrency: usize,
    fetcher: Arc<dyn Fetcher>,
    sink: Arc<dyn ProgressSink>,
    cancel: CancelFlag,
}

impl std::fmt::Debug for DownloadEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadEngine")
            .field("concurrency", &self.concurrency)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl DownloadEngine {
    /// Creates an engine. `concurrency` is clamped to at least 1.
    #[must_use]
    pub fn new(concurrency: usize, fetcher: Arc<dyn Fetcher>) -> Self {
        let concurrency = concurrency.max(1);
        debug!(concurrency, "creating download engine");
        Self {
            concurrency,
            fetcher,
            sink: Arc::new(SilentSink),
            cancel: CancelFlag::new(),
        }
    }

    /// Routes run events to `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Makes runs observe `cancel`.
    #[must_use]
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Returns the effective concurrency limit.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Downloads every URL into `output_dir`.
    ///
    /// Jobs are admitted in input order; completion order is whatever the
    /// network makes it. Returns once every dispatched job is terminal.
    /// An empty `urls` returns immediately without touching the filesystem.
    #[instrument(skip(self, urls), fields(jobs = urls.len(), output_dir = %output_dir.display()))]
    pub async fn run(&self, urls: &[String], output_dir: &Path) -> DownloadReport {
        let started = Instant::now();
        let mut report = DownloadReport {
            total: urls.len(),
            ..DownloadReport::default()
        };

        self.sink.on_start(urls.len());
        if urls.is_empty() {
            debug!("no jobs to dispatch");
            return report;
        }

        info!(concurrency = self.concurrency, "starting bulk download");

        let gate = Arc::new(Semaphore::new(self.concurrency));
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<JobResult>();
        let mut progress = ProgressState::new();
        let mut outstanding = 0usize;

        for url in urls {
            // Wait for a permit, recording completions that arrive meanwhile.
            let permit = loop {
                tokio::select! {
                    biased;
                    () = self.cancel.cancelled() => break None,
                    Some(result) = done_rx.recv() => {
                        outstanding -= 1;
                        self.record(result, &mut progress, &mut report);
                    }
                    acquired = Arc::clone(&gate).acquire_owned() => match acquired {
                        Ok(permit) => break Some(permit),
                        Err(_) => {
                            warn!("concurrency gate closed unexpectedly");
                            break None;
                        }
                    },
                }
            };
            let Some(permit) = permit else {
                report.interrupted = true;
                break;
            };

            let job = DownloadJob::new(url.as_str(), output_dir);
            debug!(url = %job.url(), "dispatching job");

            let fetcher = Arc::clone(&self.fetcher);
            let sink = Arc::clone(&self.sink);
            let cancel = self.cancel.clone();
            let done_tx = done_tx.clone();
            outstanding += 1;

            tokio::spawn(async move {
                // Permit is dropped when this block exits (RAII)
                let _permit = permit;
                let outcome = AssertUnwindSafe(task::transfer(
                    fetcher.as_ref(),
                    &job,
                    sink.as_ref(),
                    &cancel,
                ))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| Err(DownloadError::task_panicked(job.url())));
                // The receiver only disappears if the run future was dropped.
                let _ = done_tx.send(JobResult { job, outcome });
            });
        }

        drop(done_tx);
        debug!(outstanding, "waiting for downloads to complete");

        while let Some(result) = done_rx.recv().await {
            outstanding -= 1;
            self.record(result, &mut progress, &mut report);
        }
        debug_assert_eq!(outstanding, 0);

        if self.cancel.is_cancelled() {
            report.interrupted = true;
        }
        report.elapsed = started.elapsed();

        info!(
            completed = report.completed(),
            failed = report.failed(),
            skipped = report.skipped(),
            total = report.total(),
            "bulk download complete"
        );

        report
    }

    fn record(
        &self,
        result: JobResult,
        progress: &mut ProgressState,
        report: &mut DownloadReport,
    ) {
        let JobResult { job, outcome } = result;
        let url = job.url;

        match outcome {
            Ok(saved) => {
                info!(url = %url, path = %saved.path.display(), bytes = saved.bytes, "download completed");
                self.sink.on_success(&url, &saved.path, saved.bytes);
                let label = saved
                    .path
                    .file_name()
                    .map_or_else(|| url.clone(), |name| name.to_string_lossy().into_owned());
                progress.advance(label);
                report.completed.push(CompletedDownload { url, saved });
            }
            Err(error) => {
                warn!(url = %url, error = %error, "download failed");
                self.sink.on_failure(&url, &error);
                progress.advance(failure_label(&url));
                report.failures.push(FailedDownload { url, error });
            }
        }

        self.sink.on_progress(progress);
    }
}

/// Progress label for a failed job: the URL's last segment, or the URL.
fn failure_label(url: &str) -> String {
    match url.rsplit('/').next() {
        Some(segment) if !segment.is_empty() => segment.to_string(),
        _ => url.to_string(),
    }
}
