//! Reporting sink for bulk download runs.
//!
//! The engine only emits events; how they are rendered (progress bar,
//! plain lines, nothing at all) is up to the implementor.

use std::path::Path;

use super::DownloadError;

/// Running progress of a bulk download.
///
/// `completed` only ever increases. `label` names the item that completed
/// most recently, which is not necessarily the Nth input URL since
/// completion order follows response latency.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressState {
    completed: usize,
    label: String,
}

impl ProgressState {
    /// Creates an empty progress state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of jobs that reached a terminal state.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Label of the most recently completed item.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn advance(&mut self, label: impl Into<String>) {
        self.completed += 1;
        self.label = label.into();
    }
}

/// Receiver of bulk download events.
///
/// All methods default to no-ops. Implementations must be callable from
/// several tasks at once.
pub trait ProgressSink: Send + Sync {
    /// Emitted once before any job is dispatched.
    fn on_start(&self, _total: usize) {}

    /// A response arrived with a non-success status; its body is still written.
    fn on_status_warning(&self, _url: &str, _status: u16) {}

    /// A job finished writing its file.
    fn on_success(&self, _url: &str, _path: &Path, _bytes: u64) {}

    /// A job failed. Siblings are unaffected.
    fn on_failure(&self, _url: &str, _error: &DownloadError) {}

    /// Emitted after every terminal job, success or failure.
    fn on_progress(&self, _progress: &ProgressState) {}
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSink;

impl ProgressSink for SilentSink {}
