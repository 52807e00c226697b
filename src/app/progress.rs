//! Console reporting for bulk download runs.

use std::path::Path;

use dops_core::download::{DownloadError, ProgressSink, ProgressState};
use dops_core::size::ByteSize1024;
use indicatif::{ProgressBar, ProgressStyle};

/// Prints per-item notices and drives an optional progress bar.
///
/// Notices go above the bar while it is visible and straight to the
/// terminal when it is hidden. Quiet mode keeps only failures.
pub(crate) struct ConsoleReporter {
    bar: ProgressBar,
    quiet: bool,
}

impl ConsoleReporter {
    pub(crate) fn new(show_bar: bool, quiet: bool) -> Self {
        let bar = if show_bar {
            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {wide_msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar
        } else {
            ProgressBar::hidden()
        };
        Self { bar, quiet }
    }

    pub(crate) fn finish(&self) {
        self.bar.finish_and_clear();
    }

    fn notice(&self, line: &str) {
        if self.quiet {
            return;
        }
        if self.bar.is_hidden() {
            println!("{line}");
        } else {
            self.bar.println(line);
        }
    }

    fn problem(&self, line: &str) {
        if self.bar.is_hidden() {
            eprintln!("{line}");
        } else {
            self.bar.println(line);
        }
    }
}

impl ProgressSink for ConsoleReporter {
    fn on_start(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.notice(&format!("Downloading {total} files"));
    }

    fn on_status_warning(&self, url: &str, status: u16) {
        self.problem(&status_warning_line(url, status));
    }

    fn on_success(&self, url: &str, path: &Path, bytes: u64) {
        self.notice(&success_line(url, path, bytes));
    }

    fn on_failure(&self, url: &str, error: &DownloadError) {
        self.problem(&failure_line(url, error));
    }

    fn on_progress(&self, progress: &ProgressState) {
        self.bar.set_position(progress.completed() as u64);
        self.bar.set_message(progress.label().to_string());
    }
}

fn status_warning_line(url: &str, status: u16) -> String {
    format!("WARN  {url} responded with status code {status}; saving the body anyway")
}

fn success_line(url: &str, path: &Path, bytes: u64) -> String {
    format!(
        "OK    {url} -> {} ({:#.1})",
        path.display(),
        ByteSize1024(bytes)
    )
}

fn failure_line(url: &str, error: &DownloadError) -> String {
    format!("FAIL  {url}: {error}")
}
