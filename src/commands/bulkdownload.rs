//! `dops bulkdownload`: download every URL in a list file.

use std::fmt::Write as _;
use std::io::{self, IsTerminal};
use std::sync::Arc;

use anyhow::{Context, Result};
use dops_core::size::ByteSize1024;
use dops_core::{
    CancelFlag, DownloadEngine, DownloadReport, HttpClient, ProgressSink, read_url_list,
};
use tracing::{info, warn};

use crate::ProcessExit;
use crate::app::config::{self, FileConfig};
use crate::app::progress::ConsoleReporter;
use crate::app::{exit_handler, terminal};
use crate::cli::BulkDownloadArgs;

pub(crate) async fn run_bulkdownload_command(
    args: &BulkDownloadArgs,
    file_config: Option<&FileConfig>,
    quiet: bool,
) -> Result<ProcessExit> {
    let settings = config::resolve_bulkdownload(args, file_config);

    let urls = read_url_list(&settings.input)
        .await
        .context("Cannot load the URL list")?;
    info!(
        input = %settings.input.display(),
        urls = urls.len(),
        concurrency = settings.concurrency,
        "Loaded URL list"
    );

    let client = HttpClient::with_timeouts(settings.timeouts)
        .context("Failed to build the HTTP client")?;

    let show_bar = terminal::should_use_progress_bar(
        io::stderr().is_terminal(),
        quiet,
        terminal::is_dumb_terminal(),
    );
    let reporter = Arc::new(ConsoleReporter::new(show_bar, quiet));

    let cancel = CancelFlag::new();
    let cancel_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_signal.cancel();
        }
    });

    let sink: Arc<dyn ProgressSink> = reporter.clone();
    let engine = DownloadEngine::new(settings.concurrency, Arc::new(client))
        .with_sink(sink)
        .with_cancel_flag(cancel);

    let report = engine.run(&urls, &settings.output_dir).await;
    reporter.finish();

    info!(
        completed = report.completed(),
        failed = report.failed(),
        skipped = report.skipped(),
        total = report.total(),
        "Download complete"
    );
    if report.was_interrupted() {
        warn!(
            finished = report.finished(),
            total = report.total(),
            "Interrupted before every download finished"
        );
    }

    if !quiet && report.total() > 0 {
        println!("{}", summary_line(&report));
    }

    Ok(exit_handler::determine_exit_outcome(
        report.failed(),
        report.was_interrupted(),
        settings.fail_on_error,
    ))
}

fn summary_line(report: &DownloadReport) -> String {
    let mut line = format!(
        "Downloaded {}/{} files ({:#.1}) in {:.1}s",
        report.completed(),
        report.total(),
        ByteSize1024(report.bytes_written()),
        report.elapsed().as_secs_f64()
    );
    if report.failed() > 0 {
        let _ = write!(line, ", {} failed", report.failed());
    }
    if report.skipped() > 0 {
        let _ = write!(line, ", {} skipped", report.skipped());
    }
    line
}
