//! Per-item transfer: GET, status check, filename, stream to disk.
//!
//! Bodies are streamed into a job-private `.part` file next to the target
//! and renamed onto it only once complete, so a failing job never touches
//! a file another job finished under the same name.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::StreamExt;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, instrument, warn};

use super::super::cancel::CancelFlag;
use super::super::client::{BodyStream, Fetcher};
use super::super::filename::filename_from_url;
use super::super::sink::ProgressSink;
use super::super::{DownloadError, DownloadJob};

/// A file written by a successful transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    /// Where the body was written.
    pub path: PathBuf,
    /// Bytes written.
    pub bytes: u64,
    /// HTTP status of the response the body came from.
    pub status: u16,
}

/// Runs one job to its terminal state.
#[instrument(skip(fetcher, sink, cancel), fields(url = %job.url()))]
pub(crate) async fn transfer(
    fetcher: &dyn Fetcher,
    job: &DownloadJob,
    sink: &dyn ProgressSink,
    cancel: &CancelFlag,
) -> Result<SavedFile, DownloadError> {
    let url = job.url();

    let response = tokio::select! {
        biased;
        () = cancel.cancelled() => return Err(DownloadError::cancelled(url)),
        response = fetcher.get(url) => response?,
    };

    let status = response.status;
    if !response.is_success() {
        warn!(status, "non-success status, writing body anyway");
        sink.on_status_warning(url, status);
    }

    let filename = filename_from_url(url)?;
    let dir = job.destination_dir();
    if !dir.as_os_str().is_empty() {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| DownloadError::io(dir, e))?;
    }
    let path = dir.join(&filename);
    let part = part_path(dir, &filename);
    debug!(path = %path.display(), part = %part.display(), "resolved output path");

    let file = File::create(&part)
        .await
        .map_err(|e| DownloadError::io(part.clone(), e))?;

    let written = async {
        let bytes = stream_to_file(file, response.body, &part, url, cancel).await?;
        tokio::fs::rename(&part, &path)
            .await
            .map_err(|e| DownloadError::io(path.clone(), e))?;
        Ok::<_, DownloadError>(bytes)
    }
    .await;

    match written {
        Ok(bytes) => Ok(SavedFile {
            path,
            bytes,
            status,
        }),
        Err(e) => {
            debug!(part = %part.display(), "cleaning up partial file after error");
            let _ = tokio::fs::remove_file(&part).await;
            Err(e)
        }
    }
}

/// Job-private scratch path for `filename` inside `dir`.
fn part_path(dir: &Path, filename: &str) -> PathBuf {
    static NEXT_PART: AtomicU64 = AtomicU64::new(0);

    let n = NEXT_PART.fetch_add(1, Ordering::Relaxed);
    dir.join(format!(".{filename}.{}-{n}.part", std::process::id()))
}

/// Streams the body into `file`, returning bytes written.
async fn stream_to_file(
    file: File,
    mut body: BodyStream,
    path: &Path,
    url: &str,
    cancel: &CancelFlag,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut bytes_written: u64 = 0;

    loop {
        let next = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(DownloadError::cancelled(url)),
            next = body.next() => next,
        };
        let Some(chunk) = next else {
            break;
        };
        let chunk = chunk?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(path, e))?;
        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(path, e))?;

    Ok(bytes_written)
}
