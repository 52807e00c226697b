//! Integration tests for the bulk download engine against a mock HTTP server.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use dops_core::download::{FailureKind, ProgressSink, ProgressState};
use dops_core::{DownloadEngine, DownloadError, HttpClient, Timeouts};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod support;
use support::socket_guard::start_mock_server_or_skip;

macro_rules! require_mock_server {
    () => {{
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        mock_server
    }};
}

#[derive(Default)]
struct RecordingSink {
    warnings: Mutex<Vec<(String, u16)>>,
    progress: Mutex<Vec<usize>>,
}

impl ProgressSink for RecordingSink {
    fn on_status_warning(&self, url: &str, status: u16) {
        self.warnings.lock().unwrap().push((url.to_string(), status));
    }

    fn on_progress(&self, progress: &ProgressState) {
        self.progress.lock().unwrap().push(progress.completed());
    }
}

async fn mount_file(server: &MockServer, name: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/files/{name}")))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn engine(concurrency: usize) -> DownloadEngine {
    DownloadEngine::new(concurrency, Arc::new(HttpClient::new().unwrap()))
}

fn read(dir: &Path, name: &str) -> String {
    std::fs::read_to_string(dir.join(name)).unwrap()
}

#[tokio::test]
async fn test_downloads_every_url_into_output_dir() {
    let server = require_mock_server!();
    let names = ["a.txt", "b.txt", "c.txt", "d.txt", "e.txt"];
    for name in names {
        mount_file(&server, name, &format!("contents of {name}")).await;
    }
    let urls: Vec<String> = names
        .iter()
        .map(|name| format!("{}/files/{name}", server.uri()))
        .collect();
    let dir = TempDir::new().unwrap();

    let report = engine(3).run(&urls, dir.path()).await;

    assert_eq!(report.total(), 5);
    assert_eq!(report.completed(), 5);
    assert!(report.is_complete_success());
    for name in names {
        assert_eq!(read(dir.path(), name), format!("contents of {name}"));
    }
    let expected_bytes: u64 = names
        .iter()
        .map(|name| format!("contents of {name}").len() as u64)
        .sum();
    assert_eq!(report.bytes_written(), expected_bytes);
}

#[tokio::test]
async fn test_failures_do_not_affect_siblings() {
    let server = require_mock_server!();
    mount_file(&server, "good1.bin", "one").await;
    mount_file(&server, "good2.bin", "two").await;
    let urls = vec![
        format!("{}/files/good1.bin", server.uri()),
        format!("{}/files/", server.uri()),
        "http://127.0.0.1:1/unreachable.bin".to_string(),
        format!("{}/files/good2.bin", server.uri()),
    ];
    let dir = TempDir::new().unwrap();
    let sink = Arc::new(RecordingSink::default());

    let report = engine(2)
        .with_sink(Arc::clone(&sink) as Arc<dyn ProgressSink>)
        .run(&urls, dir.path())
        .await;

    assert_eq!(report.completed(), 2);
    assert_eq!(report.failed(), 2);
    assert_eq!(read(dir.path(), "good1.bin"), "one");
    assert_eq!(read(dir.path(), "good2.bin"), "two");
    assert!(!dir.path().join("unreachable.bin").exists());

    let kinds: Vec<_> = report
        .failures()
        .iter()
        .map(|failure| (failure.url.clone(), failure.error.kind()))
        .collect();
    assert!(kinds.contains(&(format!("{}/files/", server.uri()), FailureKind::Write)));
    assert!(kinds.contains(&(
        "http://127.0.0.1:1/unreachable.bin".to_string(),
        FailureKind::Transfer
    )));

    assert_eq!(*sink.progress.lock().unwrap(), vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_non_success_status_warns_and_still_saves_body() {
    let server = require_mock_server!();
    Mock::given(method("GET"))
        .and(path("/files/missing.html"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&server)
        .await;
    let url = format!("{}/files/missing.html", server.uri());
    let dir = TempDir::new().unwrap();
    let sink = Arc::new(RecordingSink::default());

    let report = engine(1)
        .with_sink(Arc::clone(&sink) as Arc<dyn ProgressSink>)
        .run(std::slice::from_ref(&url), dir.path())
        .await;

    assert_eq!(report.completed(), 1);
    assert_eq!(report.completed_downloads()[0].saved.status, 404);
    assert_eq!(read(dir.path(), "missing.html"), "not here");
    assert_eq!(*sink.warnings.lock().unwrap(), vec![(url, 404)]);
}

#[tokio::test]
async fn test_concurrency_bounds_wall_clock_time() {
    let server = require_mock_server!();
    let delay = Duration::from_millis(200);
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("x")
                .set_delay(delay),
        )
        .mount(&server)
        .await;
    let urls: Vec<String> = (0..6)
        .map(|i| format!("{}/files/{i}.bin", server.uri()))
        .collect();
    let dir = TempDir::new().unwrap();

    let started = Instant::now();
    let report = engine(2).run(&urls, dir.path()).await;
    let elapsed = started.elapsed();

    assert_eq!(report.completed(), 6);
    // Six delayed responses two at a time need at least three rounds.
    assert!(elapsed >= delay * 3, "finished too fast: {elapsed:?}");
}

#[tokio::test]
async fn test_nested_output_dir_is_created() {
    let server = require_mock_server!();
    mount_file(&server, "deep.txt", "deep").await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("a").join("b");

    let report = engine(1)
        .run(&[format!("{}/files/deep.txt", server.uri())], &output)
        .await;

    assert_eq!(report.completed(), 1);
    assert_eq!(read(&output, "deep.txt"), "deep");
}

#[tokio::test]
async fn test_empty_list_creates_nothing() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("never");

    let report = engine(3).run(&[], &output).await;

    assert_eq!(report.total(), 0);
    assert!(report.is_complete_success());
    assert!(!output.exists());
}

#[tokio::test]
async fn test_request_timeout_fails_only_the_slow_item() {
    let server = require_mock_server!();
    mount_file(&server, "fast.txt", "fast").await;
    Mock::given(method("GET"))
        .and(path("/files/slow.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("slow")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;
    let client = HttpClient::with_timeouts(Timeouts {
        connect: None,
        request: Some(Duration::from_millis(300)),
    })
    .unwrap();
    let dir = TempDir::new().unwrap();
    let urls = vec![
        format!("{}/files/slow.txt", server.uri()),
        format!("{}/files/fast.txt", server.uri()),
    ];

    let report = DownloadEngine::new(2, Arc::new(client))
        .run(&urls, dir.path())
        .await;

    assert_eq!(report.completed(), 1);
    assert_eq!(report.failed(), 1);
    assert!(matches!(
        report.failures()[0].error,
        DownloadError::Timeout { .. }
    ));
    assert_eq!(read(dir.path(), "fast.txt"), "fast");
    assert!(!dir.path().join("slow.txt").exists());
}

#[tokio::test]
async fn test_duplicate_urls_are_each_downloaded() {
    let server = require_mock_server!();
    mount_file(&server, "same.txt", "same").await;
    let url = format!("{}/files/same.txt", server.uri());
    let dir = TempDir::new().unwrap();

    let report = engine(1).run(&[url.clone(), url], dir.path()).await;

    assert_eq!(report.total(), 2);
    assert_eq!(report.completed(), 2);
    assert_eq!(read(dir.path(), "same.txt"), "same");
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_rerun_overwrites_files_with_fresh_bodies() {
    let server = require_mock_server!();
    Mock::given(method("GET"))
        .and(path("/files/report.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string("first run, longer body"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/report.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string("second"))
        .mount(&server)
        .await;
    let urls = vec![format!("{}/files/report.csv", server.uri())];
    let dir = TempDir::new().unwrap();
    let engine = engine(2);

    let first = engine.run(&urls, dir.path()).await;
    assert_eq!(first.completed(), 1);
    assert_eq!(read(dir.path(), "report.csv"), "first run, longer body");

    let second = engine.run(&urls, dir.path()).await;
    assert_eq!(second.completed(), 1);
    assert_eq!(read(dir.path(), "report.csv"), "second");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}
