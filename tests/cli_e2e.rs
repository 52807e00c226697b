//! End-to-end CLI tests for the dops binary.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

mod support;
use support::socket_guard::start_mock_server_or_skip;

/// Binary isolated from the user's config file and log settings.
fn dops(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("dops").unwrap();
    cmd.env("XDG_CONFIG_HOME", home.join("config"))
        .env("HOME", home)
        .env_remove("RUST_LOG")
        .current_dir(home);
    cmd
}

#[test]
fn test_binary_help_lists_subcommands() {
    let home = TempDir::new().unwrap();
    dops(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("bulkdownload"))
        .stdout(predicate::str::contains("extract-text"))
        .stdout(predicate::str::contains("modules"));
}

#[test]
fn test_binary_version_displays_version() {
    let home = TempDir::new().unwrap();
    dops(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("dops"));
}

#[test]
fn test_binary_without_subcommand_prints_usage_and_fails() {
    let home = TempDir::new().unwrap();
    dops(home.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_binary_invalid_flag_returns_error() {
    let home = TempDir::new().unwrap();
    dops(home.path())
        .args(["bulkdownload", "--invalid-flag"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_modules_list() {
    let home = TempDir::new().unwrap();
    dops(home.path())
        .args(["modules", "--list"])
        .assert()
        .success()
        .stdout("bulkdownload\nextract-text\nmodules\n");
}

#[test]
fn test_modules_count_via_alias() {
    let home = TempDir::new().unwrap();
    dops(home.path())
        .args(["mods", "-c"])
        .assert()
        .success()
        .stdout("3\n");
}

#[test]
fn test_modules_search() {
    let home = TempDir::new().unwrap();
    dops(home.path())
        .args(["modules", "-s", "down"])
        .assert()
        .success()
        .stdout("bulkdownload\n");
}

#[test]
fn test_modules_markdown() {
    let home = TempDir::new().unwrap();
    dops(home.path())
        .args(["modules", "--md"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# Modules\n"));
}

#[test]
fn test_extract_text_from_file_to_stdout() {
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join("in.txt"), "id=12 id=345 none").unwrap();

    dops(home.path())
        .args(["extract-text", "-r", r"\d+", "-i", "in.txt"])
        .assert()
        .success()
        .stdout("12\n345\n");
}

#[test]
fn test_extract_text_from_stdin_to_file() {
    let home = TempDir::new().unwrap();

    dops(home.path())
        .args(["extract-text", "--regex", "[a-z]+@[a-z]+", "-o", "out.txt"])
        .write_stdin("mail alice@home and bob@work\n")
        .assert()
        .success()
        .stdout("");

    assert_eq!(
        std::fs::read_to_string(home.path().join("out.txt")).unwrap(),
        "alice@home\nbob@work\n"
    );
}

#[test]
fn test_extract_text_invalid_regex_fails() {
    let home = TempDir::new().unwrap();
    dops(home.path())
        .args(["extract-text", "-r", "(oops"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid pattern"));
}

#[test]
fn test_bulkdownload_missing_input_fails() {
    let home = TempDir::new().unwrap();
    dops(home.path())
        .args(["bulkdownload", "-i", "absent.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.txt"));
}

#[test]
fn test_bulkdownload_default_input_missing_fails() {
    let home = TempDir::new().unwrap();
    dops(home.path())
        .arg("bd")
        .assert()
        .failure()
        .stderr(predicate::str::contains("urls.txt"));
}

#[test]
fn test_bulkdownload_empty_list_succeeds_without_creating_output() {
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join("urls.txt"), "\n   \n").unwrap();

    dops(home.path())
        .args(["bd", "-o", "out"])
        .assert()
        .success();

    assert!(!home.path().join("out").exists());
}

#[test]
fn test_bulkdownload_failures_exit_zero_by_default() {
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join("urls.txt"), "http://127.0.0.1:1/x.bin\n").unwrap();

    dops(home.path())
        .arg("bd")
        .assert()
        .success()
        .stderr(predicate::str::contains("http://127.0.0.1:1/x.bin"));
}

#[test]
fn test_bulkdownload_fail_on_error_sets_exit_code() {
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join("urls.txt"), "http://127.0.0.1:1/x.bin\n").unwrap();

    dops(home.path())
        .args(["bd", "--fail-on-error"])
        .assert()
        .code(1);
}

#[test]
fn test_bulkdownload_rejects_invalid_config_file() {
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join("urls.txt"), "").unwrap();
    std::fs::write(home.path().join("dops.toml"), "concurrency = 0\n").unwrap();

    dops(home.path())
        .args(["bd", "--config", "dops.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("concurrency"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_bulkdownload_downloads_list_using_config_defaults() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    for name in ["one.txt", "two.txt"] {
        Mock::given(method("GET"))
            .and(path(format!("/{name}")))
            .respond_with(ResponseTemplate::new(200).set_body_string(name))
            .mount(&server)
            .await;
    }
    let home = TempDir::new().unwrap();
    let list = format!("{0}/one.txt\n\n{0}/two.txt\n", server.uri());
    std::fs::write(home.path().join("list.txt"), list).unwrap();
    let config_dir = home.path().join("config").join("dops");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "input = \"list.txt\"\noutput_dir = \"saved\"\nconcurrency = 2\n",
    )
    .unwrap();

    let home_path = home.path().to_path_buf();
    tokio::task::spawn_blocking(move || {
        dops(&home_path)
            .arg("bulkdownload")
            .assert()
            .success()
            .stdout(predicate::str::contains("Downloaded 2/2 files"));
    })
    .await
    .unwrap();

    let saved = home.path().join("saved");
    assert_eq!(std::fs::read_to_string(saved.join("one.txt")).unwrap(), "one.txt");
    assert_eq!(std::fs::read_to_string(saved.join("two.txt")).unwrap(), "two.txt");
}
