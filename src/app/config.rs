//! Configuration file loading and CLI default resolution.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use dops_core::{DEFAULT_CONCURRENCY, DEFAULT_INPUT_FILE, Timeouts};
use tracing::debug;

use crate::cli::BulkDownloadArgs;

/// Defaults read from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FileConfig {
    /// URL list to read when `--input` is absent.
    pub input: Option<PathBuf>,
    /// Directory to download into when `--output` is absent.
    pub output_dir: Option<PathBuf>,
    /// Concurrent downloads when `--concurrent` is absent.
    pub concurrency: Option<u16>,
    /// Per-request deadline in seconds.
    pub timeout_secs: Option<u64>,
    /// Connect deadline in seconds.
    pub connect_timeout_secs: Option<u64>,
}

impl FileConfig {
    fn validate(&self) -> Result<()> {
        if let Some(concurrency) = self.concurrency
            && !(1..=100).contains(&concurrency)
        {
            bail!("Invalid config value for `concurrency`: {concurrency}. Expected range: 1..=100");
        }
        validate_timeout_secs("timeout_secs", self.timeout_secs)?;
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        Ok(())
    }
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=3600");
    }
    Ok(())
}

/// Effective settings for one `bulkdownload` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BulkDownloadSettings {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub concurrency: usize,
    pub timeouts: Timeouts,
    pub fail_on_error: bool,
}

/// Merges CLI flags over file config over built-in defaults.
pub(crate) fn resolve_bulkdownload(
    args: &BulkDownloadArgs,
    file: Option<&FileConfig>,
) -> BulkDownloadSettings {
    let file = file.cloned().unwrap_or_default();

    let input = args
        .input
        .clone()
        .or(file.input)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_FILE));
    // Empty path means the current directory.
    let output_dir = args.output.clone().or(file.output_dir).unwrap_or_default();
    let concurrency = args
        .concurrent
        .or(file.concurrency)
        .map_or(DEFAULT_CONCURRENCY, usize::from);
    let timeouts = Timeouts {
        connect: args
            .connect_timeout
            .or(file.connect_timeout_secs)
            .map(Duration::from_secs),
        request: args.timeout.or(file.timeout_secs).map(Duration::from_secs),
    };

    BulkDownloadSettings {
        input,
        output_dir,
        concurrency,
        timeouts,
        fail_on_error: args.fail_on_error,
    }
}

/// `$XDG_CONFIG_HOME/dops/config.toml`, falling back to
/// `$HOME/.config/dops/config.toml`.
pub(crate) fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg_config_home).join("dops").join("config.toml"));
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("dops")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads the config file.
///
/// An explicit path must exist. The default location is optional.
pub(crate) fn load_config(explicit: Option<&Path>) -> Result<Option<FileConfig>> {
    if let Some(path) = explicit {
        return load_file_config(path).map(Some);
    }

    let Some(path) = resolve_default_config_path() else {
        return Ok(None);
    };
    if !path.exists() {
        debug!(path = %path.display(), "no config file");
        return Ok(None);
    }
    load_file_config(&path).map(Some)
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    let config = parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
    debug!(path = %path.display(), ?config, "loaded config file");
    Ok(config)
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line_no = line_index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };

        let key = raw_key.trim();
        let value = raw_value.trim();

        match key {
            "input" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `input` value on line {line_no}"))?;
                cfg.input = Some(PathBuf::from(parsed));
            }
            "output_dir" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `output_dir` value on line {line_no}"))?;
                cfg.output_dir = Some(PathBuf::from(parsed));
            }
            "concurrency" => {
                let parsed = parse_integer_u64(value)
                    .with_context(|| format!("Invalid `concurrency` value on line {line_no}"))?;
                let n = u16::try_from(parsed)
                    .map_err(|_| anyhow::anyhow!("Integer value out of range for u16"))
                    .with_context(|| format!("Invalid `concurrency` value on line {line_no}"))?;
                cfg.concurrency = Some(n);
            }
            "timeout_secs" => {
                let parsed = parse_integer_u64(value)
                    .with_context(|| format!("Invalid `timeout_secs` value on line {line_no}"))?;
                cfg.timeout_secs = Some(parsed);
            }
            "connect_timeout_secs" => {
                let parsed = parse_integer_u64(value).with_context(|| {
                    format!("Invalid `connect_timeout_secs` value on line {line_no}")
                })?;
                cfg.connect_timeout_secs = Some(parsed);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_no}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u64"))
}
