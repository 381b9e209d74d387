//! Client configuration.
//!
//! Settings are resolved in three layers, later ones winning:
//! the `config.toml` file, the `REELS_API_URL` environment variable,
//! and command line flags (`--api-url`, `--config`).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "config.toml";
const APP_NAME: &str = "reels-rs";
const API_URL_ENV: &str = "REELS_API_URL";

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_DATA_DIR: &str = ".cache";
pub const DEFAULT_DOUBLE_TAP_MS: u64 = 300;
pub const DEFAULT_CONTROLS_HIDE_MS: u64 = 2000;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub data_dir: PathBuf,
    pub double_tap_ms: u64,
    pub controls_hide_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            double_tap_ms: DEFAULT_DOUBLE_TAP_MS,
            controls_hide_ms: DEFAULT_CONTROLS_HIDE_MS,
        }
    }
}

impl Config {
    pub fn double_tap_window(&self) -> Duration {
        Duration::from_millis(self.double_tap_ms)
    }

    pub fn controls_hide_after(&self) -> Duration {
        Duration::from_millis(self.controls_hide_ms)
    }

    /// Base URL without a trailing slash, so paths can be appended as-is
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }
}

/// Flags accepted on the command line
#[derive(Debug, Default)]
pub struct CliArgs {
    pub api_url: Option<String>,
    pub config_path: Option<PathBuf>,
}

impl CliArgs {
    pub fn from_env() -> Result<Self> {
        Self::parse(pico_args::Arguments::from_env())
    }

    fn parse(mut args: pico_args::Arguments) -> Result<Self> {
        let cli = Self {
            api_url: args.opt_value_from_str("--api-url")?,
            config_path: args.opt_value_from_str("--config")?,
        };

        let rest = args.finish();
        if !rest.is_empty() {
            tracing::warn!(?rest, "Ignoring unrecognized arguments");
        }
        Ok(cli)
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

/// Resolve the effective configuration from file, environment and CLI
pub fn load(cli: &CliArgs) -> Result<Config> {
    let path = cli.config_path.clone().or_else(default_config_path);

    let mut config = match path {
        Some(ref path) if path.exists() => load_from_path(path)?,
        Some(ref path) => {
            // First run: leave a file with the defaults behind for editing
            let config = Config::default();
            match save_to_path(&config, path) {
                Ok(()) => tracing::info!(path = %path.display(), "Wrote default config"),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Could not write default config"),
            }
            config
        }
        None => Config::default(),
    };

    if let Ok(url) = std::env::var(API_URL_ENV) {
        apply_api_url(&mut config, Some(url));
    }
    apply_api_url(&mut config, cli.api_url.clone());

    tracing::debug!(api_url = %config.api_url, data_dir = %config.data_dir.display(), "Configuration resolved");
    Ok(config)
}

fn apply_api_url(config: &mut Config, url: Option<String>) {
    if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
        config.api_url = url.trim().to_string();
    }
}

pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    match toml::from_str(&content) {
        Ok(config) => Ok(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Invalid config file, using defaults");
            Ok(Config::default())
        }
    }
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use tempfile::tempdir;

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_url = \"http://10.0.0.5:8000/\"\n").unwrap();

        let config = load_from_path(&path).unwrap();
        assert_eq!(config.api_url, "http://10.0.0.5:8000/");
        assert_eq!(config.base_url(), "http://10.0.0.5:8000");
        assert_eq!(config.double_tap_ms, DEFAULT_DOUBLE_TAP_MS);
        assert_eq!(config.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
    }

    #[test]
    fn invalid_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "not = valid = toml").unwrap();

        assert_eq!(load_from_path(&path).unwrap(), Config::default());
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            controls_hide_ms: 1500,
            ..Config::default()
        };

        save_to_path(&config, &path).unwrap();
        assert_eq!(load_from_path(&path).unwrap(), config);
    }

    #[test]
    fn cli_flag_overrides_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_url = \"http://from-file:8000\"\n").unwrap();

        let args = pico_args::Arguments::from_vec(vec![
            OsString::from("--api-url"),
            OsString::from("http://from-cli:9000"),
            OsString::from("--config"),
            path.clone().into_os_string(),
        ]);
        let cli = CliArgs::parse(args).unwrap();
        let config = load(&cli).unwrap();

        assert_eq!(config.api_url, "http://from-cli:9000");
    }

    #[test]
    fn blank_override_is_ignored() {
        let mut config = Config::default();
        apply_api_url(&mut config, Some("   ".to_string()));
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }
}
