//! Config file parsing for `~/.config/addonkit/config.toml`.
//!
//! A missing file yields the defaults. [`load_config`] also logs and ignores an
//! invalid one; [`try_load_config`] and [`load_config_from`] report it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub bundle: BundleSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Reload the bundle when its file changes.
    #[serde(default)]
    pub watch: bool,
}

fn default_bind() -> String {
    "127.0.0.1:7000".to_string()
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            watch: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BundleSection {
    pub path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSection {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` wins when set.
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

impl AppConfig {
    pub fn bundle_path(&self) -> Option<PathBuf> {
        self.bundle.path.as_deref().map(expand_home)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Load config from the default path, falling back to defaults.
///
/// An invalid file is logged and ignored. Callers that set up logging from the
/// config itself should use [`try_load_config`] and report the error afterwards.
pub fn load_config() -> AppConfig {
    try_load_config().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring invalid config file");
        AppConfig::default()
    })
}

/// Load config from the default path. A missing file or config directory
/// yields the defaults; a file that cannot be read or parsed is an error.
pub fn try_load_config() -> Result<AppConfig, ConfigError> {
    match config_path() {
        Some(path) => load_config_or_default(&path),
        None => Ok(AppConfig::default()),
    }
}

/// Like [`load_config_from`], but a missing file yields the defaults.
pub fn load_config_or_default(path: &Path) -> Result<AppConfig, ConfigError> {
    match load_config_from(path) {
        Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        other => other,
    }
}

pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Return the default config file path (for init and show).
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut p| {
        p.push("addonkit");
        p.push("config.toml");
        p
    })
}

/// Write `cfg` to `path`, creating parent directories.
pub fn save_config(cfg: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, cfg.to_toml()?)?;
    Ok(())
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
