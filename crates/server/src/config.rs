//! Server configuration (bind address, bundle file, hot reload).

use std::path::PathBuf;

use addonkit_core::config::AppConfig;

/// Configuration for the addon server.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host:port to bind (e.g. "127.0.0.1:7000" or "0.0.0.0:7000").
    pub bind: String,
    /// Bundle to serve; the stub provider is used when unset.
    pub bundle_path: Option<PathBuf>,
    /// Reload the bundle when its file changes.
    pub watch: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_app_config(&AppConfig::default())
    }
}

impl ServerConfig {
    pub fn from_app_config(cfg: &AppConfig) -> Self {
        Self {
            bind: cfg.server.bind.clone(),
            bundle_path: cfg.bundle_path(),
            watch: cfg.server.watch,
        }
    }

    /// Apply environment overrides.
    /// - `ADDONKIT_BIND`: host:port
    /// - `ADDONKIT_BUNDLE`: bundle file path
    /// - `ADDONKIT_WATCH`: `1`/`true` to reload the bundle on change
    pub fn with_env(mut self) -> Self {
        if let Ok(b) = std::env::var("ADDONKIT_BIND") {
            self.bind = b;
        }
        if let Ok(p) = std::env::var("ADDONKIT_BUNDLE") {
            self.bundle_path = Some(PathBuf::from(p));
        }
        if let Ok(w) = std::env::var("ADDONKIT_WATCH") {
            self.watch = matches!(w.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        self
    }

    pub fn bind_addr(&self) -> &str {
        &self.bind
    }
}
