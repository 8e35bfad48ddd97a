//! Binary entry point for the addon server.
//!
//! Serves a bundle file (see `addonkit_core::bundle`) over the add-on protocol.
//! Configuration comes from `~/.config/addonkit/config.toml` and `ADDONKIT_*`
//! environment variables.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use addonkit_core::bundle::BundleProvider;
use addonkit_core::config::try_load_config;
use addonkit_core::provider::{Provider, StubProvider};
use addonkit_server::{app_routes, config::ServerConfig, watch::watch_bundle, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // The log filter comes from the config, so config errors are reported once logging is up.
    let loaded = try_load_config();
    let app_config = loaded.as_ref().cloned().unwrap_or_default();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&app_config.logging.filter)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = &loaded {
        tracing::warn!(error = %e, "ignoring invalid config file; using defaults");
    }

    let config = ServerConfig::from_app_config(&app_config).with_env();

    let mut _watcher = None;
    let provider: Arc<dyn Provider> = match &config.bundle_path {
        Some(path) => {
            let bundle = Arc::new(BundleProvider::open(path)?);
            if config.watch {
                _watcher = watch_bundle(bundle.clone())?;
            }
            bundle
        }
        None => {
            tracing::warn!("no bundle configured; serving the stub provider");
            Arc::new(StubProvider::new())
        }
    };

    let state = AppState::new(provider, config);
    let app = app_routes(state.clone());

    let addr = state.config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Addon server listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
