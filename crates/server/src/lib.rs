//! Addon HTTP server.
//!
//! Mounts the addonkit router as the fallback of an axum app, so every path is
//! answered by the router's own addressing rules. Providers are synchronous and
//! run on the blocking pool.

pub mod api;
pub mod config;
pub mod watch;

use std::sync::Arc;

use addonkit_core::provider::Provider;
use addonkit_core::router::Router as AddonRouter;

use crate::config::ServerConfig;

/// Shared application state (router and config).
#[derive(Clone)]
pub struct AppState {
    pub router: AddonRouter,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(provider: Arc<dyn Provider>, config: ServerConfig) -> Self {
        Self {
            router: AddonRouter::new(provider),
            config,
        }
    }
}

/// Build the axum app with state.
pub fn app_routes(state: AppState) -> axum::Router {
    api::routes(state)
}
