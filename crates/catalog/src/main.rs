//! `catalog`: products catalog binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise structured logging and the panic hook.
//! 3. Seed the in-memory [`ProductStore`].
//! 4. Build the Axum router and start the HTTP server.

mod config;
mod server;
mod store;
mod telemetry;
mod validate;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use config::Config;
use server::state::AppState;
use store::ProductStore;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(&cfg.log_level)?;
    telemetry::install_panic_hook();
    info!(
        version = env!("CARGO_PKG_VERSION"),
        port = cfg.port,
        app_env = ?cfg.app_env,
        "catalog starting"
    );
    if cfg.api_key.is_none() {
        warn!("API_KEY is not set; every request under /api will be rejected");
    }

    // -----------------------------------------------------------------------
    // 3. Product store
    // -----------------------------------------------------------------------
    let store = ProductStore::seeded();
    info!(products = store.len().await, "product store seeded");

    // -----------------------------------------------------------------------
    // 4. HTTP server
    // -----------------------------------------------------------------------
    let state = AppState::new(store, cfg.api_key.clone(), cfg.app_env);
    let router = server::router::build(state);

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))
        .inspect_err(|e| error!(error = %format!("{e:#}"), "startup failed"))?;
    info!(addr = %addr, "listening");

    axum::serve(listener, router)
        .await
        .context("HTTP server terminated")
        .inspect_err(|e| error!(error = %format!("{e:#}"), "server failed"))?;

    Ok(())
}
