//! empdir - Employee directory service
//!
//! Fetches the employee table from the configured upstream, normalizes and
//! geocode-enriches it once per session, and serves the query API.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use empdir::config::Config;
use empdir::services::{Geocoder, HttpEmployeeTransport, NominatimBackend};
use empdir::store::SessionStore;
use empdir::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting empdir (employee directory service)");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::var("EMPDIR_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("empdir.toml"));
    let config = Config::load(Some(&config_path))?;

    let transport = Arc::new(HttpEmployeeTransport::new(config.transport.clone())?);

    let backend = NominatimBackend::new(&config.geocoder)
        .map_err(|e| anyhow::anyhow!("Failed to create geocode backend: {e}"))?;
    let geocoder = Arc::new(Geocoder::new(
        Arc::new(backend),
        config.geocoder.min_interval_ms,
    ));

    let store = Arc::new(SessionStore::new(transport, geocoder));
    let state = AppState::new(store);

    let app = empdir::build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Listening on http://{}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
