// =============================================================================
// Oracle Terminal — Main Entry Point
// =============================================================================
//
// Serves on-demand market signal reports: every request recomputes
// indicators, the Fibonacci level, the composite score and alert zones from a
// freshly fetched (or briefly cached) batch of daily bars.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod engine;
mod error;
mod fibonacci;
mod indicators;
mod market_data;
mod runtime_config;
mod signals;
mod types;

use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::runtime_config::OracleConfig;

const CONFIG_PATH: &str = "oracle_config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Oracle Terminal starting up");

    let mut config = OracleConfig::load(CONFIG_PATH).unwrap_or_else(|e| {
        warn!(error = %format!("{e:#}"), "Failed to load config, using defaults");
        OracleConfig::default()
    });

    // Override symbols from env if available.
    if let Ok(syms) = std::env::var("ORACLE_SYMBOLS") {
        let symbols: Vec<String> = syms
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        if !symbols.is_empty() {
            config.symbols = symbols;
        }
    }
    if let Ok(addr) = std::env::var("ORACLE_BIND_ADDR") {
        config.bind_addr = addr;
    }

    info!(
        symbols = ?config.symbols,
        quote = %config.quote_asset,
        window = config.window_size,
        sensitivity_pct = config.alerts.sensitivity_pct,
        cache_ttl_secs = config.cache_ttl_secs,
        "Configured oracle"
    );

    // ── 2. Build shared state ────────────────────────────────────────────
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config, CONFIG_PATH)?);

    // ── 3. Serve the API ─────────────────────────────────────────────────
    let app = api::rest::router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Oracle Terminal shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
