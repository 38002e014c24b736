// =============================================================================
// Central Application State — Oracle terminal service
// =============================================================================
//
// Holds what the HTTP handlers share: the live configuration and the market
// data collaborator with its input cache. The signal engine itself is
// stateless and is never stored here.
//
// Thread safety:
//   - parking_lot::RwLock around the configuration.
//   - The market data service manages its own interior mutability.
// =============================================================================

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use parking_lot::RwLock;

use crate::market_data::MarketDataService;
use crate::runtime_config::OracleConfig;

/// Upstream request timeout shared by every feed.
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared state handed to every request via `Arc<AppState>`.
pub struct AppState {
    // ── Configuration ───────────────────────────────────────────────────
    pub config: RwLock<OracleConfig>,
    /// Where alert-setting updates are persisted.
    pub config_path: PathBuf,

    // ── Market Data ─────────────────────────────────────────────────────
    pub market_data: MarketDataService,

    // ── Timing ──────────────────────────────────────────────────────────
    /// Instant when the service was started. Used for uptime reporting.
    pub start_time: Instant,
}

impl AppState {
    /// Construct the state from a validated configuration.
    pub fn new(config: OracleConfig, config_path: impl Into<PathBuf>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent(concat!("oracle-terminal/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build reqwest client")?;

        let market_data = MarketDataService::new(
            client,
            config.quote_asset.clone(),
            config.interval.clone(),
            config.window_size,
            config.cache_ttl(),
        );

        Ok(Self {
            config: RwLock::new(config),
            config_path: config_path.into(),
            market_data,
            start_time: Instant::now(),
        })
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
