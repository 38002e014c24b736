// =============================================================================
// Runtime Configuration — Oracle terminal settings with atomic save
// =============================================================================
//
// Every tunable lives here: watched symbols, fetch window, indicator periods,
// alert sensitivity and cache TTL. All fields carry `#[serde(default)]` so an
// older config file keeps loading after new fields are added.
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash.
// =============================================================================

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::EngineParams;
use crate::error::validate_sensitivity;
use crate::signals::{ScoringRules, DEFAULT_SENSITIVITY_PCT};

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_true() -> bool {
    true
}

fn default_symbols() -> Vec<String> {
    vec![
        "BTC".to_string(),
        "ETH".to_string(),
        "SOL".to_string(),
        "XRP".to_string(),
    ]
}

fn default_quote_asset() -> String {
    "USDT".to_string()
}

fn default_interval() -> String {
    "1d".to_string()
}

fn default_window_size() -> u32 {
    100
}

fn default_ma_period() -> usize {
    20
}

fn default_bollinger_k() -> f64 {
    2.0
}

fn default_rsi_period() -> usize {
    14
}

fn default_sensitivity_pct() -> f64 {
    DEFAULT_SENSITIVITY_PCT
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

// =============================================================================
// AlertSettings
// =============================================================================

/// User-facing alert controls (the sidebar "alerts setup").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertSettings {
    /// Fibonacci proximity sensitivity in percent, valid range [0.5, 5.0].
    #[serde(default = "default_sensitivity_pct")]
    pub sensitivity_pct: f64,

    /// Surface triggered alerts as display messages.
    #[serde(default = "default_true")]
    pub visual_alerts: bool,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            sensitivity_pct: default_sensitivity_pct(),
            visual_alerts: true,
        }
    }
}

// =============================================================================
// OracleConfig
// =============================================================================

/// Top-level configuration for the Oracle terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleConfig {
    // --- Market selection ---------------------------------------------------

    /// Base assets offered for analysis (quoted against `quote_asset`).
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,

    #[serde(default = "default_quote_asset")]
    pub quote_asset: String,

    /// Kline interval requested from the exchange.
    #[serde(default = "default_interval")]
    pub interval: String,

    /// Number of bars fetched per analysis.
    #[serde(default = "default_window_size")]
    pub window_size: u32,

    // --- Indicators ---------------------------------------------------------

    #[serde(default = "default_ma_period")]
    pub ma_period: usize,

    /// Bollinger band width in standard deviations.
    #[serde(default = "default_bollinger_k")]
    pub bollinger_k: f64,

    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    // --- Signals ------------------------------------------------------------

    #[serde(default)]
    pub alerts: AlertSettings,

    #[serde(default)]
    pub scoring: ScoringRules,

    // --- Service ------------------------------------------------------------

    /// Time-to-live of cached market inputs, in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
            quote_asset: default_quote_asset(),
            interval: default_interval(),
            window_size: default_window_size(),
            ma_period: default_ma_period(),
            bollinger_k: default_bollinger_k(),
            rsi_period: default_rsi_period(),
            alerts: AlertSettings::default(),
            scoring: ScoringRules::default(),
            cache_ttl_secs: default_cache_ttl_secs(),
            bind_addr: default_bind_addr(),
        }
    }
}

impl OracleConfig {
    /// Load configuration from a JSON file at `path` and validate it.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read oracle config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse oracle config from {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("invalid oracle config in {}", path.display()))?;

        info!(
            path = %path.display(),
            symbols = ?config.symbols,
            sensitivity_pct = config.alerts.sensitivity_pct,
            "oracle config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise oracle config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "oracle config saved (atomic)");
        Ok(())
    }

    /// Reject values the engine cannot run with. Sensitivity is never clamped.
    pub fn validate(&self) -> Result<()> {
        validate_sensitivity(self.alerts.sensitivity_pct)?;
        anyhow::ensure!(!self.symbols.is_empty(), "symbol list is empty");
        anyhow::ensure!(self.window_size > 0, "window_size must be positive");
        anyhow::ensure!(self.ma_period > 1, "ma_period must be at least 2");
        anyhow::ensure!(self.rsi_period > 0, "rsi_period must be positive");
        anyhow::ensure!(
            self.bollinger_k.is_finite() && self.bollinger_k > 0.0,
            "bollinger_k must be a positive number"
        );
        Ok(())
    }

    /// Whether `symbol` (case-insensitive) is one of the configured assets.
    pub fn resolve_symbol(&self, symbol: &str) -> Option<String> {
        let wanted = symbol.trim().to_uppercase();
        self.symbols.iter().find(|s| **s == wanted).cloned()
    }

    /// Engine parameters for a run, optionally overriding the sensitivity.
    pub fn engine_params(&self, sensitivity_pct: Option<f64>) -> EngineParams {
        EngineParams {
            ma_period: self.ma_period,
            bollinger_k: self.bollinger_k,
            rsi_period: self.rsi_period,
            sensitivity_pct: sensitivity_pct.unwrap_or(self.alerts.sensitivity_pct),
            visual_alerts: self.alerts.visual_alerts,
            scoring: self.scoring,
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = OracleConfig::default();
        assert_eq!(cfg.symbols, vec!["BTC", "ETH", "SOL", "XRP"]);
        assert_eq!(cfg.quote_asset, "USDT");
        assert_eq!(cfg.interval, "1d");
        assert_eq!(cfg.window_size, 100);
        assert_eq!(cfg.ma_period, 20);
        assert_eq!(cfg.rsi_period, 14);
        assert!((cfg.alerts.sensitivity_pct - 1.5).abs() < f64::EPSILON);
        assert!(cfg.alerts.visual_alerts);
        assert_eq!(cfg.cache_ttl(), Duration::from_secs(300));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: OracleConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, OracleConfig::default());
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "symbols": ["ETH"], "alerts": { "sensitivity_pct": 3.0 } }"#;
        let cfg: OracleConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.symbols, vec!["ETH"]);
        assert!((cfg.alerts.sensitivity_pct - 3.0).abs() < f64::EPSILON);
        assert!(cfg.alerts.visual_alerts);
        assert_eq!(cfg.scoring, ScoringRules::default());
    }

    #[test]
    fn out_of_range_sensitivity_rejected() {
        let mut cfg = OracleConfig::default();
        cfg.alerts.sensitivity_pct = 0.1;
        assert!(cfg.validate().is_err());
        cfg.alerts.sensitivity_pct = 5.0;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_periods_rejected() {
        let cfg = OracleConfig {
            rsi_period: 0,
            ..OracleConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn resolve_symbol_is_case_insensitive() {
        let cfg = OracleConfig::default();
        assert_eq!(cfg.resolve_symbol("eth"), Some("ETH".to_string()));
        assert_eq!(cfg.resolve_symbol("DOGE"), None);
    }

    #[test]
    fn engine_params_override_sensitivity() {
        let cfg = OracleConfig::default();
        assert!((cfg.engine_params(None).sensitivity_pct - 1.5).abs() < f64::EPSILON);
        assert!((cfg.engine_params(Some(4.0)).sensitivity_pct - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir().join(format!("oracle-config-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("oracle_config.json");

        let mut cfg = OracleConfig::default();
        cfg.alerts.sensitivity_pct = 2.5;
        cfg.save(&path).unwrap();

        let loaded = OracleConfig::load(&path).unwrap();
        assert_eq!(loaded, cfg);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn load_missing_file_errors() {
        assert!(OracleConfig::load("/nonexistent/oracle_config.json").is_err());
    }
}
