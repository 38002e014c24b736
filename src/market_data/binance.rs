// =============================================================================
// Binance public market data — daily klines
// =============================================================================
//
// Only the unauthenticated kline endpoint is used, so no API key or request
// signing is involved.

use anyhow::{Context, Result};
use tracing::{debug, instrument};

use crate::types::PriceBar;

const BASE_URL: &str = "https://api.binance.com";

/// Binance REST client for public kline history.
#[derive(Debug, Clone)]
pub struct BinanceClient {
    base_url: String,
    client: reqwest::Client,
}

impl BinanceClient {
    /// Create a client that re-uses an existing HTTP client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            client,
        }
    }

    /// GET /api/v3/klines (public — no signature required).
    ///
    /// Array indices:
    ///   [0] openTime, [1] open, [2] high, [3] low, [4] close, [5] volume, ...
    #[instrument(skip(self), name = "binance::get_klines")]
    pub async fn get_klines(&self, pair: &str, interval: &str, limit: u32) -> Result<Vec<PriceBar>> {
        let url = format!(
            "{}/api/v3/klines?symbol={}&interval={}&limit={}",
            self.base_url, pair, interval, limit
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .context("GET /api/v3/klines request failed")?;

        let status = resp.status();
        let body: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse klines response")?;

        if !status.is_success() {
            anyhow::bail!("Binance GET /api/v3/klines returned {}: {}", status, body);
        }

        let bars = parse_klines(&body)?;
        debug!(pair, interval, count = bars.len(), "klines fetched");
        Ok(bars)
    }
}

/// Parse Binance's array-of-arrays kline payload into bars.
pub fn parse_klines(body: &serde_json::Value) -> Result<Vec<PriceBar>> {
    let raw = body.as_array().context("klines response is not an array")?;

    let mut bars = Vec::with_capacity(raw.len());

    for entry in raw {
        let arr = entry.as_array().context("kline entry is not an array")?;

        if arr.len() < 6 {
            anyhow::bail!("malformed kline entry with {} elements", arr.len());
        }

        let timestamp = arr[0].as_i64().context("kline open time is not an integer")?;
        bars.push(PriceBar::new(
            timestamp,
            parse_str_f64(&arr[1])?,
            parse_str_f64(&arr[2])?,
            parse_str_f64(&arr[3])?,
            parse_str_f64(&arr[4])?,
            parse_str_f64(&arr[5])?,
        ));
    }

    Ok(bars)
}

/// Parse a JSON value that may be either a string or a number into `f64`.
fn parse_str_f64(val: &serde_json::Value) -> Result<f64> {
    if let Some(s) = val.as_str() {
        s.parse::<f64>()
            .with_context(|| format!("failed to parse '{s}' as f64"))
    } else if let Some(n) = val.as_f64() {
        Ok(n)
    } else {
        anyhow::bail!("expected string or number, got: {val}")
    }
}
