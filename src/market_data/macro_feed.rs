// =============================================================================
// Macro Feed — NASDAQ composite and US dollar index daily closes
// =============================================================================
//
// Both series come from the Yahoo Finance chart endpoint. Yahoo reports
// non-trading days with `null` closes; those points are dropped rather than
// filled. The series are NOT aligned with the asset calendar.

use anyhow::{Context, Result};
use tracing::{debug, instrument};

use crate::types::{MacroPoint, MacroSeries};

const BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// NASDAQ Composite.
pub const NASDAQ_TICKER: &str = "^IXIC";
/// ICE US Dollar Index.
pub const DOLLAR_INDEX_TICKER: &str = "DX-Y.NYB";

/// Fetches daily macro reference series.
#[derive(Debug, Clone)]
pub struct MacroFeed {
    client: reqwest::Client,
    range: String,
}

impl MacroFeed {
    /// Create a feed that re-uses an existing HTTP client and requests
    /// `range_days` of daily history.
    pub fn with_client(client: reqwest::Client, range_days: u32) -> Self {
        Self {
            client,
            range: format!("{range_days}d"),
        }
    }

    /// Fetch both reference series concurrently.
    pub async fn fetch(&self) -> Result<MacroSeries> {
        let (nasdaq, dollar_index) = tokio::try_join!(
            self.fetch_series(NASDAQ_TICKER),
            self.fetch_series(DOLLAR_INDEX_TICKER)
        )?;
        Ok(MacroSeries {
            nasdaq,
            dollar_index,
        })
    }

    /// Fetch the daily close history for one ticker.
    #[instrument(skip(self), name = "macro_feed::fetch_series")]
    pub async fn fetch_series(&self, ticker: &str) -> Result<Vec<MacroPoint>> {
        let url = format!("{BASE_URL}/{ticker}");

        let resp = self
            .client
            .get(&url)
            .query(&[("range", self.range.as_str()), ("interval", "1d")])
            .send()
            .await
            .with_context(|| format!("GET chart for {ticker}"))?;

        let status = resp.status();
        let body: serde_json::Value = resp
            .json()
            .await
            .with_context(|| format!("failed to parse chart response for {ticker}"))?;

        if !status.is_success() {
            anyhow::bail!("chart API returned {} for {}: {}", status, ticker, body);
        }

        let points = parse_chart(&body).with_context(|| format!("malformed chart for {ticker}"))?;
        anyhow::ensure!(!points.is_empty(), "chart for {ticker} has no closes");

        debug!(
            ticker,
            count = points.len(),
            last = points.last().map(|p| p.close),
            "macro series fetched"
        );
        Ok(points)
    }
}

/// Extract `(timestamp_ms, close)` pairs from a chart payload.
///
/// Yahoo timestamps are UNIX seconds; they are converted to milliseconds to
/// match exchange bars.
pub fn parse_chart(body: &serde_json::Value) -> Result<Vec<MacroPoint>> {
    let result = body["chart"]["result"]
        .as_array()
        .and_then(|r| r.first())
        .context("chart response has no result")?;

    let timestamps = result["timestamp"]
        .as_array()
        .context("chart result missing 'timestamp' array")?;
    let closes = result["indicators"]["quote"]
        .as_array()
        .and_then(|q| q.first())
        .and_then(|q| q["close"].as_array())
        .context("chart result missing close quotes")?;

    let points = timestamps
        .iter()
        .zip(closes)
        .filter_map(|(ts, close)| {
            Some(MacroPoint {
                timestamp: ts.as_i64()? * 1000,
                close: close.as_f64().filter(|c| c.is_finite())?,
            })
        })
        .collect();

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_closes_and_skips_nulls() {
        let body = json!({
            "chart": {
                "result": [{
                    "timestamp": [1_700_000_000, 1_700_086_400, 1_700_172_800],
                    "indicators": { "quote": [{ "close": [103.2, null, 104.9] }] }
                }],
                "error": null
            }
        });
        let points = parse_chart(&body).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].timestamp, 1_700_000_000_000);
        assert_eq!(points[1].close, 104.9);
    }

    #[test]
    fn missing_result_is_an_error() {
        let body = json!({ "chart": { "result": null, "error": { "code": "Not Found" } } });
        assert!(parse_chart(&body).is_err());
    }

    #[test]
    fn missing_quotes_is_an_error() {
        let body = json!({ "chart": { "result": [{ "timestamp": [1], "indicators": {} }] } });
        assert!(parse_chart(&body).is_err());
    }
}
