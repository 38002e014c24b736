// =============================================================================
// Sentiment Feed — alternative.me Crypto Fear & Greed Index
// =============================================================================
//
// 0 = extreme fear, 100 = extreme greed. The composite scorer reads values
// below 35 as a contrarian accumulation cue.

use anyhow::{Context, Result};
use tracing::{debug, instrument};

use crate::types::SentimentSnapshot;

const FNG_URL: &str = "https://api.alternative.me/fng/";

/// Fetches the latest Fear & Greed reading.
#[derive(Debug, Clone)]
pub struct SentimentFeed {
    client: reqwest::Client,
}

impl SentimentFeed {
    /// Create a feed that re-uses an existing HTTP client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    #[instrument(skip(self), name = "sentiment::fetch")]
    pub async fn fetch(&self) -> Result<SentimentSnapshot> {
        let resp = self
            .client
            .get(FNG_URL)
            .send()
            .await
            .context("GET fear & greed index")?;

        let status = resp.status();
        let body: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse fear & greed response body")?;

        if !status.is_success() {
            anyhow::bail!("fear & greed API returned {}: {}", status, body);
        }

        let snapshot = parse_fng(&body)?;
        debug!(
            value = snapshot.value,
            classification = %snapshot.classification,
            "sentiment fetched"
        );
        Ok(snapshot)
    }
}

/// Parse `data[0].value` (a numeric string) and its classification.
pub fn parse_fng(body: &serde_json::Value) -> Result<SentimentSnapshot> {
    let entry = body["data"]
        .as_array()
        .and_then(|d| d.first())
        .context("fear & greed response has no data")?;

    let raw = &entry["value"];
    let value: u8 = match raw.as_str() {
        Some(s) => s
            .trim()
            .parse()
            .with_context(|| format!("fear & greed value '{s}' is not an integer"))?,
        None => raw
            .as_u64()
            .and_then(|v| u8::try_from(v).ok())
            .with_context(|| format!("fear & greed value {raw} is not an integer"))?,
    };
    anyhow::ensure!(value <= 100, "fear & greed value {value} outside [0, 100]");

    let classification = entry["value_classification"]
        .as_str()
        .context("fear & greed response has no value_classification")?
        .to_string();

    Ok(SentimentSnapshot {
        value,
        classification,
    })
}
