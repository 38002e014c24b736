// =============================================================================
// Market Data Module
// =============================================================================
//
// Fetches the three independent inputs the engine needs for one symbol:
//
//   1. Daily klines        — Binance public REST
//   2. Macro series        — Yahoo Finance chart (NASDAQ, DXY)
//   3. Sentiment           — alternative.me Fear & Greed
//
// The fetches run concurrently; any failure fails the whole request (no
// partial inputs, no default numbers). Results are memoised per symbol for
// the configured TTL.

pub mod binance;
pub mod cache;
pub mod macro_feed;
pub mod sentiment;

pub use binance::BinanceClient;
pub use cache::InputCache;
pub use macro_feed::MacroFeed;
pub use sentiment::SentimentFeed;

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::engine::EngineInput;

/// Async collaborator that produces [`EngineInput`]s.
pub struct MarketDataService {
    binance: BinanceClient,
    macro_feed: MacroFeed,
    sentiment: SentimentFeed,
    cache: InputCache,
    quote_asset: String,
    interval: String,
    window_size: u32,
}

impl MarketDataService {
    /// Build the service with a shared HTTP client.
    pub fn new(
        client: reqwest::Client,
        quote_asset: impl Into<String>,
        interval: impl Into<String>,
        window_size: u32,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            binance: BinanceClient::with_client(client.clone()),
            macro_feed: MacroFeed::with_client(client.clone(), window_size),
            sentiment: SentimentFeed::with_client(client),
            cache: InputCache::new(cache_ttl),
            quote_asset: quote_asset.into(),
            interval: interval.into(),
            window_size,
        }
    }

    /// Inputs for `symbol`, served from cache unless `refresh` is set.
    pub async fn inputs(&self, symbol: &str, refresh: bool) -> Result<EngineInput> {
        if !refresh {
            if let Some(cached) = self.cache.get(symbol) {
                debug!(symbol, "market inputs served from cache");
                return Ok(cached);
            }
        }

        let input = self.fetch(symbol).await?;
        self.cache.prune();
        self.cache.put(symbol, input.clone());
        debug!(symbol, cached_symbols = self.cache.len(), "market inputs cached");
        Ok(input)
    }

    async fn fetch(&self, symbol: &str) -> Result<EngineInput> {
        let pair = format!("{symbol}{}", self.quote_asset);

        let (bars, macro_series, sentiment) = tokio::try_join!(
            self.binance
                .get_klines(&pair, &self.interval, self.window_size),
            self.macro_feed.fetch(),
            self.sentiment.fetch()
        )
        .with_context(|| format!("failed to fetch market inputs for {pair}"))?;

        info!(
            symbol,
            bars = bars.len(),
            nasdaq_points = macro_series.nasdaq.len(),
            dxy_points = macro_series.dollar_index.len(),
            sentiment = sentiment.value,
            "market inputs fetched"
        );

        Ok(EngineInput {
            symbol: symbol.to_string(),
            bars,
            macro_series,
            sentiment,
        })
    }
}
