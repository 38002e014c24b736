// =============================================================================
// Input Cache — short-lived memo of fetched market inputs per symbol
// =============================================================================
//
// Avoids hammering the upstream providers when the dashboard re-requests the
// same symbol. Only raw inputs are cached; reports are always recomputed.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::engine::EngineInput;

/// Thread-safe TTL cache keyed by symbol.
pub struct InputCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

struct CacheEntry {
    input: EngineInput,
    fetched_at: Instant,
}

impl InputCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Return a copy of the cached input if it is younger than the TTL.
    pub fn get(&self, symbol: &str) -> Option<EngineInput> {
        self.get_at(symbol, Instant::now())
    }

    /// Store a freshly fetched input.
    pub fn put(&self, symbol: impl Into<String>, input: EngineInput) {
        self.put_at(symbol, input, Instant::now());
    }

    /// Drop every expired entry.
    pub fn prune(&self) {
        let now = Instant::now();
        let ttl = self.ttl;
        self.entries
            .write()
            .retain(|_, entry| now.duration_since(entry.fetched_at) < ttl);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    fn get_at(&self, symbol: &str, now: Instant) -> Option<EngineInput> {
        let entries = self.entries.read();
        let entry = entries.get(symbol)?;
        (now.duration_since(entry.fetched_at) < self.ttl).then(|| entry.input.clone())
    }

    fn put_at(&self, symbol: impl Into<String>, input: EngineInput, fetched_at: Instant) {
        self.entries
            .write()
            .insert(symbol.into(), CacheEntry { input, fetched_at });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MacroSeries, SentimentSnapshot};

    fn input(symbol: &str) -> EngineInput {
        EngineInput {
            symbol: symbol.to_string(),
            bars: Vec::new(),
            macro_series: MacroSeries::default(),
            sentiment: SentimentSnapshot {
                value: 50,
                classification: "Neutral".to_string(),
            },
        }
    }

    #[test]
    fn fresh_entry_is_returned() {
        let cache = InputCache::new(Duration::from_secs(300));
        cache.put("BTC", input("BTC"));
        assert_eq!(cache.get("BTC").unwrap().symbol, "BTC");
        assert!(cache.get("ETH").is_none());
    }

    #[test]
    fn expired_entry_is_ignored() {
        let cache = InputCache::new(Duration::from_secs(300));
        let start = Instant::now();
        cache.put_at("BTC", input("BTC"), start);
        assert!(cache.get_at("BTC", start + Duration::from_secs(299)).is_some());
        assert!(cache.get_at("BTC", start + Duration::from_secs(300)).is_none());
    }

    #[test]
    fn prune_drops_expired() {
        let cache = InputCache::new(Duration::ZERO);
        cache.put("BTC", input("BTC"));
        cache.prune();
        assert_eq!(cache.len(), 0);
    }
}
