// =============================================================================
// Fibonacci Retracement — 0.618 level over the whole window
// =============================================================================
//
//   high  = max(highs)
//   low   = min(lows)
//   level = high - 0.618 * (high - low)
//
// Computed once per window from whole-window reductions, never rolling. A flat
// window (high == low) yields level == high == low.

use serde::{Deserialize, Serialize};

use crate::types::PriceBar;

/// Golden-ratio retracement depth.
pub const RETRACEMENT_RATIO: f64 = 0.618;

/// The window extremes and the derived retracement price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FibonacciLevel {
    pub high: f64,
    pub low: f64,
    pub level: f64,
}

/// Derive the 0.618 level from separate high and low sequences.
///
/// Returns `None` if either sequence is empty.
pub fn retracement(highs: &[f64], lows: &[f64]) -> Option<FibonacciLevel> {
    let high = highs.iter().copied().reduce(f64::max)?;
    let low = lows.iter().copied().reduce(f64::min)?;

    Some(FibonacciLevel {
        high,
        low,
        level: high - RETRACEMENT_RATIO * (high - low),
    })
}

/// Convenience wrapper over a bar window.
pub fn from_bars(bars: &[PriceBar]) -> Option<FibonacciLevel> {
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    retracement(&highs, &lows)
}
