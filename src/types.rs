// =============================================================================
// Shared types used across the Oracle terminal
// =============================================================================

use serde::{Deserialize, Serialize};

/// A single daily OHLCV bar for the selected asset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Bar open time in milliseconds since the UNIX epoch.
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// A [`PriceBar`] plus the indicators derived for its position in the window.
///
/// `None` means "insufficient history": the trailing window ending at this
/// bar is too short for the indicator to be computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedBar {
    #[serde(flatten)]
    pub bar: PriceBar,
    pub moving_average: Option<f64>,
    pub std_dev: Option<f64>,
    pub bollinger_upper: Option<f64>,
    pub bollinger_lower: Option<f64>,
    pub rsi: Option<f64>,
}

/// One observation of a macro reference series (NASDAQ, DXY).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroPoint {
    pub timestamp: i64,
    pub close: f64,
}

/// Full macro reference history as fetched, independently of the asset
/// series. No alignment by date is attempted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroSeries {
    pub nasdaq: Vec<MacroPoint>,
    pub dollar_index: Vec<MacroPoint>,
}

impl MacroSeries {
    /// Latest observed value of each series, or `None` if either is empty.
    pub fn snapshot(&self) -> Option<MacroSnapshot> {
        Some(MacroSnapshot {
            nasdaq_close: self.nasdaq.last()?.close,
            dollar_index_close: self.dollar_index.last()?.close,
        })
    }
}

/// Last observed close of each macro reference series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroSnapshot {
    pub nasdaq_close: f64,
    pub dollar_index_close: f64,
}

/// Fear & Greed style market mood reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentSnapshot {
    /// 0 = extreme fear, 100 = extreme greed.
    pub value: u8,
    pub classification: String,
}

/// Discrete signal derived from the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalLabel {
    StrongAccumulation,
    Neutral,
    RiskReduction,
}

impl std::fmt::Display for SignalLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StrongAccumulation => write!(f, "STRONG_ACCUMULATION"),
            Self::Neutral => write!(f, "NEUTRAL"),
            Self::RiskReduction => write!(f, "RISK_REDUCTION"),
        }
    }
}

/// Price-zone alert for the latest close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertState {
    None,
    FibProximity,
    NearHigh,
}

impl Default for AlertState {
    fn default() -> Self {
        Self::None
    }
}

impl std::fmt::Display for AlertState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "NONE"),
            Self::FibProximity => write!(f, "FIB_PROXIMITY"),
            Self::NearHigh => write!(f, "NEAR_HIGH"),
        }
    }
}

/// Where the latest close sits relative to the Bollinger envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BollingerPosition {
    /// Close below the lower band: buy zone.
    BelowLowerBand,
    Inside,
    AboveUpperBand,
    InsufficientHistory,
}

impl std::fmt::Display for BollingerPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BelowLowerBand => write!(f, "BELOW_LOWER_BAND"),
            Self::Inside => write!(f, "INSIDE"),
            Self::AboveUpperBand => write!(f, "ABOVE_UPPER_BAND"),
            Self::InsufficientHistory => write!(f, "INSUFFICIENT_HISTORY"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_takes_last_points() {
        let series = MacroSeries {
            nasdaq: vec![
                MacroPoint { timestamp: 1, close: 17_000.0 },
                MacroPoint { timestamp: 2, close: 17_250.0 },
            ],
            dollar_index: vec![MacroPoint { timestamp: 3, close: 103.9 }],
        };
        let snap = series.snapshot().unwrap();
        assert_eq!(snap.nasdaq_close, 17_250.0);
        assert_eq!(snap.dollar_index_close, 103.9);
    }

    #[test]
    fn snapshot_none_when_series_missing() {
        let series = MacroSeries {
            nasdaq: vec![MacroPoint { timestamp: 1, close: 17_000.0 }],
            dollar_index: Vec::new(),
        };
        assert!(series.snapshot().is_none());
    }

    #[test]
    fn labels_serialise_screaming_snake() {
        let json = serde_json::to_string(&SignalLabel::StrongAccumulation).unwrap();
        assert_eq!(json, "\"STRONG_ACCUMULATION\"");
        let json = serde_json::to_string(&AlertState::FibProximity).unwrap();
        assert_eq!(json, "\"FIB_PROXIMITY\"");
        assert_eq!(AlertState::NearHigh.to_string(), "NEAR_HIGH");
    }

    #[test]
    fn enriched_bar_flattens_price_fields() {
        let bar = EnrichedBar {
            bar: PriceBar::new(1_700_000_000_000, 1.0, 2.0, 0.5, 1.5, 10.0),
            moving_average: None,
            std_dev: None,
            bollinger_upper: None,
            bollinger_lower: None,
            rsi: Some(55.0),
        };
        let value = serde_json::to_value(&bar).unwrap();
        assert_eq!(value["close"], 1.5);
        assert!(value["moving_average"].is_null());
        assert_eq!(value["rsi"], 55.0);
    }
}
