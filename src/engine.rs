// =============================================================================
// Oracle Engine — batch recomputation of indicators, score and alerts
// =============================================================================
//
// One call = one finite batch of daily bars plus the macro and sentiment
// readings fetched alongside it. Everything is recomputed from scratch; the
// engine holds no state between calls and performs no I/O.
//
// Pipeline:
//   1. Validate the batch (non-empty, finite, high >= low, increasing time)
//   2. Enrich every bar with MA / σ / Bollinger / RSI
//   3. Fibonacci 0.618 level over the whole window
//   4. Composite score + label
//   5. Alert zone for the latest close
//   6. Extras for the dashboard: daily change, Bollinger position,
//      historical RSI/Fibonacci hits, normalised NASDAQ overlay
// =============================================================================

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{validate_sensitivity, EngineError};
use crate::fibonacci::{self, FibonacciLevel};
use crate::indicators::{self, bollinger};
use crate::signals::{alert, AlertEvaluation, CompositeScorer, ScoreBreakdown, ScoreInput, ScoringRules};
use crate::types::{
    AlertState, BollingerPosition, EnrichedBar, MacroSeries, MacroSnapshot, PriceBar,
    SentimentSnapshot, SignalLabel,
};

/// RSI ceiling for the historical strategy simulation.
const BACKTEST_RSI_BELOW: f64 = 35.0;

// =============================================================================
// Inputs
// =============================================================================

/// Tunable indicator and alert parameters for a single run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineParams {
    pub ma_period: usize,
    pub bollinger_k: f64,
    pub rsi_period: usize,
    pub sensitivity_pct: f64,
    /// Whether a triggered alert is surfaced as a display message.
    pub visual_alerts: bool,
    pub scoring: ScoringRules,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            ma_period: 20,
            bollinger_k: 2.0,
            rsi_period: 14,
            sensitivity_pct: alert::DEFAULT_SENSITIVITY_PCT,
            visual_alerts: true,
            scoring: ScoringRules::default(),
        }
    }
}

/// Everything fetched for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineInput {
    pub symbol: String,
    pub bars: Vec<PriceBar>,
    pub macro_series: MacroSeries,
    pub sentiment: SentimentSnapshot,
}

// =============================================================================
// Outputs
// =============================================================================

/// A bar where the RSI / Fibonacci entry condition held.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BacktestHit {
    pub timestamp: i64,
    pub close: f64,
    pub rsi: f64,
}

/// One min-max normalised point for the overlay chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub timestamp: i64,
    /// In [0, 1]; `None` when the series is flat.
    pub value: Option<f64>,
}

/// Asset vs NASDAQ overlay, each normalised over its own range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    pub asset: Vec<NormalizedPoint>,
    pub nasdaq: Vec<NormalizedPoint>,
}

/// Full result of one engine run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleReport {
    /// Unique identifier for this report (UUID v4).
    pub id: String,
    pub symbol: String,
    /// ISO 8601 timestamp of when this report was computed.
    pub generated_at: String,
    pub latest_close: f64,
    /// Latest close vs previous close, in percent.
    pub price_change_pct: Option<f64>,
    pub latest_rsi: Option<f64>,
    /// OVERBOUGHT / OVERSOLD / NEUTRAL for the latest RSI.
    pub rsi_zone: Option<String>,
    pub fibonacci: FibonacciLevel,
    pub macro_snapshot: MacroSnapshot,
    pub sentiment: SentimentSnapshot,
    pub score: ScoreBreakdown,
    pub label: SignalLabel,
    pub alert: AlertEvaluation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_message: Option<String>,
    pub bollinger_position: BollingerPosition,
    pub backtest_hits: Vec<BacktestHit>,
    pub correlation: Correlation,
    pub bars: Vec<EnrichedBar>,
}

// =============================================================================
// Entry point
// =============================================================================

/// Run the full pipeline over `input`.
pub fn run(input: &EngineInput, params: &EngineParams) -> Result<OracleReport, EngineError> {
    let sensitivity = validate_sensitivity(params.sensitivity_pct)?;
    validate_bars(&input.bars)?;

    if input.sentiment.value > 100 {
        return Err(EngineError::SentimentOutOfRange(input.sentiment.value));
    }
    let macro_snapshot = input
        .macro_series
        .snapshot()
        .ok_or(EngineError::MissingMacroData)?;

    let bars = enrich(&input.bars, params);
    let fibonacci = fibonacci::from_bars(&input.bars).ok_or(EngineError::EmptyBatch)?;
    let latest = bars.last().ok_or(EngineError::EmptyBatch)?;
    let latest_close = latest.bar.close;

    let scorer = CompositeScorer::new(params.scoring);
    let score = scorer.score(&ScoreInput {
        close: latest_close,
        fib_level: fibonacci.level,
        rsi: latest.rsi,
        dollar_index: macro_snapshot.dollar_index_close,
        sentiment: input.sentiment.value,
    });
    let label = alert::label(score.score);

    let alert = alert::evaluate(latest_close, fibonacci.level, fibonacci.high, sensitivity);
    let alert_message = if params.visual_alerts {
        alert_message(&input.symbol, &alert, &fibonacci)
    } else {
        None
    };

    let band = match (latest.bollinger_upper, latest.bollinger_lower) {
        (Some(upper), Some(lower)) => Some(indicators::Band { upper, lower }),
        _ => None,
    };

    let report = OracleReport {
        id: uuid::Uuid::new_v4().to_string(),
        symbol: input.symbol.clone(),
        generated_at: Utc::now().to_rfc3339(),
        latest_close,
        price_change_pct: price_change_pct(&input.bars),
        latest_rsi: latest.rsi,
        rsi_zone: latest.rsi.map(|v| indicators::rsi::zone(v).to_string()),
        fibonacci,
        macro_snapshot,
        sentiment: input.sentiment.clone(),
        score,
        label,
        alert,
        alert_message,
        bollinger_position: bollinger::position(latest_close, band),
        backtest_hits: backtest_hits(&bars, fibonacci.level),
        correlation: Correlation {
            asset: normalize(input.bars.iter().map(|b| (b.timestamp, b.close))),
            nasdaq: normalize(input.macro_series.nasdaq.iter().map(|p| (p.timestamp, p.close))),
        },
        bars,
    };

    debug!(
        symbol = %report.symbol,
        bars = report.bars.len(),
        score = report.score.score,
        label = %report.label,
        alert = %report.alert.state,
        fib = format!("{:.2}", report.fibonacci.level),
        "oracle run complete"
    );

    Ok(report)
}

// =============================================================================
// Pipeline stages
// =============================================================================

/// Reject batches the indicators cannot meaningfully run on.
pub fn validate_bars(bars: &[PriceBar]) -> Result<(), EngineError> {
    if bars.is_empty() {
        return Err(EngineError::EmptyBatch);
    }

    for (index, bar) in bars.iter().enumerate() {
        let finite = [bar.open, bar.high, bar.low, bar.close, bar.volume]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(EngineError::NonFinitePrice { index });
        }
        if bar.high < bar.low {
            return Err(EngineError::HighBelowLow {
                index,
                high: bar.high,
                low: bar.low,
            });
        }
        if index > 0 {
            let previous = bars[index - 1].timestamp;
            if bar.timestamp <= previous {
                return Err(EngineError::NonMonotonicTimestamps {
                    index,
                    previous,
                    timestamp: bar.timestamp,
                });
            }
        }
    }

    Ok(())
}

/// Attach every indicator to its bar.
pub fn enrich(bars: &[PriceBar], params: &EngineParams) -> Vec<EnrichedBar> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

    let ma = indicators::moving_average(&closes, params.ma_period);
    let sd = indicators::rolling_std_dev(&closes, params.ma_period);
    let bands = indicators::bollinger_bands(&ma, &sd, params.bollinger_k);
    let rsi = indicators::rsi(&closes, params.rsi_period);

    bars.iter()
        .enumerate()
        .map(|(i, bar)| EnrichedBar {
            bar: *bar,
            moving_average: ma[i],
            std_dev: sd[i],
            bollinger_upper: bands[i].map(|b| b.upper),
            bollinger_lower: bands[i].map(|b| b.lower),
            rsi: rsi[i],
        })
        .collect()
}

/// Bars where RSI < 35 and the close sits above the Fibonacci level.
pub fn backtest_hits(bars: &[EnrichedBar], fib_level: f64) -> Vec<BacktestHit> {
    bars.iter()
        .filter_map(|b| {
            let rsi = b.rsi?;
            (rsi < BACKTEST_RSI_BELOW && b.bar.close > fib_level).then_some(BacktestHit {
                timestamp: b.bar.timestamp,
                close: b.bar.close,
                rsi,
            })
        })
        .collect()
}

/// Latest close vs the previous close, in percent.
fn price_change_pct(bars: &[PriceBar]) -> Option<f64> {
    let [.., prev, last] = bars else {
        return None;
    };
    if prev.close == 0.0 {
        return None;
    }
    Some((last.close / prev.close - 1.0) * 100.0)
}

/// Min-max normalise a series into [0, 1].
fn normalize(points: impl Iterator<Item = (i64, f64)> + Clone) -> Vec<NormalizedPoint> {
    let min = points.clone().map(|(_, v)| v).fold(f64::INFINITY, f64::min);
    let max = points.clone().map(|(_, v)| v).fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    points
        .map(|(timestamp, v)| NormalizedPoint {
            timestamp,
            value: (range > 0.0).then(|| (v - min) / range),
        })
        .collect()
}

fn alert_message(symbol: &str, alert: &AlertEvaluation, fib: &FibonacciLevel) -> Option<String> {
    match alert.state {
        AlertState::FibProximity => Some(format!(
            "MARKET ALERT: {symbol} is in the Fibonacci 0.618 zone (${:.2}), distance {:.2}%",
            fib.level,
            alert.distance_to_fib_pct.unwrap_or_default()
        )),
        AlertState::NearHigh => Some(format!(
            "FOMO ALERT: {symbol} is close to the window high (${:.2})",
            fib.high
        )),
        AlertState::None => None,
    }
}
