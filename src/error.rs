// =============================================================================
// Engine errors
// =============================================================================
//
// Insufficient history is NOT an error: indicator fields carry `None` for it.
// Everything here is a contract violation the engine refuses to compute on.

use thiserror::Error;

/// Minimum accepted alert sensitivity, in percent.
pub const MIN_SENSITIVITY_PCT: f64 = 0.5;
/// Maximum accepted alert sensitivity, in percent.
pub const MAX_SENSITIVITY_PCT: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("price batch is empty")]
    EmptyBatch,

    #[error("bar {index}: timestamp {timestamp} does not follow {previous}")]
    NonMonotonicTimestamps {
        index: usize,
        previous: i64,
        timestamp: i64,
    },

    #[error("bar {index}: high {high} is below low {low}")]
    HighBelowLow { index: usize, high: f64, low: f64 },

    #[error("bar {index}: non-finite price field")]
    NonFinitePrice { index: usize },

    #[error("macro reference series is empty")]
    MissingMacroData,

    #[error("sentiment value {0} outside [0, 100]")]
    SentimentOutOfRange(u8),

    #[error("alert sensitivity {0}% outside [0.5, 5.0]")]
    SensitivityOutOfRange(f64),
}

/// Reject (never clamp) a sensitivity outside the accepted range.
pub fn validate_sensitivity(pct: f64) -> Result<f64, EngineError> {
    if pct.is_finite() && (MIN_SENSITIVITY_PCT..=MAX_SENSITIVITY_PCT).contains(&pct) {
        Ok(pct)
    } else {
        Err(EngineError::SensitivityOutOfRange(pct))
    }
}
