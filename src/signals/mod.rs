// =============================================================================
// Signals Module
// =============================================================================
//
// Turns the latest indicator values into decisions for the presentation layer:
// - Composite additive score (Fibonacci, sentiment, dollar index, RSI)
// - Signal label from the score
// - Fibonacci proximity / near-high alert zones

pub mod alert;
pub mod composite_score;

pub use alert::{AlertEvaluation, DEFAULT_SENSITIVITY_PCT};
pub use composite_score::{CompositeScorer, ScoreBreakdown, ScoreInput, ScoringRules};
