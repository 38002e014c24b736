// =============================================================================
// Composite Scorer — additive rule-based accumulation score
// =============================================================================
//
// Starts from a base of 50 and adds points for each independent rule that
// fires. Rules never suppress one another; the breakdown records every rule,
// triggered or not, so the presentation layer can explain the score.
//
//   +10  close above the Fibonacci 0.618 level
//   +15  sentiment below 35 (extreme fear, contrarian)
//   +10  dollar index below 104.5 (weak dollar, risk-on)
//   +15  RSI below 30 (oversold); no contribution without RSI history

use serde::{Deserialize, Serialize};

use crate::indicators::rsi::OVERSOLD;

/// Thresholds and point values for each scoring rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    pub base: i32,
    pub above_fib_points: i32,
    pub fear_threshold: u8,
    pub fear_points: i32,
    pub weak_dollar_threshold: f64,
    pub weak_dollar_points: i32,
    pub oversold_threshold: f64,
    pub oversold_points: i32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            base: 50,
            above_fib_points: 10,
            fear_threshold: 35,
            fear_points: 15,
            weak_dollar_threshold: 104.5,
            weak_dollar_points: 10,
            oversold_threshold: OVERSOLD,
            oversold_points: 15,
        }
    }
}

/// Latest values the score is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreInput {
    pub close: f64,
    pub fib_level: f64,
    /// `None` when the RSI window has insufficient history.
    pub rsi: Option<f64>,
    pub dollar_index: f64,
    pub sentiment: u8,
}

/// The contribution of a single rule to the final score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleContribution {
    pub rule: String,
    pub triggered: bool,
    pub points: i32,
}

/// Result of the scoring pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub score: i32,
    pub contributions: Vec<RuleContribution>,
}

/// Additive scorer over [`ScoringRules`].
#[derive(Debug, Clone, Default)]
pub struct CompositeScorer {
    rules: ScoringRules,
}

impl CompositeScorer {
    pub fn new(rules: ScoringRules) -> Self {
        Self { rules }
    }

    /// Score the latest market state.
    pub fn score(&self, input: &ScoreInput) -> ScoreBreakdown {
        let r = &self.rules;

        let oversold = matches!(input.rsi, Some(v) if v < r.oversold_threshold);

        let checks = [
            ("price_above_fib", input.close > input.fib_level, r.above_fib_points),
            ("extreme_fear", input.sentiment < r.fear_threshold, r.fear_points),
            (
                "weak_dollar",
                input.dollar_index < r.weak_dollar_threshold,
                r.weak_dollar_points,
            ),
            ("rsi_oversold", oversold, r.oversold_points),
        ];

        let contributions: Vec<RuleContribution> = checks
            .iter()
            .map(|&(rule, triggered, points)| RuleContribution {
                rule: rule.to_string(),
                triggered,
                points: if triggered { points } else { 0 },
            })
            .collect();

        let score = r.base + contributions.iter().map(|c| c.points).sum::<i32>();

        ScoreBreakdown {
            score,
            contributions,
        }
    }
}
