// =============================================================================
// Alert Evaluator — Fibonacci proximity / near-high zones and signal label
// =============================================================================
//
// Stateless classification of the latest close:
//
//   distance = |price - fib| / fib * 100
//   distance <= sensitivity       => FIB_PROXIMITY   (checked first)
//   price    >  0.98 * windowHigh => NEAR_HIGH
//   otherwise                     => NONE
//
// The score label is independent of the alert:
//   score > 65 => STRONG_ACCUMULATION, score < 35 => RISK_REDUCTION,
//   otherwise NEUTRAL.

use serde::{Deserialize, Serialize};

use crate::types::{AlertState, SignalLabel};

/// Default Fibonacci proximity sensitivity, in percent.
pub const DEFAULT_SENSITIVITY_PCT: f64 = 1.5;
/// Fraction of the window high above which a close is "near the high".
pub const NEAR_HIGH_RATIO: f64 = 0.98;

const STRONG_ACCUMULATION_ABOVE: i32 = 65;
const RISK_REDUCTION_BELOW: i32 = 35;

/// Outcome of a single alert evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertEvaluation {
    pub state: AlertState,
    /// Distance from price to the Fibonacci level in percent. `None` when the
    /// level is not positive.
    pub distance_to_fib_pct: Option<f64>,
}

/// Classify the latest price into an alert zone.
///
/// `sensitivity_pct` must already be validated by the caller.
pub fn evaluate(price: f64, fib_level: f64, window_high: f64, sensitivity_pct: f64) -> AlertEvaluation {
    let distance_to_fib_pct =
        (fib_level > 0.0).then(|| (price - fib_level).abs() / fib_level * 100.0);

    let state = match distance_to_fib_pct {
        Some(d) if d <= sensitivity_pct => AlertState::FibProximity,
        _ if price > NEAR_HIGH_RATIO * window_high => AlertState::NearHigh,
        _ => AlertState::None,
    };

    AlertEvaluation {
        state,
        distance_to_fib_pct,
    }
}

/// Map a composite score to its signal label.
pub fn label(score: i32) -> SignalLabel {
    if score > STRONG_ACCUMULATION_ABOVE {
        SignalLabel::StrongAccumulation
    } else if score < RISK_REDUCTION_BELOW {
        SignalLabel::RiskReduction
    } else {
        SignalLabel::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_example_is_near_high() {
        let eval = evaluate(120.0, 107.64, 120.0, DEFAULT_SENSITIVITY_PCT);
        assert_eq!(eval.state, AlertState::NearHigh);
        let d = eval.distance_to_fib_pct.unwrap();
        assert!((d - 11.48).abs() < 0.01, "distance {d}");
    }

    #[test]
    fn proximity_inside_sensitivity() {
        let eval = evaluate(101.0, 100.0, 200.0, 1.5);
        assert_eq!(eval.state, AlertState::FibProximity);
    }

    #[test]
    fn proximity_boundary_is_inclusive() {
        let eval = evaluate(102.0, 100.0, 200.0, 2.0);
        assert_eq!(eval.state, AlertState::FibProximity);
    }

    #[test]
    fn proximity_wins_over_near_high() {
        // Fib level right under the high: both conditions hold.
        let eval = evaluate(99.5, 99.0, 100.0, 1.5);
        assert!(99.5 > NEAR_HIGH_RATIO * 100.0);
        assert_eq!(eval.state, AlertState::FibProximity);
    }

    #[test]
    fn near_high_boundary_is_exclusive() {
        // Fib far below so only the near-high rule is in play.
        let eval = evaluate(98.0, 10.0, 100.0, 1.5);
        assert_eq!(98.0, NEAR_HIGH_RATIO * 100.0);
        assert_eq!(eval.state, AlertState::None);

        let eval = evaluate(98.01, 10.0, 100.0, 1.5);
        assert_eq!(eval.state, AlertState::NearHigh);
    }

    #[test]
    fn no_alert_in_between() {
        let eval = evaluate(150.0, 120.0, 200.0, 1.5);
        assert_eq!(eval.state, AlertState::None);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let a = evaluate(117.7, 107.64, 120.0, 1.5);
        let b = evaluate(117.7, 107.64, 120.0, 1.5);
        assert_eq!(a, b);
    }

    #[test]
    fn non_positive_fib_skips_proximity() {
        let eval = evaluate(0.0, 0.0, 0.0, 1.5);
        assert_eq!(eval.distance_to_fib_pct, None);
        assert_eq!(eval.state, AlertState::None);
    }

    #[test]
    fn label_boundaries_exclusive() {
        assert_eq!(label(66), SignalLabel::StrongAccumulation);
        assert_eq!(label(65), SignalLabel::Neutral);
        assert_eq!(label(35), SignalLabel::Neutral);
        assert_eq!(label(34), SignalLabel::RiskReduction);
        assert_eq!(label(85), SignalLabel::StrongAccumulation);
    }
}
