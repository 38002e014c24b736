// =============================================================================
// Relative Strength Index (RSI) — simple-mean variant
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — delta_i = close_i - close_{i-1}  (undefined at i = 0)
// Step 2 — gain = max(delta, 0), loss = max(-delta, 0); both 0 at i = 0
// Step 3 — avg_gain / avg_loss are TRAILING SIMPLE MEANS of the last `period`
//          gains / losses (not Wilder smoothing)
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// With no losses in the window RS is infinite and RSI saturates at 100.
// =============================================================================

/// Oversold threshold used for labels and the scoring bonus.
pub const OVERSOLD: f64 = 30.0;
/// Overbought threshold used for labels.
pub const OVERBOUGHT: f64 = 70.0;

/// Compute the RSI series, one output per close.
///
/// The first `period - 1` positions are `None`. The first bar has no delta
/// and contributes zero gain and zero loss, so the first defined value sits
/// at index `period - 1` and averages `period - 1` real deltas over `period`.
///
/// # Edge cases
/// - `period == 0` => all `None`
/// - average loss of zero => 100.0, including a flat window
pub fn rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() < period {
        return out;
    }

    // (gain, loss) per close index; index 0 has no delta.
    let moves: Vec<(f64, f64)> = std::iter::once((0.0, 0.0))
        .chain(closes.windows(2).map(|w| {
            let d = w[1] - w[0];
            if d > 0.0 {
                (d, 0.0)
            } else {
                (0.0, -d)
            }
        }))
        .collect();
    let period_f = period as f64;

    for (start, window) in moves.windows(period).enumerate() {
        let (sum_gain, sum_loss) = window
            .iter()
            .fold((0.0_f64, 0.0_f64), |(g, l), &(gain, loss)| (g + gain, l + loss));
        out[start + period - 1] = rsi_from_averages(sum_gain / period_f, sum_loss / period_f);
    }

    out
}

/// Human-readable zone for an RSI reading.
pub fn zone(value: f64) -> &'static str {
    if value >= OVERBOUGHT {
        "OVERBOUGHT"
    } else if value < OVERSOLD {
        "OVERSOLD"
    } else {
        "NEUTRAL"
    }
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert average gain / average loss into an RSI value in [0, 100].
///
/// Returns `None` when the result is non-finite (non-finite inputs).
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    let value = if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    };

    value.is_finite().then_some(value)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_empty_input() {
        assert!(rsi(&[], 14).is_empty());
    }

    #[test]
    fn rsi_period_zero() {
        assert_eq!(rsi(&[1.0, 2.0, 3.0], 0), vec![None, None, None]);
    }

    #[test]
    fn rsi_insufficient_history_below_fourteen() {
        let closes: Vec<f64> = (1..=13).map(|x| x as f64).collect();
        let series = rsi(&closes, 14);
        assert_eq!(series.len(), 13);
        assert!(series.iter().all(Option::is_none));
    }

    #[test]
    fn rsi_fourteen_increasing_closes_is_100() {
        let closes: Vec<f64> = (1..=14).map(|x| x as f64).collect();
        let series = rsi(&closes, 14);
        assert!(series[..13].iter().all(Option::is_none));
        assert_eq!(series[13], Some(100.0));
    }

    #[test]
    fn rsi_first_value_counts_missing_delta_as_flat() {
        // 13 deltas of -1 plus the empty first slot: avg_gain 0, avg_loss 13/14.
        let closes: Vec<f64> = (1..=14).rev().map(|x| x as f64).collect();
        let series = rsi(&closes, 14);
        assert_eq!(series[12], None);
        assert!(series[13].unwrap().abs() < 1e-12);

        // Index 13 with a mixed window: gains 2 * 7, losses 1 * 6 over 14 slots.
        let mut mixed = vec![100.0];
        for i in 0..13 {
            let last = *mixed.last().unwrap();
            mixed.push(if i % 2 == 0 { last + 2.0 } else { last - 1.0 });
        }
        let value = rsi(&mixed, 14)[13].unwrap();
        let expected = 100.0 - 100.0 / (1.0 + 14.0 / 6.0);
        assert!((value - expected).abs() < 1e-9, "RSI {value}");
    }

    #[test]
    fn rsi_all_gains_saturates_at_100() {
        let closes: Vec<f64> = (1..=40).map(|x| x as f64).collect();
        for v in rsi(&closes, 14).into_iter().flatten() {
            assert_eq!(v, 100.0);
        }
    }

    #[test]
    fn rsi_all_losses_is_zero() {
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        let series = rsi(&closes, 14);
        assert!(series[13..].iter().all(|v| v.unwrap().abs() < 1e-12));
    }

    #[test]
    fn rsi_flat_market_is_guarded() {
        let closes = vec![100.0; 30];
        let series = rsi(&closes, 14);
        assert!(series[..13].iter().all(Option::is_none));
        assert!(series[13..].iter().all(|v| *v == Some(100.0)));
    }

    #[test]
    fn rsi_simple_mean_known_value() {
        // Alternating +2 / -1 over 14 deltas: 7 gains of 2, 7 losses of 1.
        // avg_gain = 1.0, avg_loss = 0.5, RS = 2, RSI = 66.666...
        let mut closes = vec![100.0];
        for i in 0..14 {
            let last = *closes.last().unwrap();
            closes.push(if i % 2 == 0 { last + 2.0 } else { last - 1.0 });
        }
        let value = rsi(&closes, 14)[14].unwrap();
        assert!((value - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn rsi_range_check() {
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03,
            44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
        ];
        for v in rsi(&closes, 14).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&v), "RSI {v} out of range");
        }
    }

    #[test]
    fn zone_labels() {
        assert_eq!(zone(75.0), "OVERBOUGHT");
        assert_eq!(zone(29.9), "OVERSOLD");
        assert_eq!(zone(30.0), "NEUTRAL");
    }
}
