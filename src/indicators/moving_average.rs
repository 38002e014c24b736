// =============================================================================
// Simple Moving Average & Rolling Standard Deviation
// =============================================================================
//
// Both indicators look at the trailing `window` closes ending at each index
// (inclusive). Positions with fewer than `window` closes available are
// `None`: there are no partial averages.
//
// The standard deviation is the SAMPLE estimator (divisor `window - 1`), so a
// window of 1 never produces a value.
// =============================================================================

/// Trailing simple moving average, one output per input close.
///
/// # Edge cases
/// - `window == 0` => all `None`
/// - index `< window - 1` => `None`
pub fn moving_average(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    trailing(closes, window, |slice| {
        Some(slice.iter().sum::<f64>() / slice.len() as f64)
    })
}

/// Trailing sample standard deviation (ddof = 1), one output per close.
///
/// # Edge cases
/// - `window < 2` => all `None` (sample variance undefined)
/// - index `< window - 1` => `None`
pub fn rolling_std_dev(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    if window < 2 {
        return vec![None; closes.len()];
    }

    trailing(closes, window, |slice| {
        let n = slice.len() as f64;
        let mean = slice.iter().sum::<f64>() / n;
        let variance = slice.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
        Some(variance.sqrt())
    })
}

/// Apply `reduce` to every full trailing window of `closes`.
fn trailing<F>(closes: &[f64], window: usize, reduce: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> Option<f64>,
{
    if window == 0 || closes.len() < window {
        return vec![None; closes.len()];
    }

    let mut out = vec![None; window - 1];
    out.extend(
        closes
            .windows(window)
            .map(|slice| reduce(slice).filter(|v| v.is_finite())),
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_is_none_below_window() {
        let closes: Vec<f64> = (1..=19).map(|x| x as f64).collect();
        let ma = moving_average(&closes, 20);
        assert_eq!(ma.len(), 19);
        assert!(ma.iter().all(Option::is_none));
    }

    #[test]
    fn sma_first_value_at_window_minus_one() {
        let closes: Vec<f64> = (1..=25).map(|x| x as f64).collect();
        let ma = moving_average(&closes, 20);
        assert_eq!(ma.len(), 25);
        assert!(ma[18].is_none());
        // mean(1..=20) = 10.5
        assert!((ma[19].unwrap() - 10.5).abs() < 1e-12);
        // mean(6..=25) = 15.5
        assert!((ma[24].unwrap() - 15.5).abs() < 1e-12);
    }

    #[test]
    fn sma_window_zero_is_all_none() {
        let ma = moving_average(&[1.0, 2.0, 3.0], 0);
        assert_eq!(ma, vec![None, None, None]);
    }

    #[test]
    fn sma_empty_input() {
        assert!(moving_average(&[], 20).is_empty());
    }

    #[test]
    fn std_dev_uses_sample_estimator() {
        // Sample std of [2, 4, 4, 4, 5, 5, 7, 9] is sqrt(32 / 7).
        let closes = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let sd = rolling_std_dev(&closes, 8);
        let expected = (32.0_f64 / 7.0).sqrt();
        assert!((sd[7].unwrap() - expected).abs() < 1e-12);
        assert!(sd[..7].iter().all(Option::is_none));
    }

    #[test]
    fn std_dev_flat_series_is_zero() {
        let closes = vec![100.0; 20];
        let sd = rolling_std_dev(&closes, 20);
        assert_eq!(sd[19], Some(0.0));
    }

    #[test]
    fn std_dev_window_one_is_undefined() {
        let sd = rolling_std_dev(&[1.0, 2.0, 3.0], 1);
        assert!(sd.iter().all(Option::is_none));
    }
}
