// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands wrap the simple moving average in a volatility envelope:
//   upper = MA + k * σ
//   lower = MA - k * σ
//
// The bands are computed element-wise from an already-computed MA series and
// a sample standard deviation series of equal length. Any position where
// either input is missing stays missing.

use crate::types::BollingerPosition;

/// Upper and lower band at a single position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub upper: f64,
    pub lower: f64,
}

/// Combine MA and standard deviation series into bands, element-wise.
///
/// The output has the length of the shorter input (they are normally equal).
pub fn bollinger_bands(ma: &[Option<f64>], std_dev: &[Option<f64>], k: f64) -> Vec<Option<Band>> {
    ma.iter()
        .zip(std_dev)
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => Some(Band {
                upper: m + k * s,
                lower: m - k * s,
            }),
            _ => None,
        })
        .collect()
}

/// Classify `price` against a band, if one is available.
pub fn position(price: f64, band: Option<Band>) -> BollingerPosition {
    match band {
        None => BollingerPosition::InsufficientHistory,
        Some(b) if price < b.lower => BollingerPosition::BelowLowerBand,
        Some(b) if price > b.upper => BollingerPosition::AboveUpperBand,
        Some(_) => BollingerPosition::Inside,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::moving_average::{moving_average, rolling_std_dev};

    #[test]
    fn band_width_is_four_sigma() {
        let closes: Vec<f64> = (0..60)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0)
            .collect();
        let ma = moving_average(&closes, 20);
        let sd = rolling_std_dev(&closes, 20);
        let bands = bollinger_bands(&ma, &sd, 2.0);

        for (band, sd) in bands.iter().zip(&sd) {
            if let (Some(b), Some(s)) = (band, sd) {
                assert!((b.upper - b.lower - 4.0 * s).abs() < 1e-9);
            }
        }
        assert!(bands[19].is_some());
    }

    #[test]
    fn bands_missing_below_window() {
        let closes: Vec<f64> = (1..=19).map(|x| x as f64).collect();
        let ma = moving_average(&closes, 20);
        let sd = rolling_std_dev(&closes, 20);
        let bands = bollinger_bands(&ma, &sd, 2.0);
        assert_eq!(bands.len(), 19);
        assert!(bands.iter().all(Option::is_none));
    }

    #[test]
    fn missing_input_propagates() {
        let bands = bollinger_bands(&[Some(10.0), None], &[None, Some(1.0)], 2.0);
        assert_eq!(bands, vec![None, None]);
    }

    #[test]
    fn position_classification() {
        let band = Some(Band {
            upper: 110.0,
            lower: 90.0,
        });
        assert_eq!(position(85.0, band), BollingerPosition::BelowLowerBand);
        assert_eq!(position(100.0, band), BollingerPosition::Inside);
        assert_eq!(position(110.0, band), BollingerPosition::Inside);
        assert_eq!(position(111.0, band), BollingerPosition::AboveUpperBand);
        assert_eq!(position(100.0, None), BollingerPosition::InsufficientHistory);
    }
}
