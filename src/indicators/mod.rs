// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free batch indicators over an ordered close series. Every
// function returns one `Option<f64>` per input close so results line up with
// the bars they describe; `None` marks insufficient history.

pub mod bollinger;
pub mod moving_average;
pub mod rsi;

pub use bollinger::{bollinger_bands, Band};
pub use moving_average::{moving_average, rolling_std_dev};
pub use rsi::rsi;
