//! Indicators consumed by the signal generator and sizer.
//!
//! All indicators are precomputed once over the full bar slice. Values before
//! the lookback is satisfied are NaN in the raw `Vec<f64>` form.

pub mod percentile;
pub mod ratio;
pub mod sma;

pub use percentile::{defined_values, percentile_sorted};
pub use ratio::PriceRatio;
pub use sma::Sma;

use crate::domain::Bar;

/// A series computed from bars, aligned one value per bar.
pub trait Indicator: Send + Sync {
    /// Name used in logs and artifacts, e.g. `sma_21`.
    fn name(&self) -> &str;

    /// Number of leading bars whose value is undefined (NaN).
    fn lookback(&self) -> usize;

    /// Compute the full series. Output length equals `bars.len()`.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;
}

/// Create synthetic bars from close prices for testing.
///
/// One bar per day starting 2024-01-02; open = previous close,
/// high/low bracket open and close by 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                timestamp: base + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: (open.min(close) - 1.0).max(0.01),
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
