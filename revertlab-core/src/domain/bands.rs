//! Sizing bands: four ratio thresholds taken from the ratio distribution.

use serde::{Deserialize, Serialize};

use crate::indicators::percentile::{defined_values, percentile_sorted};

/// Ratio thresholds used by the position sizer.
///
/// `low` / `high` are the outer extremes, `mid_low` / `mid_high` the inner
/// bands the sizer measures distance against. For any non-empty ratio set
/// `low <= mid_low <= mid_high <= high`.
///
/// Bands are computed from the whole series, so they look ahead. That is a
/// backtest-only simplification; an online variant would need expanding
/// windows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizingBands {
    pub low: f64,
    pub mid_low: f64,
    pub mid_high: f64,
    pub high: f64,
}

impl SizingBands {
    pub fn new(low: f64, mid_low: f64, mid_high: f64, high: f64) -> Self {
        Self {
            low,
            mid_low,
            mid_high,
            high,
        }
    }

    /// All bands zero. Every sizing request against these fails as degenerate.
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Compute the bands at four ascending percentile cut points over the
    /// defined ratios. An empty ratio set yields [`SizingBands::zero`].
    pub fn from_ratios(ratios: &[Option<f64>], cut_points: [f64; 4]) -> Self {
        let sorted = defined_values(ratios);
        if sorted.is_empty() {
            return Self::zero();
        }
        Self::new(
            percentile_sorted(&sorted, cut_points[0]),
            percentile_sorted(&sorted, cut_points[1]),
            percentile_sorted(&sorted, cut_points[2]),
            percentile_sorted(&sorted, cut_points[3]),
        )
    }

    pub fn is_monotonic(&self) -> bool {
        self.low <= self.mid_low && self.mid_low <= self.mid_high && self.mid_high <= self.high
    }
}
