//! Low/high ratio thresholds for signal generation.

use serde::{Deserialize, Serialize};

use crate::domain::Signal;
use crate::indicators::{defined_values, percentile_sorted};

/// Ratio cutoffs below which we buy and above which we sell.
///
/// A degenerate distribution (no defined ratios, or every ratio identical)
/// collapses to `low = high = 0` and classifies every bar as Flat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalThresholds {
    pub low: f64,
    pub high: f64,
    pub degenerate: bool,
}

impl SignalThresholds {
    pub fn degenerate() -> Self {
        Self {
            low: 0.0,
            high: 0.0,
            degenerate: true,
        }
    }

    pub fn from_ratios(ratios: &[Option<f64>], low_pct: f64, high_pct: f64) -> Self {
        let sorted = defined_values(ratios);
        match (sorted.first(), sorted.last()) {
            (Some(min), Some(max)) if min < max => Self {
                low: percentile_sorted(&sorted, low_pct),
                high: percentile_sorted(&sorted, high_pct),
                degenerate: false,
            },
            _ => Self::degenerate(),
        }
    }

    /// Classify one bar. Undefined ratios are always Flat.
    pub fn classify(&self, ratio: Option<f64>) -> Signal {
        if self.degenerate {
            return Signal::Flat;
        }
        match ratio {
            Some(r) if r < self.low => Signal::Buy,
            Some(r) if r > self.high => Signal::Sell,
            _ => Signal::Flat,
        }
    }
}
