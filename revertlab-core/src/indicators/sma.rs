//! Simple Moving Average (SMA).
//!
//! Trailing mean of close prices over a lookback window.
//! Lookback: period - 1 (first valid value at index period-1).

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        if n < self.period {
            return result;
        }

        // Each window is summed from scratch rather than rolled, so two
        // identical windows always produce bit-identical means.
        let divisor = self.period as f64;
        for (i, slot) in result.iter_mut().enumerate().skip(self.period - 1) {
            let sum: f64 = bars[(i + 1 - self.period)..=i]
                .iter()
                .map(|b| b.close)
                .sum();
            *slot = sum / divisor;
        }

        result
    }
}
