//! Price-to-SMA ratio: the mean-reversion signal variable.
//!
//! `ratio[i] = close[i] / sma[i]`, defined only once `window` full bars
//! precede `i` (index >= window). Earlier bars are not yet tradeable.

use super::{Indicator, Sma};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct PriceRatio {
    sma: Sma,
    name: String,
}

impl PriceRatio {
    pub fn new(window: usize) -> Self {
        Self {
            sma: Sma::new(window),
            name: format!("close_over_sma_{window}"),
        }
    }

    pub fn window(&self) -> usize {
        self.sma.period()
    }

    /// Ratio series with `None` for the warm-up bars.
    pub fn series(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        self.compute(bars)
            .into_iter()
            .map(|v| if v.is_finite() { Some(v) } else { None })
            .collect()
    }
}

impl Indicator for PriceRatio {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window()
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let sma = self.sma.compute(bars);
        bars.iter()
            .zip(sma)
            .enumerate()
            .map(|(i, (bar, mean))| {
                if i < self.window() || !(mean > 0.0) {
                    f64::NAN
                } else {
                    bar.close / mean
                }
            })
            .collect()
    }
}
