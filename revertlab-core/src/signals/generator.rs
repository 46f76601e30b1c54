//! Mean-reversion signal generator.
//!
//! Buy when close/SMA sits below the `low_pct` percentile of its own history,
//! sell when it sits above `high_pct`. The percentiles are taken over the whole
//! series, which is look-ahead: fine for a backtest, not for live use.

use serde::{Deserialize, Serialize};

use super::SignalThresholds;
use crate::domain::{Bar, Signal};
use crate::indicators::{Indicator, PriceRatio};

/// Everything the generator derived from one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalOutput {
    pub ratios: Vec<Option<f64>>,
    pub thresholds: SignalThresholds,
    pub signals: Vec<Signal>,
}

impl SignalOutput {
    pub fn count(&self, signal: Signal) -> usize {
        self.signals.iter().filter(|s| **s == signal).count()
    }
}

#[derive(Debug, Clone)]
pub struct SignalGenerator {
    ratio: PriceRatio,
    low_pct: f64,
    high_pct: f64,
}

impl SignalGenerator {
    pub fn new(window: usize, low_pct: f64, high_pct: f64) -> Self {
        Self {
            ratio: PriceRatio::new(window),
            low_pct,
            high_pct,
        }
    }

    pub fn window(&self) -> usize {
        self.ratio.window()
    }

    /// Bars that are always Flat because the ratio is not yet defined.
    pub fn warmup_bars(&self) -> usize {
        self.ratio.lookback()
    }

    pub fn name(&self) -> String {
        format!(
            "{}_p{}_p{}",
            self.ratio.name(),
            self.low_pct,
            self.high_pct
        )
    }

    /// Generate one signal per bar. Series no longer than the window come
    /// back all-Flat rather than failing.
    pub fn generate(&self, bars: &[Bar]) -> SignalOutput {
        let ratios = self.ratio.series(bars);
        let thresholds = SignalThresholds::from_ratios(&ratios, self.low_pct, self.high_pct);
        let signals = ratios.iter().map(|r| thresholds.classify(*r)).collect();
        SignalOutput {
            ratios,
            thresholds,
            signals,
        }
    }
}
