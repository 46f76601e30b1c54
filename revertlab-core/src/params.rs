//! Strategy parameters consumed by the engine.
//!
//! An explicit immutable value passed into every run. The runner builds it from
//! the TOML config; tests build it directly.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamsError {
    #[error("initial_capital must be positive and finite, got {0}")]
    InvalidCapital(f64),

    #[error("sma_window must be >= 1")]
    InvalidWindow,

    #[error("percentile {name} = {value} is outside [0, 100]")]
    PercentileOutOfRange { name: &'static str, value: f64 },

    #[error("low_percentile ({low}) must be below high_percentile ({high})")]
    InvertedSignalPercentiles { low: f64, high: f64 },

    #[error("sizing_percentiles must be ascending, got {0:?}")]
    UnorderedSizingPercentiles([f64; 4]),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyParams {
    pub initial_capital: f64,
    pub sma_window: usize,
    pub low_percentile: f64,
    pub high_percentile: f64,
    /// Cut points for `SizingBands` (low, mid_low, mid_high, high).
    pub sizing_percentiles: [f64; 4],
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            initial_capital: 10_000.0,
            sma_window: 21,
            low_percentile: 25.0,
            high_percentile: 75.0,
            sizing_percentiles: [15.0, 30.0, 70.0, 85.0],
        }
    }
}

impl StrategyParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if !(self.initial_capital.is_finite() && self.initial_capital > 0.0) {
            return Err(ParamsError::InvalidCapital(self.initial_capital));
        }
        if self.sma_window == 0 {
            return Err(ParamsError::InvalidWindow);
        }
        check_pct("low_percentile", self.low_percentile)?;
        check_pct("high_percentile", self.high_percentile)?;
        if self.low_percentile >= self.high_percentile {
            return Err(ParamsError::InvertedSignalPercentiles {
                low: self.low_percentile,
                high: self.high_percentile,
            });
        }
        for value in self.sizing_percentiles {
            check_pct("sizing_percentiles", value)?;
        }
        if self.sizing_percentiles.windows(2).any(|w| w[0] > w[1]) {
            return Err(ParamsError::UnorderedSizingPercentiles(
                self.sizing_percentiles,
            ));
        }
        Ok(())
    }

    /// Minimum bars for a run: a full window plus one tradeable bar.
    pub fn min_bars(&self) -> usize {
        self.sma_window + 1
    }
}

fn check_pct(name: &'static str, value: f64) -> Result<(), ParamsError> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(ParamsError::PercentileOutOfRange { name, value })
    }
}
