//! Equity simulator: folds [`step`] over a bar series.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::state::{PositionSide, PositionState};
use super::step::step;
use crate::domain::{Bar, EquityCurve, Signal, SizingBands};
use crate::sizers::Sizer;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error("insufficient data: {bars} bars, need at least {required}")]
    InsufficientData { bars: usize, required: usize },

    #[error("length mismatch: {bars} bars, {signals} signals, {ratios} ratios")]
    LengthMismatch {
        bars: usize,
        signals: usize,
        ratios: usize,
    },
}

/// Output of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// One point per bar, bar 0 excluded.
    pub equity_curve: EquityCurve,
    pub final_equity: f64,
    pub final_state: PositionState,
    pub bars_long: usize,
    pub bars_short: usize,
    /// Bars where a signal was dropped because the sizing bands collapsed.
    pub degenerate_bars: usize,
}

pub struct Simulator<'a> {
    initial_capital: f64,
    sizer: &'a dyn Sizer,
}

impl<'a> Simulator<'a> {
    pub fn new(initial_capital: f64, sizer: &'a dyn Sizer) -> Self {
        Self {
            initial_capital,
            sizer,
        }
    }

    /// Walk the series bar by bar. `signals` and `ratios` must align with `bars`.
    ///
    /// Bar 0 only seeds the reference price. A series with fewer than two
    /// bars yields an empty curve and `final_equity == initial_capital`.
    pub fn run(
        &self,
        bars: &[Bar],
        signals: &[Signal],
        ratios: &[Option<f64>],
        bands: &SizingBands,
    ) -> Result<SimulationResult, SimulationError> {
        if signals.len() != bars.len() || ratios.len() != bars.len() {
            return Err(SimulationError::LengthMismatch {
                bars: bars.len(),
                signals: signals.len(),
                ratios: ratios.len(),
            });
        }

        let Some(first) = bars.first() else {
            let state = PositionState::initial(self.initial_capital, 0.0);
            return Ok(self.empty_result(state));
        };

        let mut state = PositionState::initial(self.initial_capital, first.close);
        let mut equity_curve = EquityCurve::with_capacity(bars.len().saturating_sub(1));
        let mut bars_long = 0;
        let mut bars_short = 0;
        let mut degenerate_bars = 0;

        for i in 1..bars.len() {
            let (next, outcome) = step(
                state,
                bars[i].close,
                signals[i],
                ratios[i],
                bands,
                self.sizer,
            );
            state = next;
            match state.side {
                PositionSide::Long => bars_long += 1,
                PositionSide::Short => bars_short += 1,
                PositionSide::Flat => {}
            }
            if outcome.degenerate_bands {
                degenerate_bars += 1;
            }
            equity_curve.push(bars[i].timestamp, outcome.equity);
        }

        let final_equity = equity_curve.last_value().unwrap_or(self.initial_capital);
        Ok(SimulationResult {
            equity_curve,
            final_equity,
            final_state: state,
            bars_long,
            bars_short,
            degenerate_bars,
        })
    }

    fn empty_result(&self, state: PositionState) -> SimulationResult {
        SimulationResult {
            equity_curve: EquityCurve::new(),
            final_equity: self.initial_capital,
            final_state: state,
            bars_long: 0,
            bars_short: 0,
            degenerate_bars: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;
    use crate::sizers::FixedFractionSizer;

    #[test]
    fn length_mismatch_is_rejected() {
        let bars = make_bars(&[100.0, 101.0]);
        let sizer = FixedFractionSizer::new(0.5);
        let err = Simulator::new(1_000.0, &sizer)
            .run(&bars, &[Signal::Flat], &[None, None], &SizingBands::zero())
            .unwrap_err();
        assert_eq!(
            err,
            SimulationError::LengthMismatch {
                bars: 2,
                signals: 1,
                ratios: 2
            }
        );
    }

    #[test]
    fn single_bar_has_empty_curve() {
        let bars = make_bars(&[100.0]);
        let sizer = FixedFractionSizer::new(0.5);
        let result = Simulator::new(1_000.0, &sizer)
            .run(&bars, &[Signal::Buy], &[None], &SizingBands::zero())
            .unwrap();
        assert!(result.equity_curve.is_empty());
        assert_eq!(result.final_equity, 1_000.0);
    }

    #[test]
    fn counts_bars_in_position() {
        let bars = make_bars(&[100.0, 99.0, 98.0, 101.0, 100.0]);
        let signals = [Signal::Flat, Signal::Buy, Signal::Buy, Signal::Sell, Signal::Flat];
        let sizer = FixedFractionSizer::new(0.5);
        let result = Simulator::new(10_000.0, &sizer)
            .run(&bars, &signals, &[None; 5], &SizingBands::zero())
            .unwrap();
        assert_eq!(result.equity_curve.len(), 4);
        assert_eq!(result.bars_long, 2);
        assert_eq!(result.bars_short, 1);
        assert!(result.final_state.is_flat());
    }
}
