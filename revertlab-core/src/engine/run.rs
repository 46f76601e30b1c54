//! One instrument end to end: signals, bands, simulation, benchmark.

use serde::{Deserialize, Serialize};

use super::benchmark::buy_and_hold;
use super::simulator::{SimulationError, SimulationResult, Simulator};
use crate::domain::{EquityCurve, PriceSeries, Signal, SizingBands};
use crate::params::StrategyParams;
use crate::signals::{SignalGenerator, SignalThresholds};
use crate::sizers::Sizer;

/// Complete result for a single instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentRun {
    pub symbol: String,
    pub bar_count: usize,
    pub thresholds: SignalThresholds,
    pub bands: SizingBands,
    pub buy_signals: usize,
    pub sell_signals: usize,
    pub simulation: SimulationResult,
    /// Buy-and-hold value at every bar, bar 0 included.
    pub benchmark: EquityCurve,
    pub initial_capital: f64,
}

impl InstrumentRun {
    pub fn final_equity(&self) -> f64 {
        self.simulation.final_equity
    }

    pub fn benchmark_final(&self) -> f64 {
        self.benchmark.last_value().unwrap_or(self.initial_capital)
    }

    pub fn equity_curve(&self) -> &EquityCurve {
        &self.simulation.equity_curve
    }

    /// Strategy equity at every bar: `initial_capital` at bar 0, then the
    /// simulated curve. Shares its timestamps with `benchmark`.
    pub fn full_equity_curve(&self) -> EquityCurve {
        let mut curve = EquityCurve::with_capacity(self.equity_curve().len() + 1);
        if let Some(first) = self.benchmark.points().first() {
            curve.push(first.timestamp, self.initial_capital);
        }
        for point in self.equity_curve().points() {
            curve.push(point.timestamp, point.equity);
        }
        curve
    }

    pub fn is_profitable(&self) -> bool {
        self.final_equity() > self.initial_capital
    }

    pub fn outperformed(&self) -> bool {
        self.final_equity() > self.benchmark_final()
    }
}

/// Run the full pipeline for one series.
///
/// Fails with [`SimulationError::InsufficientData`] when the series has fewer
/// than `sma_window + 1` bars. `params` is expected to be validated already.
pub fn run_instrument(
    series: &PriceSeries,
    params: &StrategyParams,
    sizer: &dyn Sizer,
) -> Result<InstrumentRun, SimulationError> {
    let required = params.min_bars();
    if series.len() < required {
        return Err(SimulationError::InsufficientData {
            bars: series.len(),
            required,
        });
    }

    let bars = series.bars();
    let generator = SignalGenerator::new(
        params.sma_window,
        params.low_percentile,
        params.high_percentile,
    );
    let output = generator.generate(bars);
    let bands = SizingBands::from_ratios(&output.ratios, params.sizing_percentiles);

    let simulation = Simulator::new(params.initial_capital, sizer).run(
        bars,
        &output.signals,
        &output.ratios,
        &bands,
    )?;
    let benchmark = buy_and_hold(bars, params.initial_capital);

    Ok(InstrumentRun {
        symbol: series.symbol().to_string(),
        bar_count: series.len(),
        thresholds: output.thresholds,
        bands,
        buy_signals: output.count(Signal::Buy),
        sell_signals: output.count(Signal::Sell),
        simulation,
        benchmark,
        initial_capital: params.initial_capital,
    })
}
