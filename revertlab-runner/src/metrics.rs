//! Per-instrument metrics: pure functions over equity values.

use serde::{Deserialize, Serialize};

use revertlab_core::engine::InstrumentRun;

/// Summary row for one instrument, as written to `instruments.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentMetrics {
    pub symbol: String,
    pub bars: usize,
    pub final_equity: f64,
    pub benchmark_final: f64,
    pub total_return: f64,
    pub benchmark_return: f64,
    pub max_drawdown: f64,
    pub bars_long: usize,
    pub bars_short: usize,
    pub buy_signals: usize,
    pub sell_signals: usize,
}

impl InstrumentMetrics {
    pub fn compute(run: &InstrumentRun) -> Self {
        let equity = run.full_equity_curve().values();

        Self {
            symbol: run.symbol.clone(),
            bars: run.bar_count,
            final_equity: run.final_equity(),
            benchmark_final: run.benchmark_final(),
            total_return: total_return(&equity),
            benchmark_return: total_return(&run.benchmark.values()),
            max_drawdown: max_drawdown(&equity),
            bars_long: run.simulation.bars_long,
            bars_short: run.simulation.bars_short,
            buy_signals: run.buy_signals,
            sell_signals: run.sell_signals,
        }
    }
}

/// Total return as a fraction: (final - initial) / initial.
pub fn total_return(equity: &[f64]) -> f64 {
    match (equity.first(), equity.last()) {
        (Some(&initial), Some(&last)) if equity.len() >= 2 && initial > 0.0 => {
            (last - initial) / initial
        }
        _ => 0.0,
    }
}

/// Largest peak-to-trough decline as a non-positive fraction.
pub fn max_drawdown(equity: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;
    for &value in equity {
        peak = peak.max(value);
        if peak > 0.0 {
            worst = worst.min((value - peak) / peak);
        }
    }
    worst
}
