//! Portfolio runs: every instrument through the engine, then aggregated.
//!
//! Instruments are independent, so they fan out over the rayon pool. A failing
//! instrument is logged and recorded as an [`InstrumentFailure`]; it never
//! aborts the batch and never enters an aggregate.

pub mod align;
pub mod summary;

pub use align::{aggregate_curves, common_index, mean_curve, AggregateCurves, AggregateError};
pub use summary::PortfolioSummary;

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use revertlab_core::domain::PriceSeries;
use revertlab_core::engine::{run_instrument, InstrumentRun};
use revertlab_core::sizers::Sizer;
use revertlab_core::{ParamsError, StrategyParams};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    Load,
    Simulation,
}

/// One instrument that produced no result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentFailure {
    pub symbol: String,
    pub stage: FailureStage,
    pub reason: String,
}

/// Everything a portfolio run produces.
#[derive(Debug, Clone)]
pub struct PortfolioResult {
    /// Successful runs, sorted by symbol.
    pub runs: Vec<InstrumentRun>,
    /// Failed instruments, sorted by symbol.
    pub failures: Vec<InstrumentFailure>,
    pub summary: PortfolioSummary,
    /// Mean curves, or why they could not be built. Scalar stats do not depend on it.
    pub aggregate: Result<AggregateCurves, AggregateError>,
    pub initial_capital: f64,
}

impl PortfolioResult {
    /// Fold failures from an earlier stage (typically loading) into the result.
    pub fn with_failures(mut self, failures: Vec<InstrumentFailure>) -> Self {
        self.failures.extend(failures);
        self.failures.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        self.summary.failed = self.failures.len();
        self
    }

    pub fn run(&self, symbol: &str) -> Option<&InstrumentRun> {
        self.runs.iter().find(|r| r.symbol == symbol)
    }
}

/// Run every series and aggregate the results.
///
/// Only fails on invalid `params`; per-instrument errors become failures.
pub fn run_portfolio(
    universe: &BTreeMap<String, PriceSeries>,
    params: &StrategyParams,
    sizer: &dyn Sizer,
    parallel: bool,
) -> Result<PortfolioResult, ParamsError> {
    params.validate()?;
    info!(
        instruments = universe.len(),
        window = params.sma_window,
        sizer = sizer.name(),
        parallel,
        "running portfolio"
    );

    let run_one = |(symbol, series): (&String, &PriceSeries)| {
        (symbol.clone(), run_instrument(series, params, sizer))
    };
    let outcomes: Vec<_> = if parallel {
        universe.par_iter().map(run_one).collect()
    } else {
        universe.iter().map(run_one).collect()
    };

    let mut runs = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();
    for (symbol, outcome) in outcomes {
        match outcome {
            Ok(run) => runs.push(run),
            Err(e) => {
                warn!(%symbol, error = %e, "instrument failed");
                failures.push(InstrumentFailure {
                    symbol,
                    stage: FailureStage::Simulation,
                    reason: e.to_string(),
                });
            }
        }
    }
    runs.sort_by(|a, b| a.symbol.cmp(&b.symbol));
    failures.sort_by(|a, b| a.symbol.cmp(&b.symbol));

    let summary = PortfolioSummary::compute(&runs, failures.len(), params.initial_capital);
    let aggregate = aggregate_curves(&runs);
    if let Err(e) = &aggregate {
        warn!(error = %e, "aggregate curve unavailable");
    }

    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        total_return_pct = summary.total_return_pct,
        "portfolio complete"
    );

    Ok(PortfolioResult {
        runs,
        failures,
        summary,
        aggregate,
        initial_capital: params.initial_capital,
    })
}
