//! Backtest runner: wires config, data loading, and the portfolio together.
//!
//! Two entry points:
//! - `run_backtest()`: loads the configured universe from disk, then runs. Used by the CLI.
//! - `run_backtest_from_data()`: takes an already loaded universe. Used by tests.

use thiserror::Error;
use tracing::{info, warn};

use revertlab_core::ParamsError;

use crate::config::{BacktestConfig, ConfigError, RunId};
use crate::data_loader::{load_universe, LoadOptions, LoadReport, LoadedUniverse};
use crate::portfolio::{run_portfolio, PortfolioResult};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("strategy parameters: {0}")]
    Params(#[from] ParamsError),
}

/// Complete result of one configured backtest.
#[derive(Debug, Clone)]
pub struct BacktestOutcome {
    pub run_id: RunId,
    pub config: BacktestConfig,
    pub portfolio: PortfolioResult,
    pub load_reports: Vec<LoadReport>,
    pub has_synthetic: bool,
}

/// Load the configured universe and run it.
pub fn run_backtest(
    config: &BacktestConfig,
    opts: &LoadOptions,
) -> Result<BacktestOutcome, RunError> {
    config.validate()?;
    info!(
        symbols = config.universe.symbols.len(),
        data_dir = %config.universe.data_dir.display(),
        "loading universe"
    );
    let universe = load_universe(
        &config.universe.data_dir,
        &config.universe.symbols,
        opts,
    );
    run_backtest_from_data(config, universe)
}

/// Run an already loaded universe. Load failures carry into the result.
pub fn run_backtest_from_data(
    config: &BacktestConfig,
    universe: LoadedUniverse,
) -> Result<BacktestOutcome, RunError> {
    config.validate()?;
    let has_synthetic = universe.has_synthetic();
    if has_synthetic {
        warn!("results include synthetic data");
    }

    let sizer = config.build_sizer();
    let portfolio = run_portfolio(
        &universe.series,
        &config.to_params(),
        sizer.as_ref(),
        config.backtest.parallel,
    )?
    .with_failures(universe.failures);

    Ok(BacktestOutcome {
        run_id: config.run_id(),
        config: config.clone(),
        portfolio,
        load_reports: universe.reports,
        has_synthetic,
    })
}
