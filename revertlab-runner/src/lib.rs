//! RevertLab Runner: universe loading, portfolio runs, reporting.
//!
//! This crate builds on `revertlab-core` to provide:
//! - TOML configuration with a deterministic run id
//! - CSV loading with coerce-and-drop cleaning and a synthetic fallback
//! - Parallel per-instrument runs and portfolio aggregation
//! - Console summary and on-disk artifacts

pub mod config;
pub mod data_loader;
pub mod export;
pub mod metrics;
pub mod portfolio;
pub mod report;
pub mod runner;

pub use config::{BacktestConfig, ConfigError, RunId, SizerConfig};
pub use data_loader::{load_universe, LoadError, LoadOptions, LoadReport, LoadedUniverse};
pub use export::{load_summary, save_artifacts, SummaryManifest};
pub use metrics::InstrumentMetrics;
pub use portfolio::{
    run_portfolio, AggregateCurves, AggregateError, FailureStage, InstrumentFailure,
    PortfolioResult, PortfolioSummary,
};
pub use report::{print_summary, render_summary};
pub use runner::{run_backtest, run_backtest_from_data, BacktestOutcome, RunError};
