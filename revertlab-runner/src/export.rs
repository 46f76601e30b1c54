//! Artifact export: JSON summary and CSV curves.
//!
//! Layout under `<output_dir>/<run_id>/`:
//! - `summary.json`: config, portfolio summary, failures, load reports
//! - `instruments.csv`: one metrics row per successful instrument
//! - `equity/<SYMBOL>.csv`: strategy and buy-and-hold equity per bar
//! - `aggregate_equity.csv`: mean curves, when a common index exists
//!
//! Re-running the same config overwrites the same directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use revertlab_core::domain::EquityCurve;
use revertlab_core::engine::InstrumentRun;

use crate::config::{BacktestConfig, RunId};
use crate::data_loader::LoadReport;
use crate::metrics::InstrumentMetrics;
use crate::portfolio::{AggregateCurves, InstrumentFailure, PortfolioSummary};
use crate::runner::BacktestOutcome;

/// Current schema version for `summary.json`.
pub const SCHEMA_VERSION: u32 = 1;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Contents of `summary.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryManifest {
    pub schema_version: u32,
    pub run_id: RunId,
    pub config: BacktestConfig,
    pub summary: PortfolioSummary,
    pub failures: Vec<InstrumentFailure>,
    pub load_reports: Vec<LoadReport>,
    pub has_synthetic: bool,
    /// Why the aggregate curve is missing, if it is.
    pub aggregate_error: Option<String>,
}

impl SummaryManifest {
    pub fn from_outcome(outcome: &BacktestOutcome) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            run_id: outcome.run_id.clone(),
            config: outcome.config.clone(),
            summary: outcome.portfolio.summary.clone(),
            failures: outcome.portfolio.failures.clone(),
            load_reports: outcome.load_reports.clone(),
            has_synthetic: outcome.has_synthetic,
            aggregate_error: outcome
                .portfolio
                .aggregate
                .as_ref()
                .err()
                .map(|e| e.to_string()),
        }
    }
}

// ─── CSV export ─────────────────────────────────────────────────────

/// One metrics row per instrument.
pub fn export_instruments_csv(runs: &[InstrumentRun]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for run in runs {
        wtr.serialize(InstrumentMetrics::compute(run))?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Strategy equity beside buy-and-hold for the same bars (bar 0 excluded).
pub fn export_instrument_equity_csv(run: &InstrumentRun) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["timestamp", "equity", "benchmark"])?;
    // The benchmark carries bar 0, the strategy curve starts at bar 1.
    for (point, bench) in run
        .equity_curve()
        .points()
        .iter()
        .zip(run.benchmark.points().iter().skip(1))
    {
        wtr.write_record([
            &point.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            &format!("{:.4}", point.equity),
            &format!("{:.4}", bench.equity),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

pub fn export_aggregate_csv(aggregate: &AggregateCurves) -> Result<String> {
    export_curve_pair(&aggregate.strategy, &aggregate.benchmark)
}

fn export_curve_pair(strategy: &EquityCurve, benchmark: &EquityCurve) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["timestamp", "equity", "benchmark"])?;
    for (point, bench) in strategy.points().iter().zip(benchmark.points()) {
        wtr.write_record([
            &point.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            &format!("{:.4}", point.equity),
            &format!("{:.4}", bench.equity),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Write the full artifact set. Returns the run directory.
pub fn save_artifacts(outcome: &BacktestOutcome, output_dir: &Path) -> Result<PathBuf> {
    let run_dir = output_dir.join(&outcome.run_id);
    let equity_dir = run_dir.join("equity");
    std::fs::create_dir_all(&equity_dir)
        .with_context(|| format!("failed to create artifact dir: {}", equity_dir.display()))?;

    let manifest = SummaryManifest::from_outcome(outcome);
    let json =
        serde_json::to_string_pretty(&manifest).context("failed to serialize summary to JSON")?;
    write_file(&run_dir.join("summary.json"), &json)?;

    let runs = &outcome.portfolio.runs;
    write_file(
        &run_dir.join("instruments.csv"),
        &export_instruments_csv(runs)?,
    )?;
    for run in runs {
        let path = equity_dir.join(format!("{}.csv", run.symbol));
        write_file(&path, &export_instrument_equity_csv(run)?)?;
    }

    if let Ok(aggregate) = &outcome.portfolio.aggregate {
        write_file(
            &run_dir.join("aggregate_equity.csv"),
            &export_aggregate_csv(aggregate)?,
        )?;
    }

    info!(dir = %run_dir.display(), instruments = runs.len(), "artifacts saved");
    Ok(run_dir)
}

/// Read back a `summary.json`, rejecting newer schema versions.
pub fn load_summary(run_dir: &Path) -> Result<SummaryManifest> {
    let path = run_dir.join("summary.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let manifest: SummaryManifest =
        serde_json::from_str(&json).context("failed to deserialize summary.json")?;
    anyhow::ensure!(
        manifest.schema_version <= SCHEMA_VERSION,
        "unsupported schema version {} (max supported: {})",
        manifest.schema_version,
        SCHEMA_VERSION
    );
    Ok(manifest)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}
