//! Price loading and cleaning for the runner.
//!
//! Each symbol lives in `<data_dir>/<SYMBOL>.csv`. Loading follows a
//! coerce-and-drop policy:
//! 1. Find the timestamp column (`Datetime`, `timestamp`, `Date`, else the first)
//! 2. Parse OHLCV; any row with a missing or unparsable value is dropped
//! 3. Drop rows with non-positive prices
//! 4. Sort by timestamp, keep the first of any duplicate timestamps
//!
//! With `synthetic` enabled, a missing file is replaced by a deterministic
//! random walk. Synthetic series are tagged in the [`LoadReport`].

use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use revertlab_core::domain::{Bar, PriceSeries, SeriesError};

use crate::portfolio::{FailureStage, InstrumentFailure};

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read CSV {source_name}: {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    #[error("{source_name}: missing column '{column}'")]
    MissingColumn {
        source_name: String,
        column: &'static str,
    },

    #[error("{source_name}: no usable rows ({dropped} dropped)")]
    NoUsableRows { source_name: String, dropped: usize },

    #[error("invalid series: {0}")]
    Series(#[from] SeriesError),
}

/// Where a series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Csv,
    Synthetic,
}

/// Cleaning statistics for one loaded symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadReport {
    pub symbol: String,
    pub source: DataSource,
    /// Data rows seen, header excluded.
    pub rows_read: usize,
    /// Rows discarded for unparsable or non-positive values.
    pub dropped_rows: usize,
    /// Rows discarded because an earlier row had the same timestamp.
    pub duplicate_rows: usize,
    pub bars: usize,
}

#[derive(Debug, Clone)]
pub struct LoadedSeries {
    pub series: PriceSeries,
    pub report: LoadReport,
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Generate a random walk for symbols without a CSV file.
    pub synthetic: bool,
    /// Length of each generated series.
    pub synthetic_bars: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            synthetic: false,
            synthetic_bars: 504,
        }
    }
}

/// Every symbol of a universe, loaded or accounted for.
#[derive(Debug, Clone, Default)]
pub struct LoadedUniverse {
    pub series: BTreeMap<String, PriceSeries>,
    pub reports: Vec<LoadReport>,
    pub failures: Vec<InstrumentFailure>,
}

impl LoadedUniverse {
    pub fn has_synthetic(&self) -> bool {
        self.reports
            .iter()
            .any(|r| r.source == DataSource::Synthetic)
    }
}

pub fn csv_path(data_dir: &Path, symbol: &str) -> PathBuf {
    data_dir.join(format!("{symbol}.csv"))
}

/// Load every symbol. Failures are recorded, never fatal.
pub fn load_universe(data_dir: &Path, symbols: &[String], opts: &LoadOptions) -> LoadedUniverse {
    let mut universe = LoadedUniverse::default();

    for symbol in symbols {
        let path = csv_path(data_dir, symbol);
        let loaded = if opts.synthetic && !path.exists() {
            warn!(%symbol, "no CSV found, generating synthetic data");
            generate_synthetic_series(symbol, opts.synthetic_bars)
        } else {
            load_csv(&path, symbol)
        };

        match loaded {
            Ok(LoadedSeries { series, report }) => {
                debug!(
                    %symbol,
                    bars = report.bars,
                    dropped = report.dropped_rows,
                    duplicates = report.duplicate_rows,
                    "loaded series"
                );
                universe.series.insert(symbol.clone(), series);
                universe.reports.push(report);
            }
            Err(e) => {
                warn!(%symbol, error = %e, "failed to load series");
                universe.failures.push(InstrumentFailure {
                    symbol: symbol.clone(),
                    stage: FailureStage::Load,
                    reason: e.to_string(),
                });
            }
        }
    }

    universe
}

/// Load and clean one CSV file.
pub fn load_csv(path: &Path, symbol: &str) -> Result<LoadedSeries, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_series(file, symbol, &path.display().to_string())
}

/// Clean CSV content from any reader. `source_name` only labels errors.
pub fn read_series<R: Read>(
    reader: R,
    symbol: &str,
    source_name: &str,
) -> Result<LoadedSeries, LoadError> {
    let csv_err = |source: csv::Error| LoadError::Csv {
        source_name: source_name.to_string(),
        source,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers().map_err(csv_err)?.clone();
    let columns = Columns::locate(&headers, source_name)?;

    let mut rows: Vec<Bar> = Vec::new();
    let mut rows_read = 0;
    let mut dropped_rows = 0;

    for record in rdr.records() {
        rows_read += 1;
        let record = match record {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(csv_err(e)),
            Err(_) => {
                dropped_rows += 1;
                continue;
            }
        };
        match columns.parse(&record) {
            Some(bar) if bar.is_sane() => rows.push(bar),
            _ => dropped_rows += 1,
        }
    }

    // Stable sort keeps file order among equal timestamps, so dedup keeps the first.
    rows.sort_by_key(|bar| bar.timestamp);
    let before = rows.len();
    rows.dedup_by_key(|bar| bar.timestamp);
    let duplicate_rows = before - rows.len();

    if rows.is_empty() {
        return Err(LoadError::NoUsableRows {
            source_name: source_name.to_string(),
            dropped: dropped_rows,
        });
    }

    let report = LoadReport {
        symbol: symbol.to_string(),
        source: DataSource::Csv,
        rows_read,
        dropped_rows,
        duplicate_rows,
        bars: rows.len(),
    };
    let series = PriceSeries::new(symbol, rows)?;
    Ok(LoadedSeries { series, report })
}

/// Column positions resolved from the header row.
struct Columns {
    timestamp: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: usize,
}

impl Columns {
    fn locate(headers: &csv::StringRecord, source_name: &str) -> Result<Self, LoadError> {
        let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
        let require = |column: &'static str| {
            find(column).ok_or_else(|| LoadError::MissingColumn {
                source_name: source_name.to_string(),
                column,
            })
        };

        let timestamp = find("Datetime")
            .or_else(|| find("timestamp"))
            .or_else(|| find("Date"))
            .unwrap_or(0);

        Ok(Self {
            timestamp,
            open: require("Open")?,
            high: require("High")?,
            low: require("Low")?,
            close: require("Close")?,
            volume: require("Volume")?,
        })
    }

    fn parse(&self, record: &csv::StringRecord) -> Option<Bar> {
        let number = |idx: usize| record.get(idx)?.parse::<f64>().ok();
        Some(Bar {
            timestamp: parse_timestamp(record.get(self.timestamp)?)?,
            open: number(self.open)?,
            high: number(self.high)?,
            low: number(self.low)?,
            close: number(self.close)?,
            volume: number(self.volume)?,
        })
    }
}

/// Parse a timestamp cell, normalizing any UTC offset away.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Deterministic daily random walk from 100.0, weekdays only.
///
/// Every symbol shares the same calendar starting 2020-01-02, so synthetic
/// universes always have a common index.
pub fn generate_synthetic_series(symbol: &str, bars: usize) -> Result<LoadedSeries, LoadError> {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut out = Vec::with_capacity(bars);
    let mut price = 100.0_f64;
    let mut day = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap_or_default();

    while out.len() < bars {
        let weekday = day.weekday();
        if weekday != chrono::Weekday::Sat && weekday != chrono::Weekday::Sun {
            let daily_return: f64 = rng.gen_range(-0.03..0.03);
            let open = price;
            let close = price * (1.0 + daily_return);
            out.push(Bar {
                timestamp: day.and_hms_opt(0, 0, 0).unwrap_or_default(),
                open,
                high: open.max(close) * (1.0 + rng.gen_range(0.0..0.01)),
                low: open.min(close) * (1.0 - rng.gen_range(0.0..0.01)),
                close,
                volume: rng.gen_range(500_000.0..5_000_000.0),
            });
            price = close;
        }
        day += chrono::Duration::days(1);
    }

    let report = LoadReport {
        symbol: symbol.to_string(),
        source: DataSource::Synthetic,
        rows_read: out.len(),
        dropped_rows: 0,
        duplicate_rows: 0,
        bars: out.len(),
    };
    let series = PriceSeries::new(symbol, out)?;
    Ok(LoadedSeries { series, report })
}
