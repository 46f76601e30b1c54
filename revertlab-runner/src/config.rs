//! Serializable backtest configuration.
//!
//! One TOML file describes a complete run: capital, strategy parameters, the
//! sizer, and the universe. Every field has a default, so a partial file (or
//! no file at all) is valid.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use revertlab_core::sizers::{FixedFractionSizer, PercentileBandSizer, Sizer, MAX_FRACTION};
use revertlab_core::StrategyParams;

/// Content-addressable identifier for a run configuration.
pub type RunId = String;

/// The 50 large-cap tickers used when no universe is configured.
pub const DEFAULT_SYMBOLS: [&str; 50] = [
    "AAPL", "MSFT", "GOOGL", "AMZN", "META", "TSLA", "NVDA", "JPM", "V", "JNJ", "WMT", "PG", "DIS",
    "MA", "HD", "BAC", "PYPL", "INTC", "CMCSA", "ADBE", "NFLX", "XOM", "CSCO", "KO", "T", "CRM",
    "PFE", "MRK", "CVX", "ABBV", "NKE", "MCD", "ABT", "ORCL", "PEP", "COST", "TXN", "LLY", "QCOM",
    "UNH", "BMY", "MDT", "NEE", "LOW", "SBUX", "ACN", "IBM", "UPS", "RTX", "CAT",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Complete configuration for one portfolio backtest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    pub backtest: BacktestSection,
    pub strategy: StrategySection,
    pub universe: UniverseSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestSection {
    pub initial_capital: f64,
    /// Run instruments on the rayon pool. `false` runs them one by one.
    pub parallel: bool,
}

impl Default for BacktestSection {
    fn default() -> Self {
        Self {
            initial_capital: 10_000.0,
            parallel: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategySection {
    pub sma_window: usize,
    pub low_percentile: f64,
    pub high_percentile: f64,
    pub sizing_percentiles: [f64; 4],
    pub sizer: SizerConfig,
}

impl Default for StrategySection {
    fn default() -> Self {
        let params = StrategyParams::default();
        Self {
            sma_window: params.sma_window,
            low_percentile: params.low_percentile,
            high_percentile: params.high_percentile,
            sizing_percentiles: params.sizing_percentiles,
            sizer: SizerConfig::default(),
        }
    }
}

/// Position sizer selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SizerConfig {
    /// Size by distance past the inner percentile band.
    #[default]
    PercentileBands,

    /// Same fraction of cash for every new position.
    FixedFraction { fraction: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniverseSection {
    /// Directory holding one `<SYMBOL>.csv` per instrument.
    pub data_dir: PathBuf,
    pub symbols: Vec<String>,
}

impl Default for UniverseSection {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl UniverseSection {
    /// Trim and upper-case every symbol, dropping blanks and later duplicates.
    ///
    /// Symbols name `<SYMBOL>.csv` files, so `aapl` and ` AAPL` are the same
    /// instrument.
    pub fn normalize_symbols(&mut self) {
        let mut seen = BTreeSet::new();
        let mut out = Vec::with_capacity(self.symbols.len());
        for raw in &self.symbols {
            let symbol = raw.trim().to_uppercase();
            if symbol.is_empty() {
                continue;
            }
            if seen.insert(symbol.clone()) {
                out.push(symbol);
            } else {
                warn!(symbol = %symbol, "duplicate symbol ignored");
            }
        }
        self.symbols = out;
    }
}

impl BacktestConfig {
    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse, normalize symbols and validate a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.universe.normalize_symbols();
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every constraint the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.to_params()
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if let SizerConfig::FixedFraction { fraction } = self.strategy.sizer {
            if !fraction.is_finite() || !(0.0..=MAX_FRACTION).contains(&fraction) {
                return Err(ConfigError::Invalid(format!(
                    "fixed sizer fraction must be in [0, {MAX_FRACTION}], got {fraction}"
                )));
            }
        }

        if self.universe.symbols.is_empty() {
            return Err(ConfigError::Invalid(
                "universe.symbols must not be empty".into(),
            ));
        }
        if let Some(blank) = self.universe.symbols.iter().find(|s| s.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "universe.symbols contains a blank entry: {blank:?}"
            )));
        }
        let mut seen = BTreeSet::new();
        for symbol in &self.universe.symbols {
            if !seen.insert(symbol.trim().to_uppercase()) {
                return Err(ConfigError::Invalid(format!(
                    "universe.symbols lists {symbol:?} more than once"
                )));
            }
        }
        Ok(())
    }

    /// Strategy parameters handed to the engine.
    pub fn to_params(&self) -> StrategyParams {
        StrategyParams {
            initial_capital: self.backtest.initial_capital,
            sma_window: self.strategy.sma_window,
            low_percentile: self.strategy.low_percentile,
            high_percentile: self.strategy.high_percentile,
            sizing_percentiles: self.strategy.sizing_percentiles,
        }
    }

    pub fn build_sizer(&self) -> Box<dyn Sizer> {
        match self.strategy.sizer {
            SizerConfig::PercentileBands => Box::new(PercentileBandSizer::new()),
            SizerConfig::FixedFraction { fraction } => Box::new(FixedFractionSizer::new(fraction)),
        }
    }

    /// Deterministic BLAKE3 fingerprint of the configuration.
    ///
    /// Two identical configs share a run id, so re-running overwrites the
    /// same artifact directory.
    pub fn run_id(&self) -> RunId {
        // Plain data with string keys; JSON serialization cannot fail here.
        let json = serde_json::to_vec(self).unwrap_or_default();
        let hash = blake3::hash(&json);
        hash.to_hex()[..16].to_string()
    }
}
