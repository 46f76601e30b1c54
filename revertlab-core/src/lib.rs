//! RevertLab Core: price series, ratio signals, percentile sizing, equity simulation.
//!
//! This crate contains the heart of the backtester:
//! - Domain types (bars, series, signals, sizing bands, equity curves)
//! - Indicators (SMA, close/SMA ratio, percentiles)
//! - Signal generation against percentile thresholds
//! - Position sizers behind the `Sizer` trait
//! - The bar-by-bar equity state machine and buy-and-hold benchmark

pub mod domain;
pub mod engine;
pub mod indicators;
pub mod params;
pub mod signals;
pub mod sizers;

pub use params::{ParamsError, StrategyParams};
