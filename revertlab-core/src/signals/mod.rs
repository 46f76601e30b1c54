//! Signal generation: price series to Buy/Sell/Flat per bar.
//!
//! Signals depend on market data only. They never see cash or positions.

pub mod generator;
pub mod thresholds;

pub use generator::{SignalGenerator, SignalOutput};
pub use thresholds::SignalThresholds;
