//! Domain types for RevertLab

pub mod bands;
pub mod bar;
pub mod equity;
pub mod signal;

pub use bands::SizingBands;
pub use bar::{Bar, PriceSeries, SeriesError};
pub use equity::{EquityCurve, EquityPoint};
pub use signal::{Direction, Signal};
