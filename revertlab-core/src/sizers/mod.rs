//! Position Sizers: determine what fraction of cash a new position gets
//!
//! Sizers are signal-agnostic: the simulator decides *whether* to open a
//! position, the sizer only decides *how much*.

pub mod fixed;
pub mod percentile_bands;

pub use fixed::FixedFractionSizer;
pub use percentile_bands::PercentileBandSizer;

use thiserror::Error;

use crate::domain::{Direction, SizingBands};

/// Upper bound on any sizing fraction (200% of available cash).
pub const MAX_FRACTION: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SizingError {
    /// The extreme and inner band coincide, so the distance ratio is undefined.
    #[error("degenerate sizing bands: zero distance between extreme and inner band")]
    DegenerateBands,
}

/// Position sizing logic
///
/// # Responsibilities
/// - Convert ratio + bands → fraction of cash to deploy, in `[0, MAX_FRACTION]`
///
/// # Non-Responsibilities
/// - Sizers do NOT decide entry/exit (that's the signal's job)
/// - Sizers do NOT round to whole shares (see [`shares_for`])
pub trait Sizer: Send + Sync {
    /// Fraction of cash for a new position in `direction`.
    ///
    /// `ratio` is NaN when the bar has no defined ratio.
    fn fraction(
        &self,
        ratio: f64,
        direction: Direction,
        bands: &SizingBands,
    ) -> Result<f64, SizingError>;

    /// Sizer name for artifacts/logging
    fn name(&self) -> &str;
}

/// Whole shares bought with `fraction` of `cash` at `price`.
///
/// Zero for non-positive cash, fraction or price.
pub fn shares_for(cash: f64, fraction: f64, price: f64) -> u64 {
    if !(cash > 0.0 && fraction > 0.0 && price > 0.0) {
        return 0;
    }
    let shares = (cash * fraction / price).floor();
    if shares.is_finite() && shares > 0.0 {
        shares as u64
    } else {
        0
    }
}

/// Clamp into `[0, MAX_FRACTION]`, mapping NaN to zero.
pub(crate) fn clamp_fraction(raw: f64) -> f64 {
    if raw.is_nan() {
        0.0
    } else {
        raw.clamp(0.0, MAX_FRACTION)
    }
}
