//! Percentile-band sizer
//!
//! Scales the allocation by how far the ratio sits from the extreme band,
//! measured in units of the gap between the extreme band and its inner band.

use crate::domain::{Direction, SizingBands};
use crate::sizers::{clamp_fraction, Sizer, SizingError};

/// Base allocation per unit of band distance.
const BASE_FRACTION: f64 = 0.25;

/// - Long:  `0.25 * (low - ratio) / (low - mid_low)`
/// - Short: `0.25 * (ratio - high) / (mid_high - high)`
///
/// Both clamped to `[0, 2.0]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PercentileBandSizer;

impl PercentileBandSizer {
    pub fn new() -> Self {
        Self
    }
}

impl Sizer for PercentileBandSizer {
    fn fraction(
        &self,
        ratio: f64,
        direction: Direction,
        bands: &SizingBands,
    ) -> Result<f64, SizingError> {
        let (numerator, denominator) = match direction {
            Direction::Long => (bands.low - ratio, bands.low - bands.mid_low),
            Direction::Short => (ratio - bands.high, bands.mid_high - bands.high),
        };
        if denominator == 0.0 {
            return Err(SizingError::DegenerateBands);
        }
        Ok(clamp_fraction(BASE_FRACTION * numerator / denominator))
    }

    fn name(&self) -> &str {
        "PercentileBands"
    }
}
