//! Fixed Fraction Sizer
//!
//! Simplest sizer: always deploy the same fraction of cash, ignoring the ratio.

use crate::domain::{Direction, SizingBands};
use crate::sizers::{clamp_fraction, Sizer, SizingError};

#[derive(Debug, Clone, Copy)]
pub struct FixedFractionSizer {
    fraction: f64,
}

impl FixedFractionSizer {
    /// The fraction is clamped to `[0, 2.0]` like any other sizer output.
    pub fn new(fraction: f64) -> Self {
        assert!(fraction.is_finite(), "fraction must be finite");
        Self {
            fraction: clamp_fraction(fraction),
        }
    }

    pub fn fraction_value(&self) -> f64 {
        self.fraction
    }
}

impl Sizer for FixedFractionSizer {
    fn fraction(
        &self,
        _ratio: f64,
        _direction: Direction,
        _bands: &SizingBands,
    ) -> Result<f64, SizingError> {
        Ok(self.fraction)
    }

    fn name(&self) -> &str {
        "FixedFraction"
    }
}
