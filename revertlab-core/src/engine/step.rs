//! Single-bar transition of the equity state machine.
//!
//! Every bar the open position is fully liquidated at the new price and a new
//! one is opened from scratch if the signal asks for it:
//!
//! 1. Close: Long adds `shares * (price - ref)` to cash, Short adds `shares * (ref - price)`.
//! 2. Open: size from post-close cash, `cash -= shares * price`.
//! 3. Record equity with the reference price still at the previous close.
//! 4. Move the reference price to this bar's close.
//!
//! Only `cash`, `reference_price` and the current side survive between bars.

use tracing::debug;

use super::state::{PositionSide, PositionState};
use crate::domain::{Signal, SizingBands};
use crate::sizers::{shares_for, Sizer, SizingError};

/// What happened on one bar besides the state change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub equity: f64,
    /// The sizer refused the bar because the bands collapsed.
    pub degenerate_bands: bool,
}

/// Advance the state machine by one bar.
///
/// `ratio` is the bar's close/SMA ratio, `None` inside the warm-up.
pub fn step(
    state: PositionState,
    price: f64,
    signal: Signal,
    ratio: Option<f64>,
    bands: &SizingBands,
    sizer: &dyn Sizer,
) -> (PositionState, StepOutcome) {
    let previous_price = state.reference_price;
    let held = state.shares_held as f64;

    let mut cash = state.cash;
    match state.side {
        PositionSide::Long => cash += held * (price - previous_price),
        PositionSide::Short => cash += held * (previous_price - price),
        PositionSide::Flat => {}
    }

    let mut degenerate_bands = false;
    let mut side = PositionSide::Flat;
    let mut shares_held = 0;

    if let Some(direction) = signal.direction() {
        match sizer.fraction(ratio.unwrap_or(f64::NAN), direction, bands) {
            Ok(fraction) => {
                let shares = shares_for(cash, fraction, price);
                if shares > 0 {
                    cash -= shares as f64 * price;
                    side = direction.into();
                    shares_held = shares;
                }
            }
            Err(SizingError::DegenerateBands) => {
                debug!(?direction, ?ratio, "degenerate sizing bands, no position this bar");
                degenerate_bands = true;
            }
        }
    }

    let marked = PositionState {
        side,
        shares_held,
        cash,
        reference_price: previous_price,
    };
    let equity = marked.mark(price);

    let next = PositionState {
        reference_price: price,
        ..marked
    };
    (
        next,
        StepOutcome {
            equity,
            degenerate_bands,
        },
    )
}
