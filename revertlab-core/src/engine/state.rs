//! Position state carried from one bar to the next.

use serde::{Deserialize, Serialize};

use crate::domain::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PositionSide {
    #[default]
    Flat,
    Long,
    Short,
}

impl From<Direction> for PositionSide {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Long => PositionSide::Long,
            Direction::Short => PositionSide::Short,
        }
    }
}

/// Everything the simulator remembers between bars.
///
/// Owned by exactly one run; nothing here is shared across instruments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionState {
    pub side: PositionSide,
    pub shares_held: u64,
    pub cash: f64,
    /// Price the open position was last marked at (the previous bar's close).
    pub reference_price: f64,
}

impl PositionState {
    /// Flat with all capital in cash, marked at the first bar's close.
    pub fn initial(initial_capital: f64, first_price: f64) -> Self {
        Self {
            side: PositionSide::Flat,
            shares_held: 0,
            cash: initial_capital,
            reference_price: first_price,
        }
    }

    pub fn is_flat(&self) -> bool {
        self.side == PositionSide::Flat
    }

    /// Equity at `price`. Short P&L is expressed as an equivalent long mark
    /// around the reference price.
    pub fn mark(&self, price: f64) -> f64 {
        let shares = self.shares_held as f64;
        match self.side {
            PositionSide::Flat => self.cash,
            PositionSide::Long => self.cash + shares * price,
            PositionSide::Short => self.cash + shares * (2.0 * self.reference_price - price),
        }
    }
}
