//! Discrete trading signal per bar.

use serde::{Deserialize, Serialize};

/// Buy, Sell or Flat for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Signal {
    Buy,
    Sell,
    #[default]
    Flat,
}

impl Signal {
    /// Direction of the position this signal asks for, if any.
    pub fn direction(self) -> Option<Direction> {
        match self {
            Signal::Buy => Some(Direction::Long),
            Signal::Sell => Some(Direction::Short),
            Signal::Flat => None,
        }
    }
}

/// Side of a new position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}
