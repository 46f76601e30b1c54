//! Equity curve: ordered (timestamp, value) points.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp: NaiveDateTime,
    pub equity: f64,
}

/// Portfolio value per bar. Presentation layers consume this as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquityCurve {
    points: Vec<EquityPoint>,
}

impl EquityCurve {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, timestamp: NaiveDateTime, equity: f64) {
        self.points.push(EquityPoint { timestamp, equity });
    }

    pub fn points(&self) -> &[EquityPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.equity).collect()
    }

    pub fn timestamps(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
        self.points.iter().map(|p| p.timestamp)
    }

    pub fn first_value(&self) -> Option<f64> {
        self.points.first().map(|p| p.equity)
    }

    pub fn last_value(&self) -> Option<f64> {
        self.points.last().map(|p| p.equity)
    }

    /// Keep only the points whose timestamp is in `index`, preserving order.
    pub fn restrict_to(&self, index: &BTreeSet<NaiveDateTime>) -> EquityCurve {
        EquityCurve {
            points: self
                .points
                .iter()
                .filter(|p| index.contains(&p.timestamp))
                .copied()
                .collect(),
        }
    }
}

impl FromIterator<EquityPoint> for EquityCurve {
    fn from_iter<I: IntoIterator<Item = EquityPoint>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}
