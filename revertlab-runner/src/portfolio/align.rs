//! Aggregate equity curves across instruments.
//!
//! Instruments may trade on different calendars. The aggregate only covers
//! timestamps present in every instrument's price series, bar 0 included.
//! Strategy equity at an instrument's bar 0 is its starting capital. Each
//! strategy and benchmark curve is restricted to that index and averaged
//! pointwise.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use revertlab_core::domain::EquityCurve;
use revertlab_core::engine::InstrumentRun;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AggregateError {
    #[error("no timestamp is shared by every instrument's price series")]
    NoCommonIndex,

    #[error("no successful instruments to aggregate")]
    Empty,
}

/// Mean strategy and buy-and-hold curves over the common index.
///
/// Benchmarks are restricted to the index, not rebased: when the index starts
/// after an instrument's bar 0, its benchmark enters at its value on that
/// date rather than at the starting capital.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateCurves {
    pub strategy: EquityCurve,
    pub benchmark: EquityCurve,
}

impl AggregateCurves {
    pub fn len(&self) -> usize {
        self.strategy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategy.is_empty()
    }
}

/// Timestamps present in every curve. Empty when `curves` is empty.
pub fn common_index<'a, I>(curves: I) -> BTreeSet<NaiveDateTime>
where
    I: IntoIterator<Item = &'a EquityCurve>,
{
    let mut iter = curves.into_iter();
    let Some(first) = iter.next() else {
        return BTreeSet::new();
    };
    let mut index: BTreeSet<NaiveDateTime> = first.timestamps().collect();
    for curve in iter {
        let other: BTreeSet<NaiveDateTime> = curve.timestamps().collect();
        index.retain(|ts| other.contains(ts));
        if index.is_empty() {
            break;
        }
    }
    index
}

/// Pointwise mean of `curves` restricted to `index`.
///
/// Every curve must contain every timestamp of `index` exactly once.
pub fn mean_curve(curves: &[&EquityCurve], index: &BTreeSet<NaiveDateTime>) -> EquityCurve {
    let mut sums = vec![0.0_f64; index.len()];
    for curve in curves {
        for (sum, point) in sums.iter_mut().zip(curve.restrict_to(index).points()) {
            *sum += point.equity;
        }
    }
    let n = curves.len().max(1) as f64;
    let mut out = EquityCurve::with_capacity(index.len());
    for (ts, sum) in index.iter().zip(sums) {
        out.push(*ts, sum / n);
    }
    out
}

/// Average the strategy and benchmark curves of `runs` over their common index.
pub fn aggregate_curves(runs: &[InstrumentRun]) -> Result<AggregateCurves, AggregateError> {
    if runs.is_empty() {
        return Err(AggregateError::Empty);
    }

    let index = common_index(runs.iter().map(|r| &r.benchmark));
    if index.is_empty() {
        return Err(AggregateError::NoCommonIndex);
    }

    let full: Vec<EquityCurve> = runs.iter().map(|r| r.full_equity_curve()).collect();
    let strategy: Vec<&EquityCurve> = full.iter().collect();
    let benchmark: Vec<&EquityCurve> = runs.iter().map(|r| &r.benchmark).collect();

    Ok(AggregateCurves {
        strategy: mean_curve(&strategy, &index),
        benchmark: mean_curve(&benchmark, &index),
    })
}
