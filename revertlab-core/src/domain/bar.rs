//! Bar and PriceSeries: the market data units the engine consumes.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One OHLCV observation for a single instrument.
///
/// Timestamps are naive UTC. Intraday and daily data are treated the same way;
/// the engine only ever looks at `close`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Returns true if any OHLCV field is NaN or infinite.
    pub fn is_void(&self) -> bool {
        !(self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
            && self.volume.is_finite())
    }

    /// Prices strictly positive, volume non-negative, nothing void.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.open > 0.0
            && self.high > 0.0
            && self.low > 0.0
            && self.close > 0.0
            && self.volume >= 0.0
    }
}

/// Violations of the series invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("bar {index} at {timestamp} has non-positive or non-finite fields")]
    InvalidBar {
        index: usize,
        timestamp: NaiveDateTime,
    },

    #[error("timestamps not strictly increasing at bar {index} ({previous} -> {current})")]
    NonIncreasingTimestamp {
        index: usize,
        previous: NaiveDateTime,
        current: NaiveDateTime,
    },
}

/// Ordered bars for one instrument.
///
/// Construction validates the invariants once, so everything downstream can
/// treat the bars as clean: strictly increasing unique timestamps and sane
/// OHLCV values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, SeriesError> {
        for (index, bar) in bars.iter().enumerate() {
            if !bar.is_sane() {
                return Err(SeriesError::InvalidBar {
                    index,
                    timestamp: bar.timestamp,
                });
            }
            if index > 0 {
                let previous = bars[index - 1].timestamp;
                if bar.timestamp <= previous {
                    return Err(SeriesError::NonIncreasingTimestamp {
                        index,
                        previous,
                        current: bar.timestamp,
                    });
                }
            }
        }
        Ok(Self {
            symbol: symbol.into(),
            bars,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Close prices in bar order.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn first_timestamp(&self) -> Option<NaiveDateTime> {
        self.bars.first().map(|b| b.timestamp)
    }

    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.bars.last().map(|b| b.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn ts(minute: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
            + Duration::minutes(minute)
    }

    fn sample_bar(minute: i64, close: f64) -> Bar {
        Bar {
            timestamp: ts(minute),
            open: 100.0,
            high: 105.0,
            low: 98.0,
            close,
            volume: 50_000.0,
        }
    }

    #[test]
    fn bar_is_sane() {
        assert!(sample_bar(0, 103.0).is_sane());
    }

    #[test]
    fn bar_detects_void() {
        let mut bar = sample_bar(0, 103.0);
        bar.volume = f64::NAN;
        assert!(bar.is_void());
        assert!(!bar.is_sane());
    }

    #[test]
    fn bar_rejects_zero_close() {
        assert!(!sample_bar(0, 0.0).is_sane());
    }

    #[test]
    fn series_accepts_increasing_timestamps() {
        let series = PriceSeries::new(
            "AAPL",
            vec![sample_bar(0, 100.0), sample_bar(1, 101.0), sample_bar(5, 99.0)],
        )
        .unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.symbol(), "AAPL");
        assert_eq!(series.closes(), vec![100.0, 101.0, 99.0]);
        assert_eq!(series.first_timestamp(), Some(ts(0)));
        assert_eq!(series.last_timestamp(), Some(ts(5)));
    }

    #[test]
    fn series_rejects_duplicate_timestamp() {
        let err = PriceSeries::new("AAPL", vec![sample_bar(0, 100.0), sample_bar(0, 101.0)])
            .unwrap_err();
        assert!(matches!(
            err,
            SeriesError::NonIncreasingTimestamp { index: 1, .. }
        ));
    }

    #[test]
    fn series_rejects_insane_bar() {
        let err = PriceSeries::new("AAPL", vec![sample_bar(0, 100.0), sample_bar(1, -1.0)])
            .unwrap_err();
        assert!(matches!(err, SeriesError::InvalidBar { index: 1, .. }));
    }

    #[test]
    fn empty_series_is_valid() {
        let series = PriceSeries::new("AAPL", Vec::new()).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.first_timestamp(), None);
    }
}
