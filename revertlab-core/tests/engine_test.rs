//! Engine scenarios with hand-computed expectations.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use revertlab_core::domain::{Bar, Direction, PriceSeries, Signal, SizingBands};
use revertlab_core::engine::{
    buy_and_hold, run_instrument, step, PositionSide, PositionState, Simulator,
};
use revertlab_core::sizers::{FixedFractionSizer, PercentileBandSizer, Sizer, SizingError};
use revertlab_core::StrategyParams;

// ── Helpers ──────────────────────────────────────────────────────────

fn ts(i: usize) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
        + Duration::minutes(i as i64)
}

fn bars(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            timestamp: ts(i),
            open: close,
            high: close * 1.01,
            low: close * 0.99,
            close,
            volume: 10_000.0,
        })
        .collect()
}

/// Stand-in sizer that always answers the same fraction and records nothing.
struct ConstantSizer(f64);

impl Sizer for ConstantSizer {
    fn fraction(
        &self,
        _ratio: f64,
        _direction: Direction,
        _bands: &SizingBands,
    ) -> Result<f64, SizingError> {
        Ok(self.0)
    }

    fn name(&self) -> &str {
        "constant"
    }
}

/// Sizer whose bands are always degenerate.
struct CollapsedSizer;

impl Sizer for CollapsedSizer {
    fn fraction(
        &self,
        _ratio: f64,
        _direction: Direction,
        _bands: &SizingBands,
    ) -> Result<f64, SizingError> {
        Err(SizingError::DegenerateBands)
    }

    fn name(&self) -> &str {
        "collapsed"
    }
}

// ── Scenarios ────────────────────────────────────────────────────────

#[test]
fn all_buy_with_half_fraction() {
    let bars = bars(&[100.0, 90.0, 80.0, 120.0]);
    let signals = [Signal::Flat, Signal::Buy, Signal::Buy, Signal::Buy];
    let sizer = ConstantSizer(0.5);

    let result = Simulator::new(10_000.0, &sizer)
        .run(&bars, &signals, &[None; 4], &SizingBands::zero())
        .unwrap();

    // bar1: 55 shares @ 90, cash 5050, equity 10000
    // bar2: cash 5050 - 550 = 4500, 28 shares @ 80, cash 2260, equity 4500
    // bar3: cash 2260 + 1120 = 3380, 14 shares @ 120, cash 1700, equity 3380
    assert_eq!(result.equity_curve.values(), vec![10_000.0, 4_500.0, 3_380.0]);
    assert_eq!(result.final_equity, 3_380.0);
    assert_eq!(result.final_state.side, PositionSide::Long);
    assert_eq!(result.final_state.shares_held, 14);
    assert_eq!(result.final_state.cash, 1_700.0);
    assert_eq!(result.bars_long, 3);
}

#[test]
fn first_bar_signal_is_ignored() {
    let bars = bars(&[100.0, 90.0, 80.0, 120.0]);
    let signals = [Signal::Buy; 4];
    let sizer = FixedFractionSizer::new(0.5);

    let result = Simulator::new(10_000.0, &sizer)
        .run(&bars, &signals, &[None; 4], &SizingBands::zero())
        .unwrap();

    assert_eq!(result.equity_curve.values(), vec![10_000.0, 4_500.0, 3_380.0]);
}

#[test]
fn step_by_step_matches_full_run() {
    let closes = [100.0, 90.0, 80.0, 120.0];
    let sizer = ConstantSizer(0.5);
    let bands = SizingBands::zero();

    let mut state = PositionState::initial(10_000.0, closes[0]);
    let mut stepped = Vec::new();
    for &price in &closes[1..] {
        let (next, outcome) = step(state, price, Signal::Buy, None, &bands, &sizer);
        state = next;
        stepped.push(outcome.equity);
    }

    assert_eq!(stepped, vec![10_000.0, 4_500.0, 3_380.0]);
    assert_eq!(state.reference_price, 120.0);
}

#[test]
fn all_flat_is_constant_capital() {
    let closes: Vec<f64> = (0..10).map(|i| 100.0 + i as f64 * 3.0).collect();
    let bars = bars(&closes);
    let sizer = FixedFractionSizer::new(1.0);

    let result = Simulator::new(25_000.0, &sizer)
        .run(&bars, &[Signal::Flat; 10], &[None; 10], &SizingBands::zero())
        .unwrap();

    assert_eq!(result.equity_curve.len(), 9);
    assert!(result
        .equity_curve
        .values()
        .iter()
        .all(|v| *v == 25_000.0));
    assert_eq!(result.final_equity, 25_000.0);
}

#[test]
fn short_then_cover() {
    let bars = bars(&[100.0, 110.0, 100.0]);
    let signals = [Signal::Flat, Signal::Sell, Signal::Flat];
    let sizer = ConstantSizer(0.5);

    let result = Simulator::new(10_000.0, &sizer)
        .run(&bars, &signals, &[None; 3], &SizingBands::zero())
        .unwrap();

    // bar1: 45 shares short @ 110, cash 5050, equity 5050 + 45 * (200 - 110) = 9100
    // bar2: cash 5050 + 45 * (110 - 100) = 5500, flat
    assert_eq!(result.equity_curve.values(), vec![9_100.0, 5_500.0]);
    assert_eq!(result.bars_short, 1);
}

#[test]
fn degenerate_sizing_never_opens() {
    let bars = bars(&[100.0, 90.0, 110.0, 95.0]);
    let signals = [Signal::Flat, Signal::Buy, Signal::Sell, Signal::Buy];

    let result = Simulator::new(10_000.0, &CollapsedSizer)
        .run(&bars, &signals, &[None; 4], &SizingBands::zero())
        .unwrap();

    assert_eq!(result.degenerate_bars, 3);
    assert_eq!(result.bars_long + result.bars_short, 0);
    assert!(result
        .equity_curve
        .values()
        .iter()
        .all(|v| *v == 10_000.0));
}

#[test]
fn buy_and_hold_identity() {
    let closes = [100.0, 120.0, 100.0, 80.0, 100.0];
    let curve = buy_and_hold(&bars(&closes), 10_000.0);
    let values = curve.values();

    assert_eq!(values[0], 10_000.0);
    for (value, close) in values.iter().zip(closes) {
        assert_eq!(*value == 10_000.0, close == closes[0]);
    }
}

#[test]
fn constant_series_pipeline_is_flat() {
    let series = PriceSeries::new("FLAT", bars(&[55.0; 60])).unwrap();
    let params = StrategyParams {
        sma_window: 21,
        ..StrategyParams::default()
    };

    let run = run_instrument(&series, &params, &PercentileBandSizer).unwrap();

    assert_eq!(run.buy_signals, 0);
    assert_eq!(run.sell_signals, 0);
    assert!(run.thresholds.degenerate);
    assert_eq!(run.final_equity(), params.initial_capital);
    assert_eq!(run.benchmark_final(), params.initial_capital);
}
