//! Property tests for engine invariants.
//!
//! Uses proptest to verify:
//! 1. Warm-up: no signal before the window fills
//! 2. Constant prices: ratio is 1 and nothing trades
//! 3. Monotonic sizing bands
//! 4. Sizing cap: fractions stay in [0, 2]
//! 5. Finite equity for finite inputs
//! 6. Buy-and-hold starts at the initial capital

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use revertlab_core::domain::{Bar, Direction, PriceSeries, Signal, SizingBands};
use revertlab_core::engine::{buy_and_hold, run_instrument, Simulator};
use revertlab_core::signals::SignalGenerator;
use revertlab_core::sizers::{FixedFractionSizer, PercentileBandSizer, Sizer, MAX_FRACTION};
use revertlab_core::StrategyParams;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = f64> {
    (1.0..500.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_closes(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(arb_price(), 0..max_len)
}

fn arb_signal() -> impl Strategy<Value = Signal> {
    prop_oneof![Just(Signal::Buy), Just(Signal::Sell), Just(Signal::Flat)]
}

fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base = NaiveDate::from_ymd_opt(2023, 6, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            timestamp: base + Duration::hours(i as i64),
            open: close,
            high: close,
            low: close,
            close,
            volume: 0.0,
        })
        .collect()
}

// ── 1. Warm-up ───────────────────────────────────────────────────────

proptest! {
    #[test]
    fn no_signal_inside_warmup(closes in arb_closes(80), window in 1usize..30) {
        let out = SignalGenerator::new(window, 25.0, 75.0).generate(&make_bars(&closes));
        prop_assert_eq!(out.signals.len(), closes.len());
        for signal in out.signals.iter().take(window) {
            prop_assert_eq!(*signal, Signal::Flat);
        }
        for ratio in out.ratios.iter().take(window) {
            prop_assert!(ratio.is_none());
        }
    }
}

// ── 2. Constant prices ───────────────────────────────────────────────

proptest! {
    #[test]
    fn constant_prices_are_flat(price in arb_price(), len in 0usize..80, window in 1usize..20) {
        let out = SignalGenerator::new(window, 25.0, 75.0).generate(&make_bars(&vec![price; len]));
        prop_assert!(out.signals.iter().all(|s| *s == Signal::Flat));
        for ratio in out.ratios.iter().flatten() {
            prop_assert!((ratio - 1.0).abs() < 1e-12);
        }
    }
}

// ── 3. Monotonic bands ───────────────────────────────────────────────

proptest! {
    #[test]
    fn sizing_bands_are_monotonic(
        ratios in prop::collection::vec(prop::option::of(0.5..1.5_f64), 1..200),
        cuts in prop::array::uniform4(0.0..100.0_f64),
    ) {
        let mut cuts = cuts;
        cuts.sort_by(f64::total_cmp);
        let bands = SizingBands::from_ratios(&ratios, cuts);
        prop_assert!(bands.is_monotonic(), "bands not monotonic: {:?}", bands);
    }
}

// ── 4. Sizing cap ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn fraction_within_cap(
        ratio in -10.0..10.0_f64,
        low in 0.5..1.0_f64,
        gap_low in 0.001..0.5_f64,
        gap_high in 0.001..0.5_f64,
        high in 1.0..1.5_f64,
        long in any::<bool>(),
    ) {
        let bands = SizingBands::new(low, low + gap_low, high - gap_high, high);
        let direction = if long { Direction::Long } else { Direction::Short };
        let f = PercentileBandSizer.fraction(ratio, direction, &bands).unwrap();
        prop_assert!((0.0..=MAX_FRACTION).contains(&f), "fraction {} out of range", f);
    }
}

// ── 5. Finite equity ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn equity_is_finite(
        data in arb_closes(120).prop_flat_map(|closes| {
            let n = closes.len();
            (Just(closes), prop::collection::vec(arb_signal(), n))
        }),
        fraction in 0.0..2.0_f64,
    ) {
        let (closes, signals) = data;
        let bars = make_bars(&closes);
        let sizer = FixedFractionSizer::new(fraction);
        let result = Simulator::new(10_000.0, &sizer)
            .run(&bars, &signals, &vec![None; bars.len()], &SizingBands::zero())
            .unwrap();
        prop_assert_eq!(result.equity_curve.len(), bars.len().saturating_sub(1));
        prop_assert!(result.equity_curve.values().iter().all(|v| v.is_finite()));
        prop_assert!(result.final_equity.is_finite());
    }

    #[test]
    fn full_pipeline_equity_is_finite(closes in arb_closes(150), window in 1usize..15) {
        prop_assume!(closes.len() > window);
        let series = PriceSeries::new("PROP", make_bars(&closes)).unwrap();
        let params = StrategyParams { sma_window: window, ..StrategyParams::default() };
        let run = run_instrument(&series, &params, &PercentileBandSizer).unwrap();
        prop_assert!(run.equity_curve().values().iter().all(|v| v.is_finite()));
        prop_assert!(run.bands.is_monotonic());
    }
}

// ── 6. Buy-and-hold ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn buy_and_hold_starts_at_capital(closes in arb_closes(60), capital in 1.0..1e6_f64) {
        prop_assume!(!closes.is_empty());
        let curve = buy_and_hold(&make_bars(&closes), capital);
        prop_assert_eq!(curve.len(), closes.len());
        prop_assert_eq!(curve.first_value(), Some(capital));
        for (value, close) in curve.values().iter().zip(&closes) {
            if *close == closes[0] {
                prop_assert_eq!(*value, capital);
            }
        }
    }
}
