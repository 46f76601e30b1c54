//! Criterion benchmarks for RevertLab hot paths.
//!
//! Benchmarks:
//! 1. Ratio precompute (SMA and close/SMA)
//! 2. Signal generation (ratio + percentile thresholds)
//! 3. Equity simulation (bar-by-bar state machine)
//! 4. Full instrument pipeline

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use revertlab_core::domain::{Bar, PriceSeries, SizingBands};
use revertlab_core::engine::{run_instrument, Simulator};
use revertlab_core::indicators::{Indicator, PriceRatio, Sma};
use revertlab_core::signals::SignalGenerator;
use revertlab_core::sizers::PercentileBandSizer;
use revertlab_core::StrategyParams;

const SIZES: [usize; 3] = [252, 1260, 2520];

// ── Helpers ──────────────────────────────────────────────────────────

fn make_bars(n: usize) -> Vec<Bar> {
    let base = chrono::NaiveDate::from_ymd_opt(2020, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            Bar {
                timestamp: base + chrono::Duration::days(i as i64),
                open: close - 0.3,
                high: close + 1.5,
                low: close - 1.5,
                close,
                volume: 1_000_000.0 + (i % 500_000) as f64,
            }
        })
        .collect()
}

// ── 1. Ratio precompute ──────────────────────────────────────────────

fn bench_ratio(c: &mut Criterion) {
    let mut group = c.benchmark_group("ratio_precompute");

    for &bar_count in &SIZES {
        let bars = make_bars(bar_count);
        let sma = Sma::new(21);
        let ratio = PriceRatio::new(21);

        group.bench_with_input(BenchmarkId::new("sma_21", bar_count), &bars, |b, bars| {
            b.iter(|| sma.compute(black_box(bars)));
        });
        group.bench_with_input(
            BenchmarkId::new("close_over_sma_21", bar_count),
            &bars,
            |b, bars| {
                b.iter(|| ratio.series(black_box(bars)));
            },
        );
    }

    group.finish();
}

// ── 2. Signal generation ─────────────────────────────────────────────

fn bench_signals(c: &mut Criterion) {
    let mut group = c.benchmark_group("signal_generation");
    let generator = SignalGenerator::new(21, 25.0, 75.0);

    for &bar_count in &SIZES {
        let bars = make_bars(bar_count);
        group.bench_with_input(BenchmarkId::from_parameter(bar_count), &bars, |b, bars| {
            b.iter(|| generator.generate(black_box(bars)));
        });
    }

    group.finish();
}

// ── 3. Equity simulation ─────────────────────────────────────────────

fn bench_simulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("equity_simulation");
    let generator = SignalGenerator::new(21, 25.0, 75.0);
    let sizer = PercentileBandSizer::new();

    for &bar_count in &SIZES {
        let bars = make_bars(bar_count);
        let output = generator.generate(&bars);
        let bands = SizingBands::from_ratios(&output.ratios, [15.0, 30.0, 70.0, 85.0]);

        group.bench_with_input(BenchmarkId::from_parameter(bar_count), &bars, |b, bars| {
            b.iter(|| {
                Simulator::new(10_000.0, &sizer).run(
                    black_box(bars),
                    black_box(&output.signals),
                    black_box(&output.ratios),
                    &bands,
                )
            });
        });
    }

    group.finish();
}

// ── 4. Full pipeline ─────────────────────────────────────────────────

fn bench_instrument(c: &mut Criterion) {
    let mut group = c.benchmark_group("instrument_pipeline");
    let params = StrategyParams::default();
    let sizer = PercentileBandSizer::new();

    for &bar_count in &SIZES {
        let series = PriceSeries::new("BENCH", make_bars(bar_count)).unwrap();
        group.bench_with_input(
            BenchmarkId::from_parameter(bar_count),
            &series,
            |b, series| {
                b.iter(|| run_instrument(black_box(series), &params, &sizer));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_ratio,
    bench_signals,
    bench_simulation,
    bench_instrument
);
criterion_main!(benches);
