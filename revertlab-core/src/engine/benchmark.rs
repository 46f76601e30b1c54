//! Buy-and-hold benchmark: `initial_capital * close[i] / close[0]`.

use crate::domain::{Bar, EquityCurve};

/// Benchmark value at every bar, bar 0 included (where it equals the capital).
pub fn buy_and_hold(bars: &[Bar], initial_capital: f64) -> EquityCurve {
    let Some(first) = bars.first() else {
        return EquityCurve::new();
    };
    let base = first.close;
    let mut curve = EquityCurve::with_capacity(bars.len());
    for bar in bars {
        curve.push(bar.timestamp, initial_capital * (bar.close / base));
    }
    curve
}

/// Final buy-and-hold value; `initial_capital` for an empty series.
pub fn buy_and_hold_final(bars: &[Bar], initial_capital: f64) -> f64 {
    match (bars.first(), bars.last()) {
        (Some(first), Some(last)) => initial_capital * (last.close / first.close),
        _ => initial_capital,
    }
}
