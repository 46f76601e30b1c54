//! Percentiles with linear interpolation between closest ranks.
//!
//! For sorted values `v` of length `n`, the `p`th percentile sits at fractional
//! rank `h = (n - 1) * p / 100` and is `v[floor(h)] + (h - floor(h)) * (v[ceil(h)] - v[floor(h)])`.

/// Finite defined values, sorted ascending.
pub fn defined_values(values: &[Option<f64>]) -> Vec<f64> {
    let mut out: Vec<f64> = values
        .iter()
        .filter_map(|v| *v)
        .filter(|v| v.is_finite())
        .collect();
    out.sort_by(f64::total_cmp);
    out
}

/// Percentile of an already-sorted, non-empty slice. `pct` is clamped to [0, 100].
pub fn percentile_sorted(sorted: &[f64], pct: f64) -> f64 {
    debug_assert!(!sorted.is_empty(), "percentile of empty slice");
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let rank = (n - 1) as f64 * pct.clamp(0.0, 100.0) / 100.0;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}
