// ── Share-of-total computation ──

/// Round to one decimal place, half away from zero.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Percentage of `part` in `total`, rounded to one decimal and bounded
/// to `[0, 100]`. A non-positive total yields `0.0`.
pub fn share(part: f64, total: f64) -> f64 {
    if total <= 0.0 || !total.is_finite() {
        return 0.0;
    }
    round1((part / total * 100.0).clamp(0.0, 100.0))
}

/// Each count's share of the sum of all counts.
///
/// Counts are expected to be coerced already. All-zero or empty input
/// produces all zeros; the output never contains NaN.
pub fn percentages(counts: &[f64]) -> Vec<f64> {
    let total: f64 = counts.iter().copied().filter(|c| *c > 0.0).sum();
    counts.iter().map(|&c| share(c.max(0.0), total)).collect()
}
