//! Descriptive statistics over finite `f64` samples.
//!
//! Empty input yields `NaN` rather than an error, so a column with no usable
//! values still produces a (flagged) summary.

/// Computes the arithmetic mean of a slice of values. Returns NaN for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Computes the population standard deviation given a pre-computed mean.
/// Returns NaN for empty input.
pub fn stddev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;

    variance.sqrt()
}

/// Standard error of the mean: population standard deviation over `sqrt(n)`.
pub fn sem(values: &[f64], mean: f64) -> f64 {
    stddev(values, mean) / (values.len() as f64).sqrt()
}

/// The `q`-quantile (`0.0..=1.0`) of ascending `sorted` values, interpolating
/// linearly between the two nearest ranks.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }

    let rank = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lo = rank.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let (a, b) = (sorted[lo], sorted[hi]);

    // Capping at `b` keeps the result monotone in `q` across rank boundaries.
    (a + (b - a) * (rank - lo as f64)).min(b)
}
