//! Sample size needed for a target precision on mean seasonal savings.

use statrs::distribution::{ContinuousCDF, Normal};

use crate::analyzers::types::ColumnStats;

/// Two-sided standard normal critical value for `confidence`, e.g. ~1.96 for 0.95.
///
/// Returns NaN when `confidence` is outside `0.0..=1.0`.
pub fn z_score(confidence: f64) -> f64 {
    let p = 1.0 - (1.0 - confidence) / 2.0;
    if !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    Normal::new(0.0, 1.0).map_or(f64::NAN, |standard| standard.inverse_cdf(p))
}

/// Number of seasons required so that, at `confidence`, the confidence
/// interval half-width is within `ratio` of `mean`.
///
/// `required_n = (sem * sqrt(n) * z / (mean * ratio))^2`
///
/// This is a point estimate and is not compared against `n`. A zero target
/// interval yields `inf` (or NaN when the spread is also zero); a negative mean
/// is squared away like a positive one.
pub fn required_sample_size(mean: f64, sem: f64, n: usize, confidence: f64, ratio: f64) -> f64 {
    let std = sem * (n as f64).sqrt();
    let target_interval = mean * ratio;
    (std * z_score(confidence) / target_interval).powi(2)
}

/// [`required_sample_size`] for a summarised savings column.
pub fn statistical_power_estimate(savings: &ColumnStats, confidence: f64, ratio: f64) -> f64 {
    required_sample_size(savings.mean, savings.sem, savings.n, confidence, ratio)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_z_score() {
        assert!((z_score(0.95) - 1.959964).abs() < 1e-6);
        assert!((z_score(0.90) - 1.644854).abs() < 1e-6);
        assert!(z_score(1.5).is_nan());
    }

    #[test]
    fn test_required_sample_size() {
        // std = 5, z ~ 1.96, target interval = 0.5
        let n = required_sample_size(10.0, 1.0, 25, 0.95, 0.05);
        assert!((n - 384.146).abs() < 0.01, "{n}");
    }

    #[test]
    fn test_negative_mean_matches_positive() {
        let positive = required_sample_size(10.0, 1.0, 25, 0.95, 0.05);
        let negative = required_sample_size(-10.0, 1.0, 25, 0.95, 0.05);
        assert_eq!(positive, negative);
    }

    #[test]
    fn test_zero_target_interval_is_non_finite() {
        assert_eq!(required_sample_size(0.0, 1.0, 25, 0.95, 0.05), f64::INFINITY);
        assert_eq!(required_sample_size(10.0, 1.0, 25, 0.95, 0.0), f64::INFINITY);
        assert!(required_sample_size(0.0, 0.0, 25, 0.95, 0.05).is_nan());
    }

    #[test]
    fn test_estimate_from_column_stats() {
        let savings = ColumnStats {
            mean: 10.0,
            sem: 1.0,
            n: 25,
            deciles: [0.0; 9],
        };
        let n = statistical_power_estimate(&savings, 0.95, 0.05);
        assert!((n - 384.146).abs() < 0.01);
    }
}
