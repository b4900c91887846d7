//! Data types produced by the summary pipeline.

use std::fmt;

use serde::Serialize;

use crate::analyzers::utility::{mean, quantile, sem};
use crate::schema::SeasonType;

/// Percentile ranks reported for every column.
pub const DECILES: [u32; 9] = [10, 20, 30, 40, 50, 60, 70, 80, 90];

/// Descriptive statistics for one metric column within one group/season type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStats {
    pub mean: f64,
    pub sem: f64,
    /// Number of finite values the statistics were computed from.
    pub n: usize,
    /// Values at the ranks in [`DECILES`].
    pub deciles: [f64; 9],
}

impl ColumnStats {
    /// Summarises a column, treating missing and infinite values as absent.
    pub fn from_values(values: impl IntoIterator<Item = Option<f64>>) -> Self {
        let mut finite: Vec<f64> = values
            .into_iter()
            .flatten()
            .filter(|v| v.is_finite())
            .collect();
        finite.sort_by(f64::total_cmp);

        let m = mean(&finite);
        Self {
            mean: m,
            sem: sem(&finite, m),
            n: finite.len(),
            deciles: DECILES.map(|rank| quantile(&finite, f64::from(rank) / 100.0)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: &'static str,
    #[serde(flatten)]
    pub stats: ColumnStats,
}

/// Summary statistics for one (group, season type).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatRecord {
    /// `"{group}_{season_type}"`, e.g. `"all_heating"`.
    pub label: String,
    pub season_type: SeasonType,
    pub n_seasons_total: usize,
    pub n_seasons_kept: usize,
    pub n_seasons_discarded: usize,
    /// Seasons needed for the configured confidence/precision on mean savings.
    pub n_enough_statistical_power: f64,
    /// Per-column statistics, in canonical column order.
    pub columns: Vec<ColumnSummary>,
}

impl SummaryStatRecord {
    pub fn column(&self, name: &str) -> Option<&ColumnStats> {
        self.columns
            .iter()
            .find(|c| c.column == name)
            .map(|c| &c.stats)
    }
}

/// A group/season type left out of the output because no season qualified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmptySeasonWarning {
    pub label: String,
    pub season_type: SeasonType,
    pub n_seasons_total: usize,
}

impl fmt::Display for EmptySeasonWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Not enough data to compute summary statistics for {} {} ({} seasons, none kept)",
            self.label, self.season_type, self.n_seasons_total
        )
    }
}

/// Output of a summary run: the computed records plus non-fatal warnings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub records: Vec<SummaryStatRecord>,
    pub warnings: Vec<EmptySeasonWarning>,
}

impl Summary {
    pub fn extend(&mut self, other: Summary) {
        self.records.extend(other.records);
        self.warnings.extend(other.warnings);
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.label.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_column_stats_drops_missing_and_infinite() {
        let stats = ColumnStats::from_values([
            Some(1.0),
            None,
            Some(f64::INFINITY),
            Some(3.0),
            Some(f64::NEG_INFINITY),
            Some(f64::NAN),
        ]);
        assert_eq!(stats.n, 2);
        assert_eq!(stats.mean, 2.0);
        assert_eq!(stats.sem, 1.0 / 2f64.sqrt());
        assert_eq!(stats.deciles[4], 2.0);
    }

    #[test]
    fn test_column_stats_all_missing_is_nan() {
        let stats = ColumnStats::from_values([None, Some(f64::INFINITY)]);
        assert_eq!(stats.n, 0);
        assert!(stats.mean.is_nan());
        assert!(stats.sem.is_nan());
        assert!(stats.deciles.iter().all(|q| q.is_nan()));
    }

    #[test]
    fn test_deciles_of_range() {
        let stats = ColumnStats::from_values((0..=100).rev().map(|v| Some(f64::from(v))));
        for (decile, rank) in stats.deciles.iter().zip(DECILES) {
            assert!((decile - f64::from(rank)).abs() < 1e-9, "{decile} != {rank}");
        }
    }

    #[test]
    fn test_empty_season_warning_message() {
        let warning = EmptySeasonWarning {
            label: "group_a".to_string(),
            season_type: SeasonType::Cooling,
            n_seasons_total: 3,
        };
        assert!(warning.to_string().contains("group_a cooling"));
    }

    proptest! {
        #[test]
        fn deciles_are_non_decreasing(
            values in prop::collection::vec(prop::option::of(-1e6f64..1e6), 1..60)
        ) {
            let stats = ColumnStats::from_values(values);
            if stats.n > 0 {
                for pair in stats.deciles.windows(2) {
                    prop_assert!(pair[0] <= pair[1], "{:?}", stats.deciles);
                }
            }
        }
    }
}
