//! Acceptance rules deciding whether a season is statistically usable.
//!
//! A season is kept iff it passes all three rules:
//!
//! | Rule                 | Column(s)                                          | Test              |
//! |----------------------|----------------------------------------------------|-------------------|
//! | validity             | `n_days_insufficient_data / n_days_in_season_range` | `< 0.05`          |
//! | physical plausibility| base temperature estimate (`intercept_deltaT` for deltaT) | `-10..=50`  |
//! | fit quality          | selected error metric for the method/season        | `< max_error`     |
//!
//! A missing cell fails whichever rule reads it.

use std::ops::RangeInclusive;

use crate::config::SummaryConfig;
use crate::error::Result;
use crate::schema::{
    ErrorMetric, Method, MetricFamily, N_DAYS_IN_SEASON_RANGE, N_DAYS_INSUFFICIENT_DATA, Schema,
    SeasonType,
};
use crate::season::{SeasonRecord, SeasonTable};

pub const MAX_INSUFFICIENT_DATA_FRACTION: f64 = 0.05;
pub const PHYSICAL_BASE_TEMPERATURE: RangeInclusive<f64> = -10.0..=50.0;

/// Thresholds the acceptance rules are evaluated against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcceptanceCriteria {
    pub method: Method,
    pub error_metric: ErrorMetric,
    pub max_error: f64,
}

impl From<&SummaryConfig> for AcceptanceCriteria {
    fn from(config: &SummaryConfig) -> Self {
        Self {
            method: config.method,
            error_metric: config.error_metric,
            max_error: config.max_error,
        }
    }
}

impl AcceptanceCriteria {
    pub fn base_temperature_column(&self, season: SeasonType) -> &'static str {
        Schema::global().column(MetricFamily::BaseTemperature, self.method, season)
    }

    pub fn error_column(&self, season: SeasonType) -> &'static str {
        Schema::global().column(self.error_metric.family(), self.method, season)
    }

    /// Decides whether a single record is usable as a `season` season.
    ///
    /// # Errors
    ///
    /// [`StatsError::MissingColumn`](crate::error::StatsError::MissingColumn)
    /// if a column the rules read is absent.
    pub fn accepts(&self, record: &SeasonRecord<'_>, season: SeasonType) -> Result<bool> {
        Ok(accepts_values(
            record.value(N_DAYS_INSUFFICIENT_DATA)?,
            record.value(N_DAYS_IN_SEASON_RANGE)?,
            record.value(self.base_temperature_column(season))?,
            record.value(self.error_column(season))?,
            self.max_error,
        ))
    }
}

/// Insufficient-data days must be under 5% of the season range. An empty
/// range is rejected.
pub fn passes_validity_rules(n_days_insufficient_data: Option<f64>, n_days_in_season_range: Option<f64>) -> bool {
    match (n_days_insufficient_data, n_days_in_season_range) {
        (Some(_), Some(range)) if range == 0.0 => false,
        (Some(insufficient), Some(range)) => insufficient / range < MAX_INSUFFICIENT_DATA_FRACTION,
        _ => false,
    }
}

pub fn has_physical_base_temperature(base_temperature: Option<f64>) -> bool {
    base_temperature.is_some_and(|t| PHYSICAL_BASE_TEMPERATURE.contains(&t))
}

pub fn has_good_enough_fit(error: Option<f64>, max_error: f64) -> bool {
    error.is_some_and(|e| e < max_error)
}

fn accepts_values(
    n_days_insufficient_data: Option<f64>,
    n_days_in_season_range: Option<f64>,
    base_temperature: Option<f64>,
    error: Option<f64>,
    max_error: f64,
) -> bool {
    passes_validity_rules(n_days_insufficient_data, n_days_in_season_range)
        && has_physical_base_temperature(base_temperature)
        && has_good_enough_fit(error, max_error)
}

/// Column-wise acceptance filter over a whole [`SeasonTable`].
///
/// Columns are resolved once up front, so every row is judged by the same
/// per-row rules as [`AcceptanceCriteria::accepts`] without repeated lookups.
pub struct RowAcceptanceFilter<'a> {
    n_days_insufficient_data: &'a [Option<f64>],
    n_days_in_season_range: &'a [Option<f64>],
    base_temperature: &'a [Option<f64>],
    error: &'a [Option<f64>],
    max_error: f64,
}

impl<'a> RowAcceptanceFilter<'a> {
    pub fn new(table: &'a SeasonTable, season: SeasonType, criteria: &AcceptanceCriteria) -> Result<Self> {
        Ok(Self {
            n_days_insufficient_data: table.column(N_DAYS_INSUFFICIENT_DATA)?,
            n_days_in_season_range: table.column(N_DAYS_IN_SEASON_RANGE)?,
            base_temperature: table.column(criteria.base_temperature_column(season))?,
            error: table.column(criteria.error_column(season))?,
            max_error: criteria.max_error,
        })
    }

    pub(crate) fn accepts(&self, row: usize) -> bool {
        accepts_values(
            self.n_days_insufficient_data[row],
            self.n_days_in_season_range[row],
            self.base_temperature[row],
            self.error[row],
            self.max_error,
        )
    }

    /// The subset of `rows` that pass, in order.
    ///
    /// # Panics
    ///
    /// If any of `rows` is not a row of the table the filter was built on.
    pub fn accepted_rows(&self, rows: &[usize]) -> Vec<usize> {
        rows.iter().copied().filter(|&row| self.accepts(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StatsError;

    fn criteria(method: Method, error_metric: ErrorMetric, max_error: f64) -> AcceptanceCriteria {
        AcceptanceCriteria {
            method,
            error_metric,
            max_error,
        }
    }

    /// Rows: good, 10% insufficient data, zero-length range, implausible base
    /// temperature, poor fit, missing error value.
    fn table() -> SeasonTable {
        let n = 6;
        SeasonTable::new(vec!["01234".to_string(); n], vec!["Heating 2012-2013".to_string(); n])
            .unwrap()
            .with_column(
                N_DAYS_INSUFFICIENT_DATA,
                vec![Some(1.0), Some(10.0), Some(0.0), Some(0.0), Some(0.0), Some(0.0)],
            )
            .unwrap()
            .with_column(
                N_DAYS_IN_SEASON_RANGE,
                vec![Some(100.0), Some(100.0), Some(0.0), Some(100.0), Some(100.0), Some(100.0)],
            )
            .unwrap()
            .with_column(
                "deltaT_base_est_dailyavgHDD",
                vec![Some(12.0), Some(12.0), Some(12.0), Some(60.0), Some(12.0), Some(12.0)],
            )
            .unwrap()
            .with_column(
                "cv_root_mean_sq_err_dailyavgHDD",
                vec![Some(0.2), Some(0.2), Some(0.2), Some(0.2), Some(0.9), None],
            )
            .unwrap()
    }

    #[test]
    fn test_validity_rules() {
        assert!(passes_validity_rules(Some(4.0), Some(100.0)));
        assert!(!passes_validity_rules(Some(5.0), Some(100.0)));
        assert!(!passes_validity_rules(Some(0.0), Some(0.0)));
        assert!(!passes_validity_rules(None, Some(100.0)));
        assert!(!passes_validity_rules(Some(0.0), None));
    }

    #[test]
    fn test_base_temperature_bounds_are_inclusive() {
        assert!(has_physical_base_temperature(Some(-10.0)));
        assert!(has_physical_base_temperature(Some(50.0)));
        assert!(!has_physical_base_temperature(Some(50.1)));
        assert!(!has_physical_base_temperature(Some(f64::NAN)));
        assert!(!has_physical_base_temperature(None));
    }

    #[test]
    fn test_fit_must_be_strictly_below_max() {
        assert!(has_good_enough_fit(Some(0.49), 0.5));
        assert!(!has_good_enough_fit(Some(0.5), 0.5));
        assert!(has_good_enough_fit(Some(1e9), f64::INFINITY));
        assert!(!has_good_enough_fit(Some(f64::NAN), f64::INFINITY));
    }

    #[test]
    fn test_accepted_rows() {
        let t = table();
        let c = criteria(Method::DailyAvg, ErrorMetric::Cvrmse, 0.5);
        let filter = RowAcceptanceFilter::new(&t, SeasonType::Heating, &c).unwrap();
        assert_eq!(filter.accepted_rows(&[0, 1, 2, 3, 4, 5]), vec![0]);
        assert_eq!(filter.accepted_rows(&[4, 0, 1]), vec![0]);
    }

    #[test]
    fn test_record_and_column_filter_agree() {
        let t = table();
        for max_error in [0.1, 0.5, 1.0, f64::INFINITY] {
            let c = criteria(Method::DailyAvg, ErrorMetric::Cvrmse, max_error);
            let filter = RowAcceptanceFilter::new(&t, SeasonType::Heating, &c).unwrap();
            for row in 0..t.len() {
                assert_eq!(c.accepts(&t.record(row), SeasonType::Heating).unwrap(), filter.accepts(row));
            }
        }
    }

    #[test]
    #[should_panic]
    fn test_accepted_rows_outside_table_panics() {
        let t = table();
        let c = criteria(Method::DailyAvg, ErrorMetric::Cvrmse, 0.5);
        RowAcceptanceFilter::new(&t, SeasonType::Heating, &c)
            .unwrap()
            .accepted_rows(&[t.len()]);
    }

    #[test]
    fn test_columns_follow_method_and_season() {
        let c = criteria(Method::HourlyAvg, ErrorMetric::Mape, 1.0);
        assert_eq!(c.base_temperature_column(SeasonType::Cooling), "deltaT_base_est_hourlyavgCDD");
        assert_eq!(c.error_column(SeasonType::Cooling), "mean_abs_pct_err_hourlyavgCDD");

        let c = criteria(Method::DeltaT, ErrorMetric::Rmse, 1.0);
        assert_eq!(c.base_temperature_column(SeasonType::Heating), "intercept_deltaT");
        assert_eq!(c.error_column(SeasonType::Heating), "root_mean_sq_err_deltaT");
        assert_eq!(c.error_column(SeasonType::Cooling), "root_mean_sq_err_deltaT");
    }

    #[test]
    fn test_missing_rule_column_is_an_error() {
        let t = table();
        let c = criteria(Method::DeltaT, ErrorMetric::Cvrmse, 1.0);
        assert!(matches!(
            RowAcceptanceFilter::new(&t, SeasonType::Heating, &c),
            Err(StatsError::MissingColumn(name)) if name == "intercept_deltaT"
        ));
        assert!(c.accepts(&t.record(0), SeasonType::Heating).is_err());
    }
}
