//! Builders for season tables in unit tests.

use std::collections::HashMap;

use crate::analyzers::filter::MAX_INSUFFICIENT_DATA_FRACTION;
use crate::schema::{ColumnKind, MetricFamily, N_DAYS_IN_SEASON_RANGE, N_DAYS_INSUFFICIENT_DATA, Schema};
use crate::season::SeasonTable;

/// One season row; any column not set explicitly gets a value that passes
/// every acceptance rule.
#[derive(Debug, Clone)]
pub struct SeasonRow {
    zipcode: String,
    season_name: String,
    values: HashMap<String, Option<f64>>,
}

impl SeasonRow {
    pub fn heating(zipcode: &str) -> Self {
        Self::new(zipcode, "Heating 2012-2013")
    }

    pub fn cooling(zipcode: &str) -> Self {
        Self::new(zipcode, "Cooling 2013")
    }

    fn new(zipcode: &str, season_name: &str) -> Self {
        Self {
            zipcode: zipcode.to_string(),
            season_name: season_name.to_string(),
            values: HashMap::new(),
        }
    }

    pub fn with(mut self, column: &str, value: f64) -> Self {
        self.values.insert(column.to_string(), Some(value));
        self
    }

    pub fn missing(mut self, column: &str) -> Self {
        self.values.insert(column.to_string(), None);
        self
    }

    fn value(&self, column: &str, kind: ColumnKind) -> Option<f64> {
        self.values
            .get(column)
            .copied()
            .unwrap_or_else(|| Some(default_value(column, kind)))
    }
}

fn default_value(column: &str, kind: ColumnKind) -> f64 {
    match kind {
        _ if column == N_DAYS_IN_SEASON_RANGE => 100.0,
        _ if column == N_DAYS_INSUFFICIENT_DATA => 100.0 * MAX_INSUFFICIENT_DATA_FRACTION / 2.0,
        ColumnKind::Family(MetricFamily::BaseTemperature, _) => 15.0,
        ColumnKind::Family(
            MetricFamily::MeanSqErr
            | MetricFamily::RootMeanSqErr
            | MetricFamily::CvRootMeanSqErr
            | MetricFamily::MeanAbsErr
            | MetricFamily::MeanAbsPctErr,
            _,
        ) => 0.1,
        _ => 1.0,
    }
}

/// Builds a table carrying every registered column.
pub fn season_table(rows: &[SeasonRow]) -> SeasonTable {
    season_table_where(rows, |_| true)
}

/// Like [`season_table`], but without `column`.
pub fn season_table_without(rows: &[SeasonRow], column: &str) -> SeasonTable {
    season_table_where(rows, |name| name != column)
}

/// Like [`season_table`], with only the registered columns `keep` accepts.
pub fn season_table_where(rows: &[SeasonRow], keep: impl Fn(&str) -> bool) -> SeasonTable {
    let mut table = SeasonTable::new(
        rows.iter().map(|r| r.zipcode.clone()).collect(),
        rows.iter().map(|r| r.season_name.clone()).collect(),
    )
    .unwrap();

    for spec in Schema::global().columns() {
        if keep(spec.name()) {
            let values = rows.iter().map(|r| r.value(spec.name(), spec.kind())).collect();
            table = table.with_column(spec.name(), values).unwrap();
        }
    }
    table
}
