//! Export of summary statistics.
//!
//! Writes a fixed-column CSV (optionally gzipped) and a JSON report.

use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::types::{ColumnStats, DECILES, SummaryStatRecord};
use crate::config::SummaryConfig;
use crate::error::Result;
use crate::parser::is_gzip;
use crate::schema::Schema;

/// Leading columns of every export, before the per-metric columns.
pub const IDENTITY_COLUMNS: [&str; 5] = [
    "label",
    "n_seasons_total",
    "n_seasons_kept",
    "n_seasons_discarded",
    "n_enough_statistical_power",
];

/// Statistic columns emitted per metric column, in order.
const STATS_PER_COLUMN: usize = 3 + DECILES.len();

/// The export header: identity columns, then for every registered metric
/// column `_mean`, `_sem`, `_n`, `_q10` .. `_q90`.
///
/// Identical for every export, whatever season types are present.
pub fn export_columns() -> Vec<String> {
    let schema = Schema::global();
    let mut columns: Vec<String> = IDENTITY_COLUMNS.iter().map(|c| c.to_string()).collect();
    columns.reserve(schema.columns().len() * STATS_PER_COLUMN);

    for spec in schema.columns() {
        let name = spec.name();
        columns.push(format!("{name}_mean"));
        columns.push(format!("{name}_sem"));
        columns.push(format!("{name}_n"));
        columns.extend(DECILES.iter().map(|q| format!("{name}_q{q}")));
    }
    columns
}

/// Flat, all-text rendering of stat records. Empty cells mark columns that do
/// not apply to a row's season type.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl StatsTable {
    pub fn from_records(records: &[SummaryStatRecord]) -> Self {
        Self {
            columns: export_columns(),
            rows: records.iter().map(export_row).collect(),
        }
    }

    /// Cell at `row` in the named column.
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row).map(|r| r[idx].as_str())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r[0].as_str())
    }

    pub fn write<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = WriterBuilder::new().from_writer(writer);
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn export_row(record: &SummaryStatRecord) -> Vec<String> {
    let by_column: HashMap<&str, &ColumnStats> = record
        .columns
        .iter()
        .map(|c| (c.column, &c.stats))
        .collect();

    let schema = Schema::global();
    let mut row = Vec::with_capacity(IDENTITY_COLUMNS.len() + schema.columns().len() * STATS_PER_COLUMN);
    row.push(record.label.clone());
    row.push(record.n_seasons_total.to_string());
    row.push(record.n_seasons_kept.to_string());
    row.push(record.n_seasons_discarded.to_string());
    row.push(record.n_enough_statistical_power.to_string());

    for spec in schema.columns() {
        match by_column.get(spec.name()) {
            Some(stats) => {
                row.push(stats.mean.to_string());
                row.push(stats.sem.to_string());
                row.push(stats.n.to_string());
                row.extend(stats.deciles.iter().map(f64::to_string));
            }
            None => row.extend(std::iter::repeat_n(String::new(), STATS_PER_COLUMN)),
        }
    }
    row
}

/// Writes stat records to a CSV file at `path` (gzipped if it ends in `.gz`)
/// and returns the exported table.
#[tracing::instrument(skip(records, path), fields(records = records.len(), path = %path.as_ref().display()))]
pub fn summary_statistics_to_csv(records: &[SummaryStatRecord], path: impl AsRef<Path>) -> Result<StatsTable> {
    let path = path.as_ref();
    let table = StatsTable::from_records(records);
    let file = File::create(path)?;

    if is_gzip(path) {
        let mut encoder = GzEncoder::new(file, Compression::default());
        table.write(&mut encoder)?;
        encoder.finish()?;
    } else {
        table.write(file)?;
    }

    info!(rows = table.rows.len(), columns = table.columns.len(), "Summary statistics written");
    Ok(table)
}

#[derive(Serialize)]
struct SummaryReport<'a> {
    generated_at: DateTime<Utc>,
    config: &'a SummaryConfig,
    stats: &'a [SummaryStatRecord],
}

/// Writes stat records with the effective config as pretty-printed JSON.
///
/// Non-finite values are written as `null`.
pub fn write_json(records: &[SummaryStatRecord], config: &SummaryConfig, path: impl AsRef<Path>) -> Result<()> {
    let report = SummaryReport {
        generated_at: Utc::now(),
        config,
        stats: records,
    };
    let path = path.as_ref();
    debug!(path = %path.display(), records = records.len(), "Writing JSON report");
    std::fs::write(path, serde_json::to_vec_pretty(&report)?)?;
    Ok(())
}
