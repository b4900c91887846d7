//! CSV loader for per-season thermostat metric rows.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use tracing::debug;

use crate::error::{Result, StatsError};
use crate::schema::Schema;
use crate::season::SeasonTable;

pub const ZIPCODE: &str = "zipcode";
pub const SEASON_NAME: &str = "season_name";

/// Parses season rows from CSV with a header row.
///
/// `zipcode` and `season_name` are required. Columns known to the [`Schema`]
/// are parsed as numbers (empty cells are missing); all other columns, such as
/// `ct_identifier` or `equipment_type`, are ignored.
///
/// # Errors
///
/// Returns [`StatsError::MissingColumn`] when a key column is absent and
/// [`StatsError::InvalidValue`] for a non-numeric metric cell.
pub fn parse_seasons<R: Read>(reader: R) -> Result<SeasonTable> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();

    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| StatsError::MissingColumn(name.to_string()))
    };
    let zipcode_idx = position(ZIPCODE)?;
    let season_name_idx = position(SEASON_NAME)?;

    let schema = Schema::global();
    let metric_columns: Vec<(usize, &str)> = headers
        .iter()
        .enumerate()
        .filter(|(_, name)| schema.contains(name))
        .collect();

    let mut zipcodes = Vec::new();
    let mut season_names = Vec::new();
    let mut metrics: Vec<Vec<Option<f64>>> = vec![Vec::new(); metric_columns.len()];

    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        zipcodes.push(record.get(zipcode_idx).unwrap_or_default().to_string());
        season_names.push(record.get(season_name_idx).unwrap_or_default().to_string());

        for (&(idx, name), values) in metric_columns.iter().zip(metrics.iter_mut()) {
            values.push(parse_cell(record.get(idx).unwrap_or_default(), name, row)?);
        }
    }

    debug!(
        rows = zipcodes.len(),
        metric_columns = metric_columns.len(),
        "Parsed season rows"
    );

    let mut table = SeasonTable::new(zipcodes, season_names)?;
    for ((_, name), values) in metric_columns.into_iter().zip(metrics) {
        table = table.with_column(name, values)?;
    }
    Ok(table)
}

fn parse_cell(raw: &str, column: &str, row: usize) -> Result<Option<f64>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(Some)
        .map_err(|_| StatsError::InvalidValue {
            column: column.to_string(),
            row,
            value: raw.to_string(),
        })
}

/// Loads season rows from a CSV file, gunzipping paths that end in `.gz`.
#[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn read_seasons(path: impl AsRef<Path>) -> Result<SeasonTable> {
    let path = path.as_ref();
    let file = File::open(path)?;

    if is_gzip(path) {
        parse_seasons(GzDecoder::new(file))
    } else {
        parse_seasons(file)
    }
}

/// Loads and combines several season files, e.g. the outputs of separate batches.
pub fn read_all_seasons<P: AsRef<Path>>(paths: &[P]) -> Result<SeasonTable> {
    let tables = paths
        .iter()
        .map(|path| read_seasons(path))
        .collect::<Result<Vec<_>>>()?;
    Ok(SeasonTable::concat(tables))
}

pub(crate) fn is_gzip(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("gz")
}
