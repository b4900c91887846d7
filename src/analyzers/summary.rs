//! Summary statistics for one set of season records.

use tracing::{debug, warn};

use crate::analyzers::filter::{AcceptanceCriteria, RowAcceptanceFilter};
use crate::analyzers::power::statistical_power_estimate;
use crate::analyzers::types::{ColumnStats, ColumnSummary, EmptySeasonWarning, Summary, SummaryStatRecord};
use crate::config::SummaryConfig;
use crate::error::Result;
use crate::schema::{MetricFamily, Schema, SeasonType};
use crate::season::SeasonTable;

enum SeasonOutcome {
    Computed(SummaryStatRecord),
    Empty(EmptySeasonWarning),
}

/// Computes heating and cooling summary statistics for `table`.
///
/// For each season type, the matching seasons are filtered with the
/// acceptance rules and every tracked column of the kept seasons is
/// summarised (mean, standard error, count, deciles), along with the sample
/// size needed for statistical power on the method's seasonal savings.
///
/// A season type with no kept seasons is left out of `records` and reported
/// in `warnings` instead. Heating always precedes cooling.
///
/// # Errors
///
/// [`StatsError::Config`](crate::error::StatsError::Config) for an invalid
/// config and [`StatsError::MissingColumn`](crate::error::StatsError::MissingColumn)
/// when a referenced column is absent.
#[tracing::instrument(skip(table, config), fields(rows = table.len()))]
pub fn compute_summary_statistics(table: &SeasonTable, label: &str, config: &SummaryConfig) -> Result<Summary> {
    config.validate()?;

    let mut summary = Summary::default();
    for season in SeasonType::ALL {
        match season_type_stats(table, label, season, config)? {
            SeasonOutcome::Computed(record) => summary.records.push(record),
            SeasonOutcome::Empty(warning) => {
                warn!(label, season = %season, total = warning.n_seasons_total, "{}", warning);
                summary.warnings.push(warning);
            }
        }
    }
    Ok(summary)
}

fn season_type_stats(
    table: &SeasonTable,
    label: &str,
    season: SeasonType,
    config: &SummaryConfig,
) -> Result<SeasonOutcome> {
    let season_rows = table.rows_of(season);
    let n_seasons_total = season_rows.len();
    let empty = || {
        SeasonOutcome::Empty(EmptySeasonWarning {
            label: label.to_string(),
            season_type: season,
            n_seasons_total,
        })
    };

    // Columns of a season type are only required when it has seasons.
    if season_rows.is_empty() {
        return Ok(empty());
    }

    let criteria = AcceptanceCriteria::from(config);
    let kept = RowAcceptanceFilter::new(table, season, &criteria)?.accepted_rows(&season_rows);

    let n_seasons_kept = kept.len();
    let season_label = format!("{}_{}", label, season);

    debug!(
        label = %season_label,
        n_seasons_total,
        n_seasons_kept,
        "Filtered seasons"
    );

    if kept.is_empty() {
        return Ok(empty());
    }

    let schema = Schema::global();
    let columns = schema
        .season_columns(season)
        .map(|spec| {
            let values = table.column(spec.name())?;
            Ok(ColumnSummary {
                column: spec.name(),
                stats: ColumnStats::from_values(kept.iter().map(|&row| values[row])),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut record = SummaryStatRecord {
        label: season_label,
        season_type: season,
        n_seasons_total,
        n_seasons_kept,
        n_seasons_discarded: n_seasons_total - n_seasons_kept,
        n_enough_statistical_power: f64::NAN,
        columns,
    };

    let savings_column = schema.column(MetricFamily::SeasonalSavings, config.method, season);
    if let Some(savings) = record.column(savings_column) {
        record.n_enough_statistical_power =
            statistical_power_estimate(savings, config.confidence, config.ratio);
    }

    Ok(SeasonOutcome::Computed(record))
}
