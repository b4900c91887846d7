use rayon::prelude::*;
use tracing::info;

use crate::analyzers::summary::compute_summary_statistics;
use crate::analyzers::types::Summary;
use crate::config::SummaryConfig;
use crate::error::Result;
use crate::grouping::GroupMapping;
use crate::season::SeasonTable;
use crate::services::reference_index::ReferenceIndex;

/// Computes summary statistics for every group of `mapping`.
///
/// Groups are summarised independently on the rayon pool. Their order in the
/// output is unspecified; within a group, heating precedes cooling. Records
/// whose zipcode is not mapped are ignored.
#[tracing::instrument(skip_all, fields(rows = table.len(), mapped_zipcodes = mapping.len()))]
pub fn compute_summary_statistics_by_group(
    table: &SeasonTable,
    mapping: &GroupMapping,
    config: &SummaryConfig,
) -> Result<Summary> {
    config.validate()?;

    let groups: Vec<(String, SeasonTable)> = mapping.groups(table).collect();
    info!(groups = groups.len(), "Computing grouped summary statistics");

    let summaries = groups
        .par_iter()
        .map(|(label, subset)| compute_summary_statistics(subset, label, config))
        .collect::<Result<Vec<_>>>()?;

    let mut combined = Summary::default();
    for summary in summaries {
        combined.extend(summary);
    }

    info!(
        records = combined.records.len(),
        warnings = combined.warnings.len(),
        "Grouped summary statistics complete"
    );
    Ok(combined)
}

/// Summary statistics per zipcode, over every zipcode the reference index knows.
pub fn compute_summary_statistics_by_zipcode(
    table: &SeasonTable,
    index: &dyn ReferenceIndex,
    config: &SummaryConfig,
) -> Result<Summary> {
    let mapping = GroupMapping::identity(index.zipcodes()?);
    compute_summary_statistics_by_group(table, &mapping, config)
}

/// Summary statistics per weather station, using the same zipcode -> station
/// mapping that selected each thermostat's outdoor temperature data.
pub fn compute_summary_statistics_by_weather_station(
    table: &SeasonTable,
    index: &dyn ReferenceIndex,
    config: &SummaryConfig,
) -> Result<Summary> {
    let mapping = GroupMapping::from_map(index.zipcode_station()?);
    compute_summary_statistics_by_group(table, &mapping, config)
}
