//! Registry of the real- or integer-valued season metric columns.
//!
//! Method-specific columns are generated from the cross product of
//! [`MetricFamily`] x [`Method`] x [`SeasonType`], so the heating, cooling,
//! and combined column sets agree by construction. [`Schema::column`] resolves
//! a `(family, method, season)` triple to its column name without any string
//! dispatch at the call site.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::Serialize;

use crate::error::ConfigError;

/// Heating or cooling season, derived from the free-text season name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonType {
    Heating,
    Cooling,
}

impl SeasonType {
    /// Season types in output order.
    pub const ALL: [SeasonType; 2] = [SeasonType::Heating, SeasonType::Cooling];

    pub fn as_str(self) -> &'static str {
        match self {
            SeasonType::Heating => "heating",
            SeasonType::Cooling => "cooling",
        }
    }

    /// Returns `true` if `season_name` (e.g. `"Heating 2012-2013"`) names a
    /// season of this type.
    pub fn matches(self, season_name: &str) -> bool {
        let discriminator = match self {
            SeasonType::Heating => "Heating",
            SeasonType::Cooling => "Cooling",
        };
        season_name.contains(discriminator)
    }

    fn degree_day_suffix(self) -> &'static str {
        match self {
            SeasonType::Heating => "HDD",
            SeasonType::Cooling => "CDD",
        }
    }
}

impl fmt::Display for SeasonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estimation method a metric was computed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Method {
    #[serde(rename = "dailyavg")]
    DailyAvg,
    #[serde(rename = "hourlyavg")]
    HourlyAvg,
    #[serde(rename = "deltaT")]
    DeltaT,
}

impl Method {
    pub const ALL: [Method; 3] = [Method::DailyAvg, Method::HourlyAvg, Method::DeltaT];

    pub fn as_str(self) -> &'static str {
        match self {
            Method::DailyAvg => "dailyavg",
            Method::HourlyAvg => "hourlyavg",
            Method::DeltaT => "deltaT",
        }
    }

    /// Column suffix for this method: `dailyavgHDD`, `hourlyavgCDD`, ... or
    /// `deltaT`, which is shared by both season types.
    pub fn suffix(self, season: SeasonType) -> String {
        match self {
            Method::DeltaT => self.as_str().to_string(),
            _ => format!("{}{}", self.as_str(), season.degree_day_suffix()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownMethod(s.to_string()))
    }
}

/// Error metric used for the fit-quality acceptance rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ErrorMetric {
    Mse,
    Rmse,
    Cvrmse,
    Mae,
    Mape,
}

impl ErrorMetric {
    pub const ALL: [ErrorMetric; 5] = [
        ErrorMetric::Mse,
        ErrorMetric::Rmse,
        ErrorMetric::Cvrmse,
        ErrorMetric::Mae,
        ErrorMetric::Mape,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorMetric::Mse => "MSE",
            ErrorMetric::Rmse => "RMSE",
            ErrorMetric::Cvrmse => "CVRMSE",
            ErrorMetric::Mae => "MAE",
            ErrorMetric::Mape => "MAPE",
        }
    }

    /// The column family holding this metric.
    pub fn family(self) -> MetricFamily {
        match self {
            ErrorMetric::Mse => MetricFamily::MeanSqErr,
            ErrorMetric::Rmse => MetricFamily::RootMeanSqErr,
            ErrorMetric::Cvrmse => MetricFamily::CvRootMeanSqErr,
            ErrorMetric::Mae => MetricFamily::MeanAbsErr,
            ErrorMetric::Mape => MetricFamily::MeanAbsPctErr,
        }
    }
}

impl fmt::Display for ErrorMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorMetric {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorMetric::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownErrorMetric(s.to_string()))
    }
}

/// A family of columns that exists once per method (and per season type for
/// the degree-day methods).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricFamily {
    SeasonalSavings,
    SeasonalAvoidedRuntime,
    BaselineDailyRuntime,
    BaselineSeasonalRuntime,
    MeanDemand,
    MeanDemandBaseline,
    /// Demand slope: `alpha_est_*`, or `slope_deltaT` for the deltaT model.
    Alpha,
    /// Base temperature estimate: `deltaT_base_est_*`, or `intercept_deltaT`.
    BaseTemperature,
    MeanSqErr,
    RootMeanSqErr,
    CvRootMeanSqErr,
    MeanAbsErr,
    MeanAbsPctErr,
}

impl MetricFamily {
    pub const ALL: [MetricFamily; 13] = [
        MetricFamily::SeasonalSavings,
        MetricFamily::SeasonalAvoidedRuntime,
        MetricFamily::BaselineDailyRuntime,
        MetricFamily::BaselineSeasonalRuntime,
        MetricFamily::MeanDemand,
        MetricFamily::MeanDemandBaseline,
        MetricFamily::Alpha,
        MetricFamily::BaseTemperature,
        MetricFamily::MeanSqErr,
        MetricFamily::RootMeanSqErr,
        MetricFamily::CvRootMeanSqErr,
        MetricFamily::MeanAbsErr,
        MetricFamily::MeanAbsPctErr,
    ];

    fn prefix(self) -> &'static str {
        match self {
            MetricFamily::SeasonalSavings => "seasonal_savings",
            MetricFamily::SeasonalAvoidedRuntime => "seasonal_avoided_runtime",
            MetricFamily::BaselineDailyRuntime => "baseline_daily_runtime",
            MetricFamily::BaselineSeasonalRuntime => "baseline_seasonal_runtime",
            MetricFamily::MeanDemand => "mean_demand",
            MetricFamily::MeanDemandBaseline => "mean_demand_baseline",
            MetricFamily::Alpha => "alpha_est",
            MetricFamily::BaseTemperature => "deltaT_base_est",
            MetricFamily::MeanSqErr => "mean_sq_err",
            MetricFamily::RootMeanSqErr => "root_mean_sq_err",
            MetricFamily::CvRootMeanSqErr => "cv_root_mean_sq_err",
            MetricFamily::MeanAbsErr => "mean_abs_err",
            MetricFamily::MeanAbsPctErr => "mean_abs_pct_err",
        }
    }

    /// The deltaT model names its regression parameters on their own.
    fn delta_t_column(self) -> Option<&'static str> {
        match self {
            MetricFamily::Alpha => Some("slope_deltaT"),
            MetricFamily::BaseTemperature => Some("intercept_deltaT"),
            _ => None,
        }
    }

    fn column_name(self, method: Method, season: SeasonType) -> String {
        match (method, self.delta_t_column()) {
            (Method::DeltaT, Some(name)) => name.to_string(),
            _ => format!("{}_{}", self.prefix(), method.suffix(season)),
        }
    }
}

/// What a registered column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Method-independent: day counts, runtimes, RHU buckets, ...
    Common,
    Family(MetricFamily, Method),
}

/// One registered metric column.
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    name: String,
    heating: bool,
    cooling: bool,
    kind: ColumnKind,
}

impl ColumnSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    pub fn applies_to(&self, season: SeasonType) -> bool {
        match season {
            SeasonType::Heating => self.heating,
            SeasonType::Cooling => self.cooling,
        }
    }
}

#[derive(Clone, Copy)]
enum Seasons {
    Both,
    Heating,
    Cooling,
}

enum Block {
    Common(&'static str, Seasons),
    Family(MetricFamily),
    RhuBuckets,
}

/// Canonical column order, used for export.
const LAYOUT: &[Block] = &[
    Block::Common("n_days_in_season_range", Seasons::Both),
    Block::Common("n_days_in_season", Seasons::Both),
    Block::Common("n_days_both_heating_and_cooling", Seasons::Both),
    Block::Common("n_days_insufficient_data", Seasons::Both),
    Block::Family(MetricFamily::SeasonalSavings),
    Block::Family(MetricFamily::SeasonalAvoidedRuntime),
    Block::Common("total_auxiliary_heating_runtime", Seasons::Heating),
    Block::Common("total_cooling_runtime", Seasons::Cooling),
    Block::Common("total_emergency_heating_runtime", Seasons::Heating),
    Block::Common("total_heating_runtime", Seasons::Heating),
    Block::Common("actual_daily_runtime", Seasons::Both),
    Block::Common("actual_seasonal_runtime", Seasons::Both),
    Block::Common("baseline_comfort_temperature", Seasons::Both),
    Block::Family(MetricFamily::BaselineDailyRuntime),
    Block::Family(MetricFamily::BaselineSeasonalRuntime),
    Block::Family(MetricFamily::MeanDemand),
    Block::Family(MetricFamily::MeanDemandBaseline),
    Block::RhuBuckets,
    Block::Family(MetricFamily::Alpha),
    Block::Family(MetricFamily::BaseTemperature),
    Block::Family(MetricFamily::MeanSqErr),
    Block::Family(MetricFamily::RootMeanSqErr),
    Block::Family(MetricFamily::CvRootMeanSqErr),
    Block::Family(MetricFamily::MeanAbsErr),
    Block::Family(MetricFamily::MeanAbsPctErr),
];

/// Relative heating usage is bucketed in 5F steps from 0F to 60F.
const RHU_BUCKETS: u32 = 12;

pub const N_DAYS_IN_SEASON_RANGE: &str = "n_days_in_season_range";
pub const N_DAYS_INSUFFICIENT_DATA: &str = "n_days_insufficient_data";

static SCHEMA: LazyLock<Schema> = LazyLock::new(Schema::build);

/// The column registry, built once.
#[derive(Debug)]
pub struct Schema {
    columns: Vec<ColumnSpec>,
    by_name: HashMap<String, usize>,
    by_family: HashMap<(MetricFamily, Method, SeasonType), usize>,
}

impl Schema {
    pub fn global() -> &'static Schema {
        &SCHEMA
    }

    fn build() -> Self {
        let mut columns = Vec::new();

        for block in LAYOUT {
            match *block {
                Block::Common(name, seasons) => {
                    let (heating, cooling) = match seasons {
                        Seasons::Both => (true, true),
                        Seasons::Heating => (true, false),
                        Seasons::Cooling => (false, true),
                    };
                    columns.push(ColumnSpec {
                        name: name.to_string(),
                        heating,
                        cooling,
                        kind: ColumnKind::Common,
                    });
                }
                Block::RhuBuckets => {
                    for bucket in 0..RHU_BUCKETS {
                        columns.push(ColumnSpec {
                            name: format!("rhu_{:02}F_to_{:02}F", bucket * 5, bucket * 5 + 5),
                            heating: true,
                            cooling: false,
                            kind: ColumnKind::Common,
                        });
                    }
                }
                Block::Family(family) => {
                    let variant = |method: Method, season: Option<SeasonType>| ColumnSpec {
                        name: family.column_name(method, season.unwrap_or(SeasonType::Heating)),
                        heating: season != Some(SeasonType::Cooling),
                        cooling: season != Some(SeasonType::Heating),
                        kind: ColumnKind::Family(family, method),
                    };
                    let delta_t = variant(Method::DeltaT, None);
                    let leads = family.delta_t_column().is_some();

                    if leads {
                        columns.push(delta_t.clone());
                    }
                    columns.push(variant(Method::DailyAvg, Some(SeasonType::Cooling)));
                    columns.push(variant(Method::DailyAvg, Some(SeasonType::Heating)));
                    if !leads {
                        columns.push(delta_t);
                    }
                    columns.push(variant(Method::HourlyAvg, Some(SeasonType::Cooling)));
                    columns.push(variant(Method::HourlyAvg, Some(SeasonType::Heating)));
                }
            }
        }

        let by_name = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.clone(), i))
            .collect();

        let mut by_family = HashMap::new();
        for (i, column) in columns.iter().enumerate() {
            if let ColumnKind::Family(family, method) = column.kind {
                for season in SeasonType::ALL {
                    if column.applies_to(season) {
                        by_family.insert((family, method, season), i);
                    }
                }
            }
        }

        Schema {
            columns,
            by_name,
            by_family,
        }
    }

    /// Every registered column, heating and cooling, in canonical order.
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// The columns tracked for `season`, in canonical order.
    pub fn season_columns(&self, season: SeasonType) -> impl Iterator<Item = &ColumnSpec> + '_ {
        self.columns.iter().filter(move |c| c.applies_to(season))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Resolves a family/method/season combination to its column name.
    pub fn column(&self, family: MetricFamily, method: Method, season: SeasonType) -> &str {
        // `build` registers every (family, method, season) combination.
        &self.columns[self.by_family[&(family, method, season)]].name
    }
}
