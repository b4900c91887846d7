pub mod analyzers;
pub mod config;
pub mod error;
pub mod grouping;
pub mod infra;
pub mod output;
pub mod parser;
pub mod schema;
pub mod season;
pub mod services;

#[cfg(test)]
pub(crate) mod test_support;

pub use analyzers::aggregate::{
    compute_summary_statistics_by_group, compute_summary_statistics_by_weather_station,
    compute_summary_statistics_by_zipcode,
};
pub use analyzers::summary::compute_summary_statistics;
pub use analyzers::types::{Summary, SummaryStatRecord};
pub use config::SummaryConfig;
pub use error::{ConfigError, StatsError};
pub use grouping::GroupMapping;
pub use season::SeasonTable;
