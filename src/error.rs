//! Error types for loading, filtering, and summarising season records.

/// Invalid or missing configuration. Raised by the call that received the
/// bad argument, before any statistics are computed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error(r#"method `{0}` not supported; use one of "dailyavg", "hourlyavg", or "deltaT""#)]
    UnknownMethod(String),

    #[error(r#"error metric `{0}` not supported; use one of "MSE", "RMSE", "CVRMSE", "MAE", or "MAPE""#)]
    UnknownErrorMetric(String),

    #[error("supply either the path of a zipcode/group CSV file or a zipcode -> group mapping")]
    MissingGroupSource,

    #[error("no path configured for the {0} reference index")]
    MissingReferenceIndex(&'static str),

    #[error("statistical power confidence must lie strictly between 0 and 1, got {0}")]
    InvalidConfidence(f64),
}

/// Errors raised while building or summarising a season record set.
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("column `{0}` is absent from the season records")]
    MissingColumn(String),

    #[error("column `{column}` has {actual} values, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("column `{column}`, row {row}: cannot parse `{value}` as a number")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = StatsError> = std::result::Result<T, E>;
