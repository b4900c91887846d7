//! Summary configuration: acceptance thresholds and statistical power target.

use serde::Serialize;

use crate::error::ConfigError;
use crate::schema::{ErrorMetric, Method};

/// Parameters shared by every summary computation in a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryConfig {
    /// Method whose columns drive filtering and the power estimate.
    pub method: Method,
    /// Error metric for the fit-quality rule.
    pub error_metric: ErrorMetric,
    /// Seasons whose error metric is not strictly below this are discarded.
    pub max_error: f64,
    /// Confidence level of the statistical power estimate.
    pub confidence: f64,
    /// Desired confidence interval half-width as a fraction of the mean.
    pub ratio: f64,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            method: Method::DailyAvg,
            error_metric: ErrorMetric::Cvrmse,
            max_error: f64::INFINITY,
            confidence: 0.95,
            ratio: 0.05,
        }
    }
}

impl SummaryConfig {
    /// Builds a config from method and error metric names, keeping the other defaults.
    pub fn from_names(method: &str, error_metric: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            method: method.parse()?,
            error_metric: error_metric.parse()?,
            ..Self::default()
        })
    }

    pub fn with_max_error(mut self, max_error: f64) -> Self {
        self.max_error = max_error;
        self
    }

    pub fn with_power_target(mut self, confidence: f64, ratio: f64) -> Self {
        self.confidence = confidence;
        self.ratio = ratio;
        self
    }

    /// Checks the values the type system cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(ConfigError::InvalidConfidence(self.confidence));
        }
        Ok(())
    }
}
