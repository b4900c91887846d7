//! Season filtering and summary statistics.
//!
//! Season records are filtered with acceptance rules, each tracked metric
//! column is summarised, and a statistical power estimate is attached per
//! group and season type.

pub mod aggregate;
pub mod filter;
pub mod power;
pub mod summary;
pub mod types;
pub mod utility;
