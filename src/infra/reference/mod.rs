//! Zipcode reference data.
//!
//! [`JsonReferenceIndex`] implements [`ReferenceIndex`](crate::services::reference_index::ReferenceIndex)
//! from two JSON objects on disk: zipcode -> `[lat, lng]` and zipcode -> station.

mod json;

pub use json::JsonReferenceIndex;

/// Environment variable naming the zipcode -> `[lat, lng]` index file.
pub const LAT_LNG_INDEX_ENV: &str = "ZIPCODE_LAT_LNG_INDEX";
/// Environment variable naming the zipcode -> station index file.
pub const STATION_INDEX_ENV: &str = "ZIPCODE_STATION_INDEX";
