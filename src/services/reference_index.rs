//! Trait and types for zipcode reference lookups.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Latitude/longitude of a zipcode centroid. Stored on disk as `[lat, lng]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

impl From<LatLng> for (f64, f64) {
    fn from(point: LatLng) -> Self {
        (point.lat, point.lng)
    }
}

/// Read-only zipcode reference data, keyed by the same zipcodes as the
/// season records.
pub trait ReferenceIndex: Send + Sync {
    /// Every known zipcode with its location.
    fn zipcode_lat_lng(&self) -> Result<HashMap<String, LatLng>>;

    /// The weather station whose outdoor temperatures serve each zipcode.
    fn zipcode_station(&self) -> Result<HashMap<String, String>>;

    /// Every known zipcode.
    fn zipcodes(&self) -> Result<Vec<String>> {
        Ok(self.zipcode_lat_lng()?.into_keys().collect())
    }
}
