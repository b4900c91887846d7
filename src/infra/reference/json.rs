use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::debug;

use super::{LAT_LNG_INDEX_ENV, STATION_INDEX_ENV};
use crate::error::{ConfigError, Result};
use crate::services::reference_index::{LatLng, ReferenceIndex};

/// Reads the reference indexes from JSON files, e.g.
///
/// ```json
/// { "01234": [42.36, -71.06], "12345": [42.81, -73.94] }
/// ```
///
/// and
///
/// ```json
/// { "01234": "725090", "12345": "725180" }
/// ```
///
/// Files are read on each call; the convenience drivers call each lookup once.
#[derive(Debug, Clone, Default)]
pub struct JsonReferenceIndex {
    lat_lng_path: Option<PathBuf>,
    station_path: Option<PathBuf>,
}

impl JsonReferenceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes index paths from `ZIPCODE_LAT_LNG_INDEX` / `ZIPCODE_STATION_INDEX`.
    pub fn from_env() -> Self {
        Self {
            lat_lng_path: std::env::var_os(LAT_LNG_INDEX_ENV).map(PathBuf::from),
            station_path: std::env::var_os(STATION_INDEX_ENV).map(PathBuf::from),
        }
    }

    pub fn with_lat_lng_index(mut self, path: impl Into<PathBuf>) -> Self {
        self.lat_lng_path = Some(path.into());
        self
    }

    pub fn with_station_index(mut self, path: impl Into<PathBuf>) -> Self {
        self.station_path = Some(path.into());
        self
    }
}

fn load<T: DeserializeOwned>(path: Option<&Path>, index: &'static str) -> Result<T> {
    let path = path.ok_or(ConfigError::MissingReferenceIndex(index))?;
    debug!(index, path = %path.display(), "Loading reference index");
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

impl ReferenceIndex for JsonReferenceIndex {
    fn zipcode_lat_lng(&self) -> Result<HashMap<String, LatLng>> {
        load(self.lat_lng_path.as_deref(), "zipcode lat/lng")
    }

    fn zipcode_station(&self) -> Result<HashMap<String, String>> {
        load(self.station_path.as_deref(), "zipcode station")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StatsError;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    #[test]
    fn test_load_lat_lng_index() {
        let path = temp_path("thermostat_stats_test_lat_lng.json");
        fs::write(&path, r#"{"01234": [42.36, -71.06], "12345": [42.81, -73.94]}"#).unwrap();

        let index = JsonReferenceIndex::new().with_lat_lng_index(&path);
        let lat_lng = index.zipcode_lat_lng().unwrap();
        assert_eq!(lat_lng["01234"], LatLng { lat: 42.36, lng: -71.06 });

        let mut zipcodes = index.zipcodes().unwrap();
        zipcodes.sort();
        assert_eq!(zipcodes, vec!["01234", "12345"]);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_station_index() {
        let path = temp_path("thermostat_stats_test_station.json");
        fs::write(&path, r#"{"01234": "725090"}"#).unwrap();

        let index = JsonReferenceIndex::new().with_station_index(&path);
        assert_eq!(index.zipcode_station().unwrap()["01234"], "725090");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_unconfigured_index_is_a_config_error() {
        let index = JsonReferenceIndex::new();
        assert!(matches!(
            index.zipcode_station(),
            Err(StatsError::Config(ConfigError::MissingReferenceIndex(_)))
        ));
    }
}
