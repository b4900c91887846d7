//! Zipcode -> group mappings used to partition season records.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::{ConfigError, Result};
use crate::season::SeasonTable;

#[derive(Debug, Deserialize)]
struct GroupRow {
    zipcode: String,
    group: String,
}

/// Maps zipcodes to group labels.
///
/// Zipcodes absent from the mapping are dropped from every group; the mapping
/// may list zipcodes that never occur in the data. Loaded from a CSV file with
/// `zipcode` and `group` columns:
///
/// ```text
/// zipcode,group
/// 01234,group_a
/// 12345,group_a
/// 43210,group_b
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupMapping {
    spec: HashMap<String, String>,
    label: Option<String>,
}

impl GroupMapping {
    pub fn from_map(spec: HashMap<String, String>) -> Self {
        Self { spec, label: None }
    }

    /// Maps every key to itself, giving one group per zipcode.
    pub fn identity(keys: impl IntoIterator<Item = String>) -> Self {
        Self::from_map(keys.into_iter().map(|k| (k.clone(), k)).collect())
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let spec = rdr
            .deserialize::<GroupRow>()
            .map(|row| row.map(|r| (r.zipcode, r.group)))
            .collect::<Result<HashMap<_, _>, csv::Error>>()?;
        Ok(Self::from_map(spec))
    }

    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_reader(File::open(path)?)
    }

    /// Builds a mapping from a CSV file if given, else from `dictionary`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingGroupSource`] when neither is supplied.
    pub fn resolve(filepath: Option<&Path>, dictionary: Option<HashMap<String, String>>) -> Result<Self> {
        match (filepath, dictionary) {
            (Some(path), _) => Self::from_csv(path),
            (None, Some(dictionary)) => Ok(Self::from_map(dictionary)),
            (None, None) => Err(ConfigError::MissingGroupSource.into()),
        }
    }

    /// Adds a suffix to every group label (`"{group}_{label}"`), to tell apart
    /// several groupings of the same zipcodes.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn get(&self, zipcode: &str) -> Option<&str> {
        self.spec.get(zipcode).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.spec.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spec.is_empty()
    }

    fn group_name(&self, group: &str) -> String {
        match &self.label {
            Some(label) => format!("{}_{}", group, label),
            None => group.to_string(),
        }
    }

    /// Splits `table` into `(group label, records)` pairs, in no particular order.
    ///
    /// Each subset is an independent copy of the matching rows.
    pub fn groups<'a>(&'a self, table: &'a SeasonTable) -> impl Iterator<Item = (String, SeasonTable)> + 'a {
        let mut rows_by_group: HashMap<&str, Vec<usize>> = HashMap::new();
        for (row, zipcode) in table.zipcodes().iter().enumerate() {
            if let Some(group) = self.get(zipcode) {
                rows_by_group.entry(group).or_default().push(row);
            }
        }

        rows_by_group
            .into_iter()
            .map(move |(group, rows)| (self.group_name(group), table.select(&rows)))
    }
}
