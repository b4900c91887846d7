//! Columnar set of per-season metric rows.
//!
//! Each row is one heating or cooling season for one thermostat. Rows are
//! identified only by position; missing cells are `None`.

use std::collections::HashMap;

use crate::error::{Result, StatsError};
use crate::schema::SeasonType;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeasonTable {
    zipcodes: Vec<String>,
    season_names: Vec<String>,
    columns: HashMap<String, Vec<Option<f64>>>,
}

impl SeasonTable {
    /// Creates a table from its two key columns.
    pub fn new(zipcodes: Vec<String>, season_names: Vec<String>) -> Result<Self> {
        if zipcodes.len() != season_names.len() {
            return Err(StatsError::ColumnLength {
                column: "season_name".to_string(),
                expected: zipcodes.len(),
                actual: season_names.len(),
            });
        }

        Ok(Self {
            zipcodes,
            season_names,
            columns: HashMap::new(),
        })
    }

    /// Adds (or replaces) a metric column.
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<Option<f64>>) -> Result<Self> {
        let name = name.into();
        if values.len() != self.len() {
            return Err(StatsError::ColumnLength {
                column: name,
                expected: self.len(),
                actual: values.len(),
            });
        }
        self.columns.insert(name, values);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.zipcodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zipcodes.is_empty()
    }

    pub fn zipcodes(&self) -> &[String] {
        &self.zipcodes
    }

    pub fn season_names(&self) -> &[String] {
        &self.season_names
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Returns the values of a metric column.
    ///
    /// # Errors
    ///
    /// [`StatsError::MissingColumn`] if the column is not present.
    pub fn column(&self, name: &str) -> Result<&[Option<f64>]> {
        self.columns
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| StatsError::MissingColumn(name.to_string()))
    }

    /// View of one row.
    ///
    /// # Panics
    ///
    /// Accessors of the returned record panic if `row >= self.len()`.
    pub fn record(&self, row: usize) -> SeasonRecord<'_> {
        SeasonRecord { table: self, row }
    }

    /// Indices of the rows whose season name marks them as `season`.
    pub fn rows_of(&self, season: SeasonType) -> Vec<usize> {
        self.season_names
            .iter()
            .enumerate()
            .filter(|(_, name)| season.matches(name))
            .map(|(row, _)| row)
            .collect()
    }

    /// Copies the given rows, in order, into a new table with the same columns.
    ///
    /// # Panics
    ///
    /// If any of `rows` is out of range.
    pub(crate) fn select(&self, rows: &[usize]) -> SeasonTable {
        let pick_strings =
            |values: &[String]| -> Vec<String> { rows.iter().map(|&r| values[r].clone()).collect() };

        SeasonTable {
            zipcodes: pick_strings(&self.zipcodes),
            season_names: pick_strings(&self.season_names),
            columns: self
                .columns
                .iter()
                .map(|(name, values)| (name.clone(), rows.iter().map(|&r| values[r]).collect()))
                .collect(),
        }
    }

    /// Stacks several tables, e.g. outputs of separate batches.
    ///
    /// The result carries the union of all columns; cells from a table that
    /// lacked a column are missing.
    pub fn concat(tables: impl IntoIterator<Item = SeasonTable>) -> SeasonTable {
        let mut combined = SeasonTable::default();

        for table in tables {
            let offset = combined.len();
            let added = table.len();

            for (name, values) in table.columns {
                combined
                    .columns
                    .entry(name)
                    .or_insert_with(|| vec![None; offset])
                    .extend(values);
            }
            for values in combined.columns.values_mut() {
                values.resize(offset + added, None);
            }

            combined.zipcodes.extend(table.zipcodes);
            combined.season_names.extend(table.season_names);
        }

        combined
    }
}

/// Borrowed view of one row of a [`SeasonTable`].
#[derive(Debug, Clone, Copy)]
pub struct SeasonRecord<'a> {
    table: &'a SeasonTable,
    row: usize,
}

impl<'a> SeasonRecord<'a> {
    pub fn zipcode(&self) -> &'a str {
        &self.table.zipcodes[self.row]
    }

    pub fn season_name(&self) -> &'a str {
        &self.table.season_names[self.row]
    }

    /// The value of a metric column in this row; `Ok(None)` when the cell is empty.
    pub fn value(&self, column: &str) -> Result<Option<f64>> {
        Ok(self.table.column(column)?[self.row])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SeasonTable {
        SeasonTable::new(
            vec!["01234".into(), "01234".into(), "99999".into()],
            vec!["Heating 2012-2013".into(), "Cooling 2013".into(), "Heating 2013-2014".into()],
        )
        .unwrap()
        .with_column("n_days_in_season", vec![Some(120.0), Some(90.0), None])
        .unwrap()
    }

    #[test]
    fn test_column_length_mismatch() {
        let result = table().with_column("n_days_in_season_range", vec![Some(1.0)]);
        assert!(matches!(
            result,
            Err(StatsError::ColumnLength { expected: 3, actual: 1, .. })
        ));
    }

    #[test]
    fn test_missing_column() {
        let t = table();
        assert!(matches!(
            t.column("slope_deltaT"),
            Err(StatsError::MissingColumn(name)) if name == "slope_deltaT"
        ));
        assert!(t.record(0).value("slope_deltaT").is_err());
    }

    #[test]
    fn test_rows_of_season_type() {
        let t = table();
        assert_eq!(t.rows_of(SeasonType::Heating), vec![0, 2]);
        assert_eq!(t.rows_of(SeasonType::Cooling), vec![1]);
        assert_eq!(t.record(1).season_name(), "Cooling 2013");
    }

    #[test]
    fn test_select_copies_rows() {
        let t = table();
        let subset = t.select(&[2, 0]);
        assert_eq!(subset.zipcodes(), &["99999".to_string(), "01234".to_string()]);
        assert_eq!(subset.column("n_days_in_season").unwrap(), &[None, Some(120.0)]);
    }

    #[test]
    #[should_panic]
    fn test_select_out_of_range_panics() {
        table().select(&[3]);
    }

    #[test]
    fn test_concat_unions_columns() {
        let other = SeasonTable::new(vec!["54321".into()], vec!["Cooling 2014".into()])
            .unwrap()
            .with_column("slope_deltaT", vec![Some(0.5)])
            .unwrap();

        let combined = SeasonTable::concat([table(), other]);

        assert_eq!(combined.len(), 4);
        assert_eq!(
            combined.column("n_days_in_season").unwrap(),
            &[Some(120.0), Some(90.0), None, None]
        );
        assert_eq!(
            combined.column("slope_deltaT").unwrap(),
            &[None, None, None, Some(0.5)]
        );
        assert_eq!(combined.record(3).zipcode(), "54321");
    }
}
