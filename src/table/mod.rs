// src/table/mod.rs

pub mod date_key;
pub mod load;

pub use date_key::{format_key, DateKey};

use crate::error::{QueryError, QueryResult};
use std::{collections::HashMap, fmt};

/// Which of the three upstream series a table holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TableKind {
    Confirmed,
    Deaths,
    Recovered,
}

impl TableKind {
    pub const ALL: [TableKind; 3] = [TableKind::Confirmed, TableKind::Deaths, TableKind::Recovered];

    pub fn as_str(&self) -> &str {
        match self {
            TableKind::Confirmed => "confirmed",
            TableKind::Deaths => "deaths",
            TableKind::Recovered => "recovered",
        }
    }

    /// Upstream CSV file name for this series.
    pub fn file_name(&self) -> String {
        format!("time_series_covid19_{}_global.csv", self.as_str())
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reporting unit: a country, or a province of one.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionRow {
    /// `Country/Region`. Not unique: countries reported by province repeat.
    pub country: String,
    /// `Province/State`, `None` when the cell was empty.
    pub province: Option<String>,
    pub lat: Option<f64>,
    pub long: Option<f64>,
    /// One entry per date column, `None` where nothing was reported.
    pub values: Vec<Option<i64>>,
}

impl RegionRow {
    /// Composite identity used to check alignment between tables.
    pub fn identity(&self) -> (&str, Option<&str>) {
        (self.country.as_str(), self.province.as_deref())
    }

    pub fn display_name(&self) -> String {
        match &self.province {
            Some(p) => format!("{} ({})", self.country, p),
            None => self.country.clone(),
        }
    }
}

/// An immutable, ordered set of region rows sharing one date-column schema.
#[derive(Debug, Clone)]
pub struct Table {
    kind: TableKind,
    dates: Vec<DateKey>,
    columns: HashMap<String, usize>,
    rows: Vec<RegionRow>,
}

impl Table {
    /// Rows shorter than the date list are padded with `None`.
    pub fn new(kind: TableKind, dates: Vec<DateKey>, mut rows: Vec<RegionRow>) -> Self {
        let columns = dates
            .iter()
            .enumerate()
            .map(|(i, k)| (k.as_str().to_string(), i))
            .collect();
        for row in &mut rows {
            row.values.resize(dates.len(), None);
        }
        Self {
            kind,
            dates,
            columns,
            rows,
        }
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    pub fn dates(&self) -> &[DateKey] {
        &self.dates
    }

    pub fn rows(&self) -> &[RegionRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of `key` among the date columns.
    pub fn column(&self, key: &str) -> QueryResult<usize> {
        self.columns
            .get(key)
            .copied()
            .ok_or_else(|| QueryError::KeyNotFound {
                key: key.to_string(),
                table: self.kind,
            })
    }

    /// All values of one date column, in row order.
    pub fn column_values(&self, key: &str) -> QueryResult<impl Iterator<Item = Option<i64>> + '_> {
        let col = self.column(key)?;
        Ok(self.rows.iter().map(move |r| r.values[col]))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a table from `(country, province, values)` triples.
    pub(crate) fn table(
        kind: TableKind,
        dates: &[&str],
        rows: &[(&str, Option<&str>, Vec<Option<i64>>)],
    ) -> Table {
        let dates = dates
            .iter()
            .map(|d| DateKey::parse(d).expect("test date key"))
            .collect();
        let rows = rows
            .iter()
            .map(|(c, p, v)| RegionRow {
                country: c.to_string(),
                province: p.map(str::to_string),
                lat: None,
                long: None,
                values: v.clone(),
            })
            .collect();
        Table::new(kind, dates, rows)
    }

    #[test]
    fn test_column_lookup() {
        let t = table(
            TableKind::Confirmed,
            &["1/22/20", "1/23/20"],
            &[("Poland", None, vec![Some(0), Some(1)])],
        );
        assert_eq!(t.column("1/23/20"), Ok(1));
        assert_eq!(
            t.column("1/24/20"),
            Err(QueryError::KeyNotFound {
                key: "1/24/20".into(),
                table: TableKind::Confirmed
            })
        );
    }

    #[test]
    fn test_short_rows_are_padded() {
        let t = table(
            TableKind::Deaths,
            &["1/22/20", "1/23/20"],
            &[("Chad", None, vec![Some(2)])],
        );
        let vals: Vec<_> = t.column_values("1/23/20").unwrap().collect();
        assert_eq!(vals, vec![None]);
    }

    #[test]
    fn test_file_names() {
        assert_eq!(
            TableKind::Recovered.file_name(),
            "time_series_covid19_recovered_global.csv"
        );
    }
}
