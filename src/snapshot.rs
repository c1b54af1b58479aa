// src/snapshot.rs

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::Path;
use tracing::info;

use crate::error::{QueryError, QueryResult};
use crate::query::{self, cross_table::check_aligned};
use crate::table::{load::load_table_file, DateKey, Table, TableKind};

/// Turn a day/month/year triple into a calendar date.
pub fn date_from_dmy(day: u32, month: u32, year: i32) -> QueryResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or(QueryError::InvalidDate { day, month, year })
}

/// The three series, loaded once and read-only afterwards.
///
/// All three tables are checked to be row-aligned on construction, so the
/// cross-table queries below can rely on position.
#[derive(Debug, Clone)]
pub struct Snapshot {
    confirmed: Table,
    deaths: Table,
    recovered: Table,
}

impl Snapshot {
    pub fn new(confirmed: Table, deaths: Table, recovered: Table) -> QueryResult<Self> {
        check_aligned(&confirmed, &deaths)?;
        check_aligned(&confirmed, &recovered)?;
        Ok(Self {
            confirmed,
            deaths,
            recovered,
        })
    }

    /// Load the upstream CSV files from `dir`.
    #[tracing::instrument(level = "info", skip(dir), fields(dir = %dir.as_ref().display()))]
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let load = |kind: TableKind| load_table_file(kind, dir.as_ref().join(kind.file_name()));
        let [confirmed, deaths, recovered] = TableKind::ALL.map(load);
        let snapshot = Self::new(confirmed?, deaths?, recovered?)
        .with_context(|| format!("tables in {:?} do not line up", dir.as_ref()))?;
        snapshot.log_summary();
        Ok(snapshot)
    }

    pub fn log_summary(&self) {
        for t in TableKind::ALL.map(|kind| self.table(kind)) {
            info!(
                table = %t.kind(),
                rows = t.len(),
                dates = t.dates().len(),
                first = ?t.dates().first().map(DateKey::as_str),
                last = ?t.dates().last().map(DateKey::as_str),
                "loaded"
            );
        }
    }

    pub fn table(&self, kind: TableKind) -> &Table {
        match kind {
            TableKind::Confirmed => &self.confirmed,
            TableKind::Deaths => &self.deaths,
            TableKind::Recovered => &self.recovered,
        }
    }

    /// Confirmed cases for `region` on `date` (first matching row).
    pub fn cases_for_region(&self, region: &str, date: NaiveDate) -> QueryResult<i64> {
        query::cases_for_region_on_date(&self.confirmed, region, DateKey::from_date(date).as_str())
    }

    /// Countries with the most confirmed cases on `date`.
    pub fn top_regions(&self, date: NaiveDate, n: usize) -> QueryResult<Vec<String>> {
        query::top_n_regions_by_date(&self.confirmed, DateKey::from_date(date).as_str(), n)
    }

    /// Rows whose confirmed count did not move since the day before.
    pub fn unchanged_from_previous_day(&self, date: NaiveDate) -> QueryResult<usize> {
        query::count_unchanged_from_previous_day(&self.confirmed, date)
    }

    pub fn no_deaths_with_cases(&self, date: NaiveDate) -> QueryResult<usize> {
        query::count_no_deaths_with_cases(
            &self.deaths,
            &self.confirmed,
            DateKey::from_date(date).as_str(),
        )
    }

    pub fn more_recovered_than_deaths(&self, date: NaiveDate) -> QueryResult<Vec<usize>> {
        query::indices_with_more_recovered_than_deaths(
            &self.deaths,
            &self.recovered,
            DateKey::from_date(date).as_str(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::tests::table;
    use std::io::Write;
    use tempfile::tempdir;

    const DATES: &[&str] = &["3/14/20", "3/15/20"];

    fn snapshot() -> Snapshot {
        let t = |kind, a: i64, b: i64| {
            table(
                kind,
                DATES,
                &[
                    ("Poland", None, vec![Some(a), Some(a)]),
                    ("France", Some("Reunion"), vec![Some(b), Some(b * 2)]),
                ],
            )
        };
        Snapshot::new(
            t(TableKind::Confirmed, 104, 5),
            t(TableKind::Deaths, 3, 0),
            t(TableKind::Recovered, 0, 2),
        )
        .unwrap()
    }

    #[test]
    fn test_date_from_dmy() {
        assert_eq!(
            date_from_dmy(29, 2, 2020),
            Ok(NaiveDate::from_ymd_opt(2020, 2, 29).unwrap())
        );
        assert_eq!(
            date_from_dmy(31, 4, 2020),
            Err(QueryError::InvalidDate {
                day: 31,
                month: 4,
                year: 2020
            })
        );
    }

    #[test]
    fn test_date_driven_queries() {
        let s = snapshot();
        let d = date_from_dmy(15, 3, 2020).unwrap();
        assert_eq!(s.cases_for_region("Poland", d), Ok(104));
        assert_eq!(s.top_regions(d, 5).unwrap(), vec!["Poland", "France"]);
        assert_eq!(s.unchanged_from_previous_day(d), Ok(1));
        assert_eq!(s.no_deaths_with_cases(d), Ok(1));
        assert_eq!(s.more_recovered_than_deaths(d), Ok(vec![1]));
    }

    #[test]
    fn test_rejects_misaligned_tables() {
        let confirmed = table(TableKind::Confirmed, DATES, &[("Poland", None, vec![Some(1), Some(1)])]);
        let deaths = table(TableKind::Deaths, DATES, &[("Poland", None, vec![Some(0), Some(0)])]);
        let recovered = table(TableKind::Recovered, DATES, &[("Chile", None, vec![Some(0), Some(0)])]);
        assert!(matches!(
            Snapshot::new(confirmed, deaths, recovered),
            Err(QueryError::RowAlignment {
                left: TableKind::Confirmed,
                right: TableKind::Recovered,
                ..
            })
        ));
    }

    #[test]
    fn test_load_dir() -> Result<()> {
        let dir = tempdir()?;
        let bodies = [
            (TableKind::Confirmed, "Province/State,Country/Region,Lat,Long,3/6/20,3/7/20\n,Poland,51.9,19.1,1,5\n"),
            (TableKind::Deaths, "Province/State,Country/Region,Lat,Long,3/6/20,3/7/20\n,Poland,51.9,19.1,0,0\n"),
            (TableKind::Recovered, "Province/State,Country/Region,Lat,Long,3/6/20,3/7/20\n,Poland,51.9,19.1,0,0\n"),
        ];
        for (kind, body) in bodies {
            std::fs::File::create(dir.path().join(kind.file_name()))?.write_all(body.as_bytes())?;
        }

        let s = Snapshot::load_dir(dir.path())?;
        for kind in TableKind::ALL {
            assert_eq!(s.table(kind).kind(), kind);
            assert_eq!(s.table(kind).len(), 1);
        }
        assert_eq!(s.cases_for_region("Poland", date_from_dmy(7, 3, 2020)?)?, 5);
        assert_eq!(s.no_deaths_with_cases(date_from_dmy(7, 3, 2020)?)?, 1);
        Ok(())
    }
}
