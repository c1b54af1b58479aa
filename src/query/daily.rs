use chrono::NaiveDate;
use tracing::debug;

use crate::error::{QueryError, QueryResult};
use crate::table::{DateKey, Table};

/// Number of rows whose value on `date` equals the previous day's, counting
/// only rows where that value is positive.
///
/// Each row counts on its own; provinces are not grouped into countries.
pub fn count_unchanged_from_previous_day(table: &Table, date: NaiveDate) -> QueryResult<usize> {
    let today = DateKey::from_date(date);
    let yesterday = date
        .pred_opt()
        .map(DateKey::from_date)
        .ok_or_else(|| QueryError::KeyNotFound {
            key: format!("day before {}", today),
            table: table.kind(),
        })?;

    let t = table.column(today.as_str())?;
    let y = table.column(yesterday.as_str())?;

    let count = table
        .rows()
        .iter()
        .filter(|r| match (r.values[t], r.values[y]) {
            (Some(now), Some(prev)) => now == prev && now > 0,
            _ => false,
        })
        .count();
    debug!(%today, %yesterday, count, "unchanged from previous day");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::tests::table;
    use crate::table::TableKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_equal_positive_counts_only() {
        let t = table(
            TableKind::Confirmed,
            &["2/26/20", "2/27/20"],
            &[
                ("Steady", None, vec![Some(3), Some(3)]),
                ("Zero", None, vec![Some(0), Some(0)]),
                ("Growing", None, vec![Some(3), Some(4)]),
                ("Gap", None, vec![None, Some(3)]),
                ("Blank", None, vec![None, None]),
                ("Australia", Some("Victoria"), vec![Some(1), Some(1)]),
                ("Australia", Some("Queensland"), vec![Some(5), Some(5)]),
            ],
        );
        assert_eq!(count_unchanged_from_previous_day(&t, date(2020, 2, 27)), Ok(3));
    }

    #[test]
    fn test_month_and_leap_rollover() {
        let t = table(
            TableKind::Confirmed,
            &["2/29/20", "3/1/20"],
            &[("Italy", None, vec![Some(1_128), Some(1_128)])],
        );
        assert_eq!(count_unchanged_from_previous_day(&t, date(2020, 3, 1)), Ok(1));
    }

    #[test]
    fn test_year_rollover() {
        let t = table(
            TableKind::Confirmed,
            &["12/31/20", "1/1/21"],
            &[("Fiji", None, vec![Some(46), Some(46)])],
        );
        assert_eq!(count_unchanged_from_previous_day(&t, date(2021, 1, 1)), Ok(1));
    }

    #[test]
    fn test_first_column_has_no_yesterday() {
        let t = table(
            TableKind::Confirmed,
            &["1/22/20", "1/23/20"],
            &[("China", Some("Hubei"), vec![Some(444), Some(444)])],
        );
        assert_eq!(
            count_unchanged_from_previous_day(&t, date(2020, 1, 22)),
            Err(QueryError::KeyNotFound {
                key: "1/21/20".into(),
                table: TableKind::Confirmed
            })
        );
    }
}
