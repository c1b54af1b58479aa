//! Queries that compare two tables row by row.
//!
//! Rows are matched by position, never grouped by country: a country
//! reported per province contributes one entry per province.

use tracing::debug;

use crate::error::{QueryError, QueryResult};
use crate::table::Table;

/// Fail unless `left` and `right` have the same rows in the same order.
pub fn check_aligned(left: &Table, right: &Table) -> QueryResult<()> {
    let err = |detail: String| QueryError::RowAlignment {
        left: left.kind(),
        right: right.kind(),
        detail,
    };
    if left.len() != right.len() {
        return Err(err(format!("{} rows vs {} rows", left.len(), right.len())));
    }
    if let Some((i, (l, r))) = left
        .rows()
        .iter()
        .zip(right.rows())
        .enumerate()
        .find(|(_, (l, r))| l.identity() != r.identity())
    {
        return Err(err(format!(
            "row {} is `{}` vs `{}`",
            i,
            l.display_name(),
            r.display_name()
        )));
    }
    Ok(())
}

/// Paired values of `date_key` from two aligned tables.
fn paired<'a>(
    left: &'a Table,
    right: &'a Table,
    date_key: &str,
) -> QueryResult<impl Iterator<Item = (Option<i64>, Option<i64>)> + 'a> {
    let l = left.column_values(date_key)?;
    let r = right.column_values(date_key)?;
    check_aligned(left, right)?;
    Ok(l.zip(r))
}

/// Rows with at least one case and no deaths on `date_key`.
pub fn count_no_deaths_with_cases(
    deaths: &Table,
    cases: &Table,
    date_key: &str,
) -> QueryResult<usize> {
    let count = paired(deaths, cases, date_key)?
        .filter(|pair| matches!(pair, (Some(0), Some(c)) if *c > 0))
        .count();
    debug!(key = date_key, count, "no deaths with cases");
    Ok(count)
}

/// Row positions, ascending, where recoveries exceed deaths on `date_key`.
pub fn indices_with_more_recovered_than_deaths(
    deaths: &Table,
    recovered: &Table,
    date_key: &str,
) -> QueryResult<Vec<usize>> {
    let indices: Vec<usize> = paired(deaths, recovered, date_key)?
        .enumerate()
        .filter_map(|(i, pair)| match pair {
            (Some(d), Some(r)) if d < r => Some(i),
            _ => None,
        })
        .collect();
    debug!(key = date_key, matched = indices.len(), "more recovered than deaths");
    Ok(indices)
}
