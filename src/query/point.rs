use tracing::debug;

use crate::error::{QueryError, QueryResult};
use crate::table::Table;

/// Value of `date_key` for the first row whose country is exactly
/// `region_name`.
///
/// Only meaningful for regions reported as a single row: for a country split
/// into provinces this returns the first province, not a national total.
pub fn cases_for_region_on_date(
    table: &Table,
    region_name: &str,
    date_key: &str,
) -> QueryResult<i64> {
    let col = table.column(date_key)?;
    let row = table
        .rows()
        .iter()
        .find(|r| r.country == region_name)
        .ok_or_else(|| QueryError::RegionNotFound {
            region: region_name.to_string(),
        })?;
    debug!(region = region_name, key = date_key, value = ?row.values[col], "point lookup");
    row.values[col].ok_or_else(|| QueryError::MissingValue {
        region: region_name.to_string(),
        key: date_key.to_string(),
    })
}
