use std::collections::HashMap;
use tracing::debug;

use crate::error::QueryResult;
use crate::table::Table;

/// Names of the `n` countries with the highest total for `date_key`.
///
/// Rows are summed per country first, so provinces roll up into a national
/// figure. Ties keep the order in which the countries first appear in the
/// table. Returns fewer than `n` names if there are fewer countries.
pub fn top_n_regions_by_date(table: &Table, date_key: &str, n: usize) -> QueryResult<Vec<String>> {
    let col = table.column(date_key)?;

    // (country, total) in first-appearance order
    let mut totals: Vec<(&str, i64)> = Vec::new();
    let mut slot: HashMap<&str, usize> = HashMap::new();
    for row in table.rows() {
        let i = *slot.entry(row.country.as_str()).or_insert_with(|| {
            totals.push((row.country.as_str(), 0));
            totals.len() - 1
        });
        totals[i].1 += row.values[col].unwrap_or(0);
    }

    // sort_by is stable
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    debug!(key = date_key, countries = totals.len(), n, "ranked");

    Ok(totals
        .into_iter()
        .take(n)
        .map(|(name, _)| name.to_string())
        .collect())
}
