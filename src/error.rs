// src/error.rs

use crate::table::TableKind;

/// Errors surfaced by the query engine.
///
/// Load and fetch failures go through `anyhow` instead; these are the
/// conditions a caller is expected to match on.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The date key is not a column of the table. Usually the date has not
    /// been reported yet, or precedes the first column.
    #[error("date key `{key}` not found in {table} table")]
    KeyNotFound { key: String, table: TableKind },

    #[error("region `{region}` not found")]
    RegionNotFound { region: String },

    /// The row exists but the cell for this date was empty.
    #[error("no value reported for `{region}` on `{key}`")]
    MissingValue { region: String, key: String },

    /// Two tables that must be positionally aligned are not. This is a
    /// loading defect, not a query-time condition.
    #[error("{left} and {right} tables are not row-aligned: {detail}")]
    RowAlignment {
        left: TableKind,
        right: TableKind,
        detail: String,
    },

    #[error("{day}/{month}/{year} is not a calendar date")]
    InvalidDate { day: u32, month: u32, year: i32 },
}

pub type QueryResult<T> = std::result::Result<T, QueryError>;
