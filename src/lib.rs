pub mod config;
pub mod error;
pub mod fetch;
pub mod query;
pub mod snapshot;
pub mod table;

pub use error::QueryError;
pub use snapshot::Snapshot;
pub use table::{DateKey, RegionRow, Table, TableKind};
