//! Query engine: read-only scans over loaded tables.
//!
//! Every function takes the tables it reads explicitly and never mutates
//! them, so the same inputs always give the same answer.
//!
//! Empty cells (`None`) never satisfy a predicate and contribute nothing to
//! sums.

pub mod cross_table;
pub mod daily;
pub mod point;
pub mod ranking;

pub use cross_table::{count_no_deaths_with_cases, indices_with_more_recovered_than_deaths};
pub use daily::count_unchanged_from_previous_day;
pub use point::cases_for_region_on_date;
pub use ranking::top_n_regions_by_date;
