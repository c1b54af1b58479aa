// src/table/date_key.rs
//
// Column keys are `M/D/YY` with no zero padding, e.g. `3/7/20`. The two-digit
// year means 2020 and 2120 share a key; that is how the upstream tables are
// keyed, so it is kept as-is.

use chrono::{Datelike, NaiveDate};
use std::fmt;

/// Build the column key for a day/month/year triple. Does not validate the
/// date: `format_key(31, 4, 2020)` happily returns `"4/31/20"`.
pub fn format_key(day: u32, month: u32, year: i32) -> String {
    format!("{}/{}/{}", month, day, year.rem_euclid(100))
}

/// A table column key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateKey(String);

impl DateKey {
    pub fn from_dmy(day: u32, month: u32, year: i32) -> Self {
        DateKey(format_key(day, month, year))
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self::from_dmy(date.day(), date.month(), date.year())
    }

    /// Accepts a header cell if it looks like `M/D/YY` (1-2 digit month and
    /// day, 2 digit year). Leading zeros are stripped so `03/07/20` and
    /// `3/7/20` map to the same key.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.trim().split('/');
        let month: u32 = parse_part(parts.next()?, 1..=2)?;
        let day: u32 = parse_part(parts.next()?, 1..=2)?;
        let year = parts.next()?;
        if parts.next().is_some() || year.len() != 2 {
            return None;
        }
        let year: i32 = parse_part(year, 2..=2)?;
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return None;
        }
        Some(Self::from_dmy(day, month, year))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn parse_part<T: std::str::FromStr>(s: &str, len: std::ops::RangeInclusive<usize>) -> Option<T> {
    if !len.contains(&s.len()) || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_key_no_padding() {
        assert_eq!(format_key(7, 3, 2020), "3/7/20");
        assert_eq!(format_key(22, 1, 2020), "1/22/20");
        assert_eq!(format_key(1, 12, 2021), "12/1/21");
    }

    #[test]
    fn test_format_key_does_not_validate() {
        assert_eq!(format_key(31, 4, 2020), "4/31/20");
    }

    #[test]
    fn test_year_aliasing_is_preserved() {
        assert_eq!(format_key(7, 3, 1920), format_key(7, 3, 2020));
        assert_eq!(format_key(7, 3, 2005), "3/7/5");
    }

    #[test]
    fn test_from_date() {
        let d = NaiveDate::from_ymd_opt(2020, 2, 29).unwrap();
        assert_eq!(DateKey::from_date(d).as_str(), "2/29/20");
    }

    #[test]
    fn test_parse_header_cells() {
        assert_eq!(DateKey::parse("3/7/20").unwrap().as_str(), "3/7/20");
        assert_eq!(DateKey::parse(" 12/31/20 ").unwrap().as_str(), "12/31/20");
        assert_eq!(DateKey::parse("03/07/20").unwrap().as_str(), "3/7/20");
        assert!(DateKey::parse("Lat").is_none());
        assert!(DateKey::parse("Country/Region").is_none());
        assert!(DateKey::parse("3/7/2020").is_none());
        assert!(DateKey::parse("13/1/20").is_none());
        assert!(DateKey::parse("1/2/3/4").is_none());
    }
}
