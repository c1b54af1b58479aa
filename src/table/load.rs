// src/table/load.rs
use anyhow::{anyhow, bail, Context, Result};
use csv::ReaderBuilder;
use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};
use tracing::{debug, warn};

use super::{DateKey, RegionRow, Table, TableKind};

const COUNTRY_HEADER: &str = "Country/Region";
const PROVINCE_HEADER: &str = "Province/State";
const LAT_HEADER: &str = "Lat";
const LONG_HEADER: &str = "Long";

/// Where each interesting header sits in a record.
struct Layout {
    country: usize,
    province: Option<usize>,
    lat: Option<usize>,
    long: Option<usize>,
    /// (record position, key) for every date column, in header order.
    dates: Vec<(usize, DateKey)>,
}

impl Layout {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);

        let country = find(COUNTRY_HEADER)
            .ok_or_else(|| anyhow!("missing `{}` column", COUNTRY_HEADER))?;

        let mut dates = Vec::new();
        for (i, h) in headers.iter().enumerate() {
            if let Some(key) = DateKey::parse(h) {
                if dates.iter().any(|(_, k)| *k == key) {
                    warn!(header = h, "duplicate date column, keeping the first");
                    continue;
                }
                dates.push((i, key));
            }
        }

        Ok(Self {
            country,
            province: find(PROVINCE_HEADER),
            lat: find(LAT_HEADER),
            long: find(LONG_HEADER),
            dates,
        })
    }
}

/// Trim and strip outer quotes; `None` for an empty cell.
fn clean_cell(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    let trimmed = if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].trim()
    } else {
        trimmed
    };
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Counts are integers, but some exports write them as `5.0`.
fn parse_count(s: &str) -> Option<i64> {
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    let f = s.parse::<f64>().ok()?;
    // i64::MIN is exactly -2^63; i64::MAX rounds up to 2^63 as f64
    let in_range = f >= i64::MIN as f64 && f < -(i64::MIN as f64);
    if f.is_finite() && f.fract() == 0.0 && in_range {
        Some(f as i64)
    } else {
        None
    }
}

/// Parse a time-series CSV (header row, then one row per region) into a
/// [`Table`]. Columns that are neither identifying nor date-shaped are
/// ignored.
pub fn read_table<R: Read>(kind: TableKind, reader: R) -> Result<Table> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .with_context(|| format!("reading {} header row", kind))?
        .clone();
    let layout = Layout::from_headers(&headers).with_context(|| format!("{} header", kind))?;
    if layout.dates.is_empty() {
        bail!("{} table has no date columns", kind);
    }
    debug!(table = %kind, dates = layout.dates.len(), "parsed header");

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        // header is line 1
        let line = idx + 2;
        let record = result.with_context(|| format!("CSV parse error in {} at line {}", kind, line))?;

        // rows are kept even without a country so positions match the source
        let country = match record.get(layout.country).and_then(clean_cell) {
            Some(c) => c.to_string(),
            None => {
                debug!(table = %kind, line, "row without a country");
                String::new()
            }
        };
        let cell = |pos: Option<usize>| pos.and_then(|p| record.get(p)).and_then(clean_cell);

        let mut values = Vec::with_capacity(layout.dates.len());
        for (pos, key) in &layout.dates {
            let value = match record.get(*pos).and_then(clean_cell) {
                None => None,
                Some(s) => Some(parse_count(s).ok_or_else(|| {
                    anyhow!(
                        "{} line {}: column `{}` is not a count: `{}`",
                        kind,
                        line,
                        key,
                        s
                    )
                })?),
            };
            values.push(value);
        }

        rows.push(RegionRow {
            country,
            province: cell(layout.province).map(str::to_string),
            lat: cell(layout.lat).and_then(|s| s.parse().ok()),
            long: cell(layout.long).and_then(|s| s.parse().ok()),
            values,
        });
    }

    let dates = layout.dates.into_iter().map(|(_, k)| k).collect();
    Ok(Table::new(kind, dates, rows))
}

/// Open `path` and parse it as a `kind` table.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_table_file<P: AsRef<Path>>(kind: TableKind, path: P) -> Result<Table> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open {} table: {:?}", kind, path.as_ref()))?;
    read_table(kind, BufReader::new(file))
        .with_context(|| format!("Failed to load {:?}", path.as_ref()))
}
