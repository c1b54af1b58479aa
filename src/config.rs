// src/config.rs

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{env, fs, path::PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_time_series/";

/// Runtime settings. Read from an optional JSON file named by
/// `COVIDSTATS_CONFIG`, then overridden by environment variables.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Directory holding the three CSV files. When set, nothing is fetched.
    pub data_dir: Option<PathBuf>,
    /// Directory URL the CSV files are fetched from.
    pub base_url: String,
    /// Attempts per file before giving up.
    pub fetch_retries: usize,
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            fetch_retries: 3,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let mut cfg = match env::var("COVIDSTATS_CONFIG") {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        cfg.apply_overrides(|k| env::var(k).ok())?;
        Ok(cfg)
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let text = fs::read_to_string(path).with_context(|| format!("reading config {}", path))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path))
    }

    /// Apply `COVIDSTATS_*` / `LOG_LEVEL` overrides from `lookup`. A retry
    /// count of 0 is raised to 1.
    fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("COVIDSTATS_DATA_DIR").filter(|s| !s.is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(url) = lookup("COVIDSTATS_BASE_URL").filter(|s| !s.is_empty()) {
            self.base_url = url;
        }
        if let Some(n) = lookup("COVIDSTATS_FETCH_RETRIES") {
            self.fetch_retries = n
                .trim()
                .parse()
                .with_context(|| format!("COVIDSTATS_FETCH_RETRIES=`{}`", n))?;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.log_level = level;
        }
        self.fetch_retries = self.fetch_retries.max(1);
        Ok(())
    }
}
