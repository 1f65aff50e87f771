//! Shared command utilities
//!
//! This module contains:
//! - `load_config` / `open_store` - Resolve config and the subscription file
//! - `parse_date`, `parse_or`, `resolve_month` - Argument parsing helpers

use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use tracing::debug;

use renew_core::{Config, MonthRef, SubscriptionStore};

/// Load config from an explicit path (must exist) or the default override
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            Config::load_from(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))
        }
        None => Config::load().context("Failed to load config"),
    }
}

/// Store at `--file` if given, else the configured data file
pub fn open_store(config: &Config, file: Option<&Path>) -> SubscriptionStore {
    let path = file.unwrap_or(&config.data_file);
    debug!(path = %path.display(), "Using subscription store");
    SubscriptionStore::new(path)
}

/// Local calendar date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse an optional YYYY-MM-DD argument
pub fn parse_date(raw: Option<&str>, flag: &str) -> Result<Option<NaiveDate>> {
    raw.map(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d"))
        .transpose()
        .with_context(|| format!("Invalid {} format (use YYYY-MM-DD)", flag))
}

/// Parse an optional named value, falling back to `default`
pub fn parse_or<T>(raw: Option<&str>, default: T) -> Result<T>
where
    T: FromStr<Err = String>,
{
    match raw {
        Some(value) => value.parse().map_err(anyhow::Error::msg),
        None => Ok(default),
    }
}

/// Month from `--year`/`--month`, defaulting to the month of `today`
pub fn resolve_month(year: Option<i32>, month: Option<u32>, today: NaiveDate) -> Result<MonthRef> {
    let current = MonthRef::from_date(today);
    let year = year.unwrap_or(current.year);
    let month = month.unwrap_or_else(|| current.number());

    MonthRef::from_number(year, month)
        .with_context(|| format!("Invalid --month {} (use 1-12)", month))
}
