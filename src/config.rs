// src/config.rs

use std::{env, path::PathBuf, time::Duration};
use url::Url;

use crate::error::{CountriesError, Result};

pub const DEFAULT_SOURCE_URL: &str = "http://download.geonames.org/export/dump/countryInfo.txt";
pub const DEFAULT_STORE_PATH: &str = "data/countries.parquet";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Runtime settings, read from the environment only.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub source_url: Url,
    pub store_path: PathBuf,
    pub http_timeout: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            source_url: Url::parse(DEFAULT_SOURCE_URL).expect("default source url is valid"),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl SyncConfig {
    /// Reads `COUNTRIES_SOURCE_URL`, `COUNTRIES_STORE_PATH` and
    /// `COUNTRIES_HTTP_TIMEOUT_SECS`, falling back to the defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Self::default();

        if let Some(raw) = lookup("COUNTRIES_SOURCE_URL") {
            cfg.source_url = Url::parse(raw.trim()).map_err(|e| {
                CountriesError::Config(format!("COUNTRIES_SOURCE_URL `{}`: {}", raw, e))
            })?;
        }
        if let Some(raw) = lookup("COUNTRIES_STORE_PATH") {
            cfg.store_path = PathBuf::from(raw);
        }
        if let Some(raw) = lookup("COUNTRIES_HTTP_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                CountriesError::Config(format!(
                    "COUNTRIES_HTTP_TIMEOUT_SECS `{}` is not a whole number of seconds",
                    raw
                ))
            })?;
            cfg.http_timeout = Duration::from_secs(secs);
        }

        Ok(cfg)
    }
}
