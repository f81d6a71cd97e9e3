use anyhow::{Context, Result};
use reqwest::Url;
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

const DEFAULT_API_URL: &str = "http://localhost:3000";
const DEFAULT_STORAGE_URL: &str = "http://localhost:9199/estate-images";
const DEFAULT_TIMEOUT_SECS: &str = "30";

/// Where the backend and the object store live
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: Url,
    pub storage_url: Url,
    pub http_timeout: Duration,
}

impl Config {
    /// Read `ESTATE_API_URL`, `ESTATE_STORAGE_URL` and `ESTATE_HTTP_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let timeout_secs: u64 = try_load(&lookup, "ESTATE_HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        Ok(Self {
            api_url: try_load(&lookup, "ESTATE_API_URL", DEFAULT_API_URL)?,
            storage_url: try_load(&lookup, "ESTATE_STORAGE_URL", DEFAULT_STORAGE_URL)?,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn try_load<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    raw.trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("Invalid {key} value: {raw}"))
}
