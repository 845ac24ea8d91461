//! Environment configuration for the refresh binary.

use crate::forecast::fetcher::{DEFAULT_FORECAST_URL, DEFAULT_REQUEST_TIMEOUT_SECONDS};
use crate::snapshot::writer::DEFAULT_OUTPUT_PATH;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_FORECAST_DAYS: usize = 6;
pub const DEFAULT_MAX_WORKERS: usize = 20;

pub const ENV_OUTPUT_PATH: &str = "BMWT_MIGRATION_OUTPUT_PATH";
/// Read when [`ENV_OUTPUT_PATH`] is unset.
pub const ENV_OUTPUT_PATH_FALLBACK: &str = "MIGRATION_OUTPUT_PATH";
pub const ENV_FORECAST_DAYS: &str = "MIGRATION_FORECAST_DAYS";
pub const ENV_MAX_WORKERS: &str = "MIGRATION_MAX_WORKERS";
pub const ENV_REQUEST_TIMEOUT_SECONDS: &str = "MIGRATION_REQUEST_TIMEOUT_SECONDS";
pub const ENV_FORECAST_URL: &str = "MIGRATION_FORECAST_URL";

#[derive(Debug, Clone, PartialEq)]
pub struct RefreshSettings {
    pub output_path: PathBuf,
    pub forecast_days: usize,
    pub max_workers: usize,
    pub request_timeout: Duration,
    pub forecast_url: String,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            forecast_days: DEFAULT_FORECAST_DAYS,
            max_workers: DEFAULT_MAX_WORKERS,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECONDS),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
        }
    }
}

impl RefreshSettings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let output_path = optional(ENV_OUTPUT_PATH)
            .or_else(|| optional(ENV_OUTPUT_PATH_FALLBACK))
            .map(PathBuf::from)
            .unwrap_or(defaults.output_path);
        let forecast_days = env_usize(
            optional(ENV_FORECAST_DAYS),
            ENV_FORECAST_DAYS,
            defaults.forecast_days,
        )?;
        let max_workers =
            env_usize(optional(ENV_MAX_WORKERS), ENV_MAX_WORKERS, defaults.max_workers)?;
        let timeout_seconds = match optional(ENV_REQUEST_TIMEOUT_SECONDS) {
            Some(value) => value.parse::<u64>().with_context(|| {
                format!(
                    "Failed to parse {}={} as u64",
                    ENV_REQUEST_TIMEOUT_SECONDS, value
                )
            })?,
            None => DEFAULT_REQUEST_TIMEOUT_SECONDS,
        };
        let forecast_url = optional(ENV_FORECAST_URL).unwrap_or(defaults.forecast_url);

        if forecast_days == 0 {
            anyhow::bail!("{} must be at least 1", ENV_FORECAST_DAYS);
        }
        if max_workers == 0 {
            anyhow::bail!("{} must be at least 1", ENV_MAX_WORKERS);
        }

        Ok(Self {
            output_path,
            forecast_days,
            max_workers,
            request_timeout: Duration::from_secs(timeout_seconds),
            forecast_url,
        })
    }
}

fn env_usize(value: Option<String>, name: &str, default: usize) -> Result<usize> {
    match value {
        Some(value) => value
            .parse::<usize>()
            .with_context(|| format!("Failed to parse {}={} as usize", name, value)),
        None => Ok(default),
    }
}
