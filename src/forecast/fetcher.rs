//! HTTP client for the upstream forecast provider (Open-Meteo compatible).
//!
//! Two request modes are supported: a multi-day `hourly` forecast used by the
//! raster pipeline and a single `current` observation used for on-demand
//! single-location scoring. Pipeline callers go through [`ForecastSource`],
//! which turns every failure into `None`.

use crate::forecast::error::ForecastError;
use crate::forecast::extractor::{
    CurrentConditions, HourlyForecast, CURRENT_VARIABLES, HOURLY_VARIABLES,
};
use crate::types::grid_point::GridPoint;
use crate::types::observation::WeatherObservation;
use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 20;
const USER_AGENT: &str = concat!("migration-raster/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Default, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    hourly: Option<HourlyForecast>,
    #[serde(default)]
    current: Option<CurrentConditions>,
}

/// A source of forecast data for the pipeline.
///
/// Implementations must not fail: any network, status or parsing problem is
/// reported as `None`, which the scoring engine treats as "unknown weather".
#[allow(async_fn_in_trait)]
pub trait ForecastSource {
    /// Hourly forecast block covering `forecast_days` days for `point`.
    async fn hourly_forecast(&self, point: GridPoint, forecast_days: usize)
        -> Option<HourlyForecast>;

    /// Current-instant observation for `point`.
    async fn current_observation(&self, point: GridPoint) -> Option<WeatherObservation>;
}

/// Fetches forecasts over HTTP with a per-request timeout.
#[derive(Debug, Clone)]
pub struct ForecastFetcher {
    client: Client,
    base_url: String,
}

impl ForecastFetcher {
    /// Creates a fetcher for `base_url` whose requests give up after `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ForecastError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(ForecastError::ClientBuild)?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Requests `forecast_days` days of hourly data for one coordinate.
    pub async fn fetch_hourly(
        &self,
        latitude: f64,
        longitude: f64,
        forecast_days: usize,
    ) -> Result<HourlyForecast, ForecastError> {
        let query = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("hourly", HOURLY_VARIABLES.join(",")),
            ("timezone", "UTC".to_string()),
            ("forecast_days", forecast_days.to_string()),
        ];
        let response = self.get(&query).await?;
        response.hourly.ok_or(ForecastError::MissingBlock("hourly"))
    }

    /// Requests the current-instant conditions for one coordinate.
    pub async fn fetch_current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentConditions, ForecastError> {
        let query = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("current", CURRENT_VARIABLES.join(",")),
            ("timezone", "UTC".to_string()),
        ];
        let response = self.get(&query).await?;
        response.current.ok_or(ForecastError::MissingBlock("current"))
    }

    async fn get(&self, query: &[(&str, String)]) -> Result<ForecastResponse, ForecastError> {
        let url = self.base_url.clone();
        debug!("Requesting forecast from {} with {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| ForecastError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                return Err(if let Some(status) = e.status() {
                    ForecastError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    ForecastError::NetworkRequest(url, e)
                });
            }
        };

        let body = response
            .text()
            .await
            .map_err(|e| ForecastError::BodyRead(url.clone(), e))?;
        parse_response(&url, &body)
    }
}

fn parse_response(url: &str, body: &str) -> Result<ForecastResponse, ForecastError> {
    serde_json::from_str(body).map_err(|e| ForecastError::JsonParse(url.to_string(), e))
}

impl ForecastSource for ForecastFetcher {
    async fn hourly_forecast(
        &self,
        point: GridPoint,
        forecast_days: usize,
    ) -> Option<HourlyForecast> {
        match self
            .fetch_hourly(point.latitude, point.longitude, forecast_days)
            .await
        {
            Ok(forecast) => Some(forecast),
            Err(e) => {
                warn!(
                    "Forecast unavailable for ({}, {}): {}",
                    point.latitude, point.longitude, e
                );
                None
            }
        }
    }

    async fn current_observation(&self, point: GridPoint) -> Option<WeatherObservation> {
        let result = match self.fetch_current(point.latitude, point.longitude).await {
            Ok(current) => current.to_observation(),
            Err(e) => Err(e),
        };
        match result {
            Ok(observation) => Some(observation),
            Err(e) => {
                warn!(
                    "Current weather unavailable for ({}, {}): {}",
                    point.latitude, point.longitude, e
                );
                None
            }
        }
    }
}
