//! Turns raw provider blocks into [`WeatherObservation`]s.
//!
//! Forecast mode samples one hour per day, at 12:00 UTC, from the hourly
//! arrays. Any required variable that is missing, too short or null at that
//! hour makes the whole observation unusable; the caller then scores the day
//! with the neutral "unknown" sentinel instead of a partially made-up value.

use crate::forecast::error::ForecastError;
use crate::types::observation::WeatherObservation;
use serde::Deserialize;

pub const HOURS_PER_DAY: usize = 24;
/// Hour of day (UTC) sampled for each forecast day.
pub const MIDDAY_HOUR: usize = 12;

/// Fallback CAPE when the provider does not return it, J/kg.
pub const CAPE_DEFAULT: f64 = 0.0;
/// Fallback boundary-layer height when the provider does not return it, meters.
pub const BLH_DEFAULT: f64 = 500.0;

/// Variables requested in forecast mode, in provider order.
pub const HOURLY_VARIABLES: [&str; 9] = [
    "temperature_2m",
    "wind_speed_10m",
    "wind_direction_10m",
    "precipitation",
    "visibility",
    "cloud_cover",
    "pressure_msl",
    "cape",
    "boundary_layer_height",
];

/// Variables requested in current-instant mode.
pub const CURRENT_VARIABLES: [&str; 6] = [
    "temperature_2m",
    "wind_speed_10m",
    "wind_direction_10m",
    "precipitation",
    "visibility",
    "cloud_cover",
];

type Series = Option<Vec<Option<f64>>>;

/// The `hourly` block of a forecast response: one array per variable,
/// indexed by hours since the start of the first forecast day.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HourlyForecast {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m: Series,
    #[serde(default)]
    pub wind_speed_10m: Series,
    #[serde(default)]
    pub wind_direction_10m: Series,
    #[serde(default)]
    pub precipitation: Series,
    #[serde(default)]
    pub visibility: Series,
    #[serde(default)]
    pub cloud_cover: Series,
    #[serde(default)]
    pub pressure_msl: Series,
    #[serde(default)]
    pub cape: Series,
    #[serde(default)]
    pub boundary_layer_height: Series,
}

/// The `current` block of a current-instant response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CurrentConditions {
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub temperature_2m: Option<f64>,
    #[serde(default)]
    pub wind_speed_10m: Option<f64>,
    #[serde(default)]
    pub wind_direction_10m: Option<f64>,
    #[serde(default)]
    pub precipitation: Option<f64>,
    #[serde(default)]
    pub visibility: Option<f64>,
    #[serde(default)]
    pub cloud_cover: Option<f64>,
}

/// Index into the hourly arrays of 12:00 UTC on `day_index`.
pub fn midday_index(day_index: usize) -> usize {
    day_index * HOURS_PER_DAY + MIDDAY_HOUR
}

fn required_at(variable: &'static str, series: &Series, index: usize) -> Result<f64, ForecastError> {
    let values = series
        .as_ref()
        .ok_or(ForecastError::MissingVariable(variable))?;
    match values.get(index) {
        Some(Some(value)) => Ok(*value),
        Some(None) => Err(ForecastError::NullValue { variable, index }),
        None => Err(ForecastError::HourOutOfRange {
            variable,
            index,
            len: values.len(),
        }),
    }
}

fn optional_at(
    variable: &'static str,
    series: &Series,
    index: usize,
    default: f64,
) -> Result<f64, ForecastError> {
    match series.as_deref() {
        None | Some([]) => Ok(default),
        Some(values) => match values.get(index) {
            Some(value) => Ok(value.unwrap_or(default)),
            None => Err(ForecastError::HourOutOfRange {
                variable,
                index,
                len: values.len(),
            }),
        },
    }
}

impl HourlyForecast {
    /// Extracts the midday observation for `day_index`.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::MissingVariable`], [`ForecastError::HourOutOfRange`]
    /// or [`ForecastError::NullValue`] when a required variable cannot be read.
    /// CAPE and boundary-layer height fall back to [`CAPE_DEFAULT`] and
    /// [`BLH_DEFAULT`] when the provider leaves them out.
    pub fn observation_at(&self, day_index: usize) -> Result<WeatherObservation, ForecastError> {
        let index = midday_index(day_index);
        Ok(WeatherObservation {
            temperature_2m: required_at("temperature_2m", &self.temperature_2m, index)?,
            wind_speed_10m: required_at("wind_speed_10m", &self.wind_speed_10m, index)?,
            wind_direction_10m: required_at("wind_direction_10m", &self.wind_direction_10m, index)?,
            precipitation: required_at("precipitation", &self.precipitation, index)?,
            visibility: required_at("visibility", &self.visibility, index)?,
            cloud_cover: required_at("cloud_cover", &self.cloud_cover, index)?,
            pressure_msl: Some(required_at("pressure_msl", &self.pressure_msl, index)?),
            cape: Some(optional_at("cape", &self.cape, index, CAPE_DEFAULT)?),
            boundary_layer_height: Some(optional_at(
                "boundary_layer_height",
                &self.boundary_layer_height,
                index,
                BLH_DEFAULT,
            )?),
        })
    }
}

impl CurrentConditions {
    /// Converts the current-instant block into an observation without the
    /// extended variables.
    pub fn to_observation(&self) -> Result<WeatherObservation, ForecastError> {
        let required = |variable: &'static str, value: Option<f64>| {
            value.ok_or(ForecastError::MissingVariable(variable))
        };
        Ok(WeatherObservation {
            temperature_2m: required("temperature_2m", self.temperature_2m)?,
            wind_speed_10m: required("wind_speed_10m", self.wind_speed_10m)?,
            wind_direction_10m: required("wind_direction_10m", self.wind_direction_10m)?,
            precipitation: required("precipitation", self.precipitation)?,
            visibility: required("visibility", self.visibility)?,
            cloud_cover: required("cloud_cover", self.cloud_cover)?,
            pressure_msl: None,
            cape: None,
            boundary_layer_height: None,
        })
    }
}
