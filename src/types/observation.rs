//! Defines the [`WeatherObservation`] consumed by the scoring engine.

use serde::{Deserialize, Serialize};

/// One set of weather variables for one coordinate at one moment in time.
///
/// Field names match the forecast provider's variable names so the struct
/// serializes to the same keys the provider uses. The extended variables
/// (`pressure_msl`, `cape`, `boundary_layer_height`) are only present for
/// forecast-mode observations; current-instant observations leave them empty
/// and they are omitted from the serialized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    /// Air temperature at 2 m, °C.
    pub temperature_2m: f64,
    /// Wind speed at 10 m, km/h.
    pub wind_speed_10m: f64,
    /// Direction the wind blows *from* at 10 m, degrees (0 = north).
    pub wind_direction_10m: f64,
    /// Precipitation, mm over the preceding hour.
    pub precipitation: f64,
    /// Horizontal visibility, meters.
    pub visibility: f64,
    /// Total cloud cover, percent.
    pub cloud_cover: f64,
    /// Sea-level pressure, hPa.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure_msl: Option<f64>,
    /// Convective available potential energy, J/kg.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cape: Option<f64>,
    /// Boundary-layer height, meters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundary_layer_height: Option<f64>,
}
