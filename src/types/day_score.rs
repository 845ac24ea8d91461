//! Per-day scoring result types and their discrete labels.

use crate::types::observation::WeatherObservation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete favourability class derived from a score.
///
/// The classes partition `[0, 1]` into four contiguous intervals:
/// `LAAG` `[0, 0.25)`, `MATIG` `[0.25, 0.5)`, `GOED` `[0.5, 0.75)` and
/// `TOP` `[0.75, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MigrationClass {
    Top,
    Goed,
    Matig,
    Laag,
}

impl fmt::Display for MigrationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MigrationClass::Top => "TOP",
            MigrationClass::Goed => "GOED",
            MigrationClass::Matig => "MATIG",
            MigrationClass::Laag => "LAAG",
        };
        write!(f, "{label}")
    }
}

/// Expected flight altitude of migrating birds, derived from wind speed.
///
/// Stronger wind pushes birds lower, where they are easier to observe, until
/// the wind gets strong enough to stop migration altogether.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlightAltitude {
    /// ≥ 50 km/h (7 Bft and up): migration suppressed.
    #[serde(rename = "suppressed")]
    Suppressed,
    /// 29–49 km/h (5–6 Bft): birds fly low and are well observable.
    #[serde(rename = "low/observable")]
    Low,
    /// 12–28 km/h (3–4 Bft): mid altitude.
    #[serde(rename = "middle")]
    Middle,
    /// Below 12 km/h: birds fly high and are hard to see.
    #[serde(rename = "high/hard to see")]
    High,
}

impl fmt::Display for FlightAltitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FlightAltitude::Suppressed => "suppressed",
            FlightAltitude::Low => "low/observable",
            FlightAltitude::Middle => "middle",
            FlightAltitude::High => "high/hard to see",
        };
        write!(f, "{label}")
    }
}

/// The score of one grid point for one forecast day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayScore {
    /// Days since the run date, starting at 0.
    pub day_offset: usize,
    /// Favourability in `[0, 1]`, rounded to 3 decimals.
    pub score: f64,
    /// Confidence in `[0, 1]`, rounded to 3 decimals. `0.3` marks missing weather.
    pub confidence: f64,
    pub class: MigrationClass,
    pub flight_altitude_label: FlightAltitude,
    /// Whether the point lies inside the regional (BE/NL coast) zone.
    pub in_regional_zone: bool,
    /// The sampled observation, or `None` when no usable data was fetched.
    pub weather: Option<WeatherObservation>,
}

impl DayScore {
    /// Whether this day was scored from real weather rather than the neutral sentinel.
    pub fn has_weather(&self) -> bool {
        self.weather.is_some()
    }
}
