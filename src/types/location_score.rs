use crate::types::day_score::{FlightAltitude, MigrationClass};
use crate::types::observation::WeatherObservation;
use serde::{Deserialize, Serialize};

/// Current-instant score for an arbitrary coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationScore {
    pub latitude: f64,
    pub longitude: f64,
    pub score: f64,
    pub confidence: f64,
    pub class: MigrationClass,
    /// `#rrggbb` display color for `score`.
    pub color: String,
    pub flight_altitude_label: FlightAltitude,
    pub in_regional_zone: bool,
    pub weather: Option<WeatherObservation>,
}
