//! The weighted multi-factor scoring model.
//!
//! One model covers both historical variants: the basic five-factor model and
//! the extended eight-factor model with a regional correction for the BE/NL
//! coast. The variant selects which factors are available; the point's
//! position relative to the [`RegionalZone`] selects the weight set and the
//! wind formulas.

use crate::forecast::extractor::{BLH_DEFAULT, CAPE_DEFAULT};
use crate::scoring::factors;
use crate::scoring::labels::{flight_altitude, score_to_class};
use crate::types::day_score::DayScore;
use crate::types::observation::WeatherObservation;
use crate::utils::{clamp, round3};
use bon::Builder;

/// Score reported when no weather is available.
pub const UNKNOWN_SCORE: f64 = 0.5;
/// Confidence reported when no weather is available.
pub const UNKNOWN_CONFIDENCE: f64 = 0.3;

/// Pressure assumed when an observation carries none, hPa.
pub const PRESSURE_FALLBACK: f64 = 1013.0;

/// Weight of each sub-score in the final sum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorWeights {
    pub wind_direction: f64,
    pub wind_speed: f64,
    pub precipitation: f64,
    pub visibility: f64,
    pub temperature: f64,
    pub pressure: f64,
    pub boundary_layer_height: f64,
    pub cape: f64,
}

impl FactorWeights {
    /// Five factors, no pressure/BLH/CAPE.
    pub const BASIC: FactorWeights = FactorWeights {
        wind_direction: 0.40,
        wind_speed: 0.15,
        precipitation: 0.25,
        visibility: 0.10,
        temperature: 0.10,
        pressure: 0.0,
        boundary_layer_height: 0.0,
        cape: 0.0,
    };

    /// Eight factors, outside the regional zone.
    pub const EXTENDED_GENERAL: FactorWeights = FactorWeights {
        wind_direction: 0.35,
        wind_speed: 0.10,
        precipitation: 0.20,
        visibility: 0.10,
        temperature: 0.05,
        pressure: 0.10,
        boundary_layer_height: 0.05,
        cape: 0.05,
    };

    /// Eight factors, inside the regional zone. Direction dominates because the
    /// tailwind corridor is the main discriminator there.
    pub const EXTENDED_REGIONAL: FactorWeights = FactorWeights {
        wind_direction: 0.40,
        wind_speed: 0.05,
        precipitation: 0.20,
        visibility: 0.10,
        temperature: 0.05,
        pressure: 0.10,
        boundary_layer_height: 0.05,
        cape: 0.05,
    };

    pub fn sum(&self) -> f64 {
        self.wind_direction
            + self.wind_speed
            + self.precipitation
            + self.visibility
            + self.temperature
            + self.pressure
            + self.boundary_layer_height
            + self.cape
    }
}

/// Rectangular zone (inclusive bounds) where the regional wind model applies.
///
/// Defaults to the Belgium/Netherlands coastal lowlands.
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct RegionalZone {
    #[builder(default = 49.5)]
    pub lat_min: f64,
    #[builder(default = 53.5)]
    pub lat_max: f64,
    #[builder(default = 2.0)]
    pub lon_min: f64,
    #[builder(default = 8.0)]
    pub lon_max: f64,
}

impl Default for RegionalZone {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RegionalZone {
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.lat_min..=self.lat_max).contains(&lat) && (self.lon_min..=self.lon_max).contains(&lon)
    }
}

/// Which factors the model uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelVariant {
    /// Direction, speed, precipitation, visibility and temperature with the
    /// general wind formulas everywhere.
    Basic,
    /// Adds pressure, boundary-layer height and CAPE, and switches to the
    /// regional wind formulas inside the [`RegionalZone`].
    #[default]
    Extended,
}

/// Favourability and confidence, both in `[0, 1]` and rounded to 3 decimals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub score: f64,
    pub confidence: f64,
}

impl Score {
    /// The sentinel for a point/day without weather.
    pub const UNKNOWN: Score = Score {
        score: UNKNOWN_SCORE,
        confidence: UNKNOWN_CONFIDENCE,
    };
}

/// A configured scoring engine.
///
/// # Examples
///
/// ```
/// use migration_raster::{ModelVariant, ScoringModel, WeatherObservation};
///
/// let model = ScoringModel::builder().variant(ModelVariant::Basic).build();
/// let observation = WeatherObservation {
///     temperature_2m: 14.0,
///     wind_speed_10m: 15.0,
///     wind_direction_10m: 180.0,
///     precipitation: 0.0,
///     visibility: 10_000.0,
///     cloud_cover: 20.0,
///     pressure_msl: None,
///     cape: None,
///     boundary_layer_height: None,
/// };
/// let score = model.compute_score(Some(&observation), 40.0, -3.9);
/// assert_eq!(score.score, 1.0);
///
/// let unknown = model.compute_score(None, 40.0, -3.9);
/// assert_eq!((unknown.score, unknown.confidence), (0.5, 0.3));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Builder)]
pub struct ScoringModel {
    #[builder(default)]
    pub variant: ModelVariant,
    #[builder(default)]
    pub zone: RegionalZone,
}

impl ScoringModel {
    /// Whether the regional formulas and weights apply at `(lat, lon)`.
    pub fn uses_regional_model(&self, lat: f64, lon: f64) -> bool {
        self.variant == ModelVariant::Extended && self.zone.contains(lat, lon)
    }

    pub fn weights(&self, lat: f64, lon: f64) -> FactorWeights {
        match self.variant {
            ModelVariant::Basic => FactorWeights::BASIC,
            ModelVariant::Extended if self.zone.contains(lat, lon) => {
                FactorWeights::EXTENDED_REGIONAL
            }
            ModelVariant::Extended => FactorWeights::EXTENDED_GENERAL,
        }
    }

    /// Scores one observation at `(lat, lon)`.
    ///
    /// A missing observation yields [`Score::UNKNOWN`] (0.5, 0.3).
    pub fn compute_score(
        &self,
        observation: Option<&WeatherObservation>,
        lat: f64,
        lon: f64,
    ) -> Score {
        let Some(obs) = observation else {
            return Score::UNKNOWN;
        };
        let weights = self.weights(lat, lon);
        let regional = self.uses_regional_model(lat, lon);

        let (direction, speed) = if regional {
            (
                factors::wind_direction_regional(obs.wind_direction_10m),
                factors::wind_speed_regional(obs.wind_speed_10m),
            )
        } else {
            (
                factors::wind_direction_general(obs.wind_direction_10m),
                factors::wind_speed_general(obs.wind_speed_10m),
            )
        };

        let mut total = weights.wind_direction * direction
            + weights.wind_speed * speed
            + weights.precipitation * factors::precipitation(obs.precipitation)
            + weights.visibility * factors::visibility(obs.visibility)
            + weights.temperature * factors::temperature(obs.temperature_2m);

        if self.variant == ModelVariant::Extended {
            let pressure = obs.pressure_msl.unwrap_or(PRESSURE_FALLBACK);
            let blh = obs.boundary_layer_height.unwrap_or(BLH_DEFAULT);
            let cape = obs.cape.unwrap_or(CAPE_DEFAULT);
            total += weights.pressure * factors::pressure(pressure)
                + weights.boundary_layer_height * factors::boundary_layer_height(blh)
                + weights.cape * factors::cape(cape);
        }

        let score = clamp(total, 0.0, 1.0);
        let confidence = clamp(0.5 + 0.4 * score.sqrt(), 0.0, 1.0);
        Score {
            score: round3(score),
            confidence: round3(confidence),
        }
    }

    /// Scores one day of one point and attaches its labels.
    pub fn day_score(
        &self,
        day_offset: usize,
        observation: Option<WeatherObservation>,
        lat: f64,
        lon: f64,
    ) -> DayScore {
        let Score { score, confidence } = self.compute_score(observation.as_ref(), lat, lon);
        let wind_speed = observation
            .as_ref()
            .map(|obs| obs.wind_speed_10m)
            .unwrap_or(0.0);
        DayScore {
            day_offset,
            score,
            confidence,
            class: score_to_class(score),
            flight_altitude_label: flight_altitude(wind_speed),
            in_regional_zone: self.zone.contains(lat, lon),
            weather: observation,
        }
    }
}

/// Scores an observation with the default (extended) model.
pub fn compute_score(observation: Option<&WeatherObservation>, lat: f64, lon: f64) -> Score {
    ScoringModel::default().compute_score(observation, lat, lon)
}
