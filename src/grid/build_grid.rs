//! Generates the fixed lattice of candidate grid points.
//!
//! The lattice is anchored on a reference coordinate (Tarifa, Spain, by default)
//! and extends outward in steps of `lat_step`/`lon_step` until it leaves the
//! bounding box. Every generated coordinate is rounded to one decimal place so
//! that repeated additions of the step never produce near-duplicate points.

use crate::grid::error::GridError;
use crate::types::grid_point::GridPoint;
use crate::utils::round1;
use bon::Builder;
use haversine::{distance, Location as HaversineLocation, Units};
use std::cmp::Ordering;

pub const DEFAULT_ANCHOR_LAT: f64 = 36.0;
pub const DEFAULT_ANCHOR_LON: f64 = -5.6;
pub const DEFAULT_LAT_STEP: f64 = 1.0;
pub const DEFAULT_LON_STEP: f64 = 1.3;
pub const DEFAULT_LAT_MIN: f64 = 35.0;
pub const DEFAULT_LAT_MAX: f64 = 56.0;
pub const DEFAULT_LON_MIN: f64 = -9.5;
pub const DEFAULT_LON_MAX: f64 = 15.3;

/// Lattice coordinates are rounded to this many degrees, so no step may be finer.
pub const MIN_STEP: f64 = 0.1;

/// Lattice definition: anchor, step sizes and the inclusive bounding box.
///
/// The defaults describe the Western European raster (≈ 100 × 100 km cells)
/// anchored on Tarifa.
///
/// # Examples
///
/// ```
/// use migration_raster::GridConfig;
///
/// let config = GridConfig::builder()
///     .lat_min(35.0)
///     .lat_max(38.0)
///     .lon_min(-7.0)
///     .lon_max(-4.0)
///     .build();
/// let points = config.lattice_points().unwrap();
/// assert!(points.iter().any(|p| p.latitude == 36.0 && p.longitude == -5.6));
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct GridConfig {
    #[builder(default = DEFAULT_ANCHOR_LAT)]
    pub anchor_lat: f64,
    #[builder(default = DEFAULT_ANCHOR_LON)]
    pub anchor_lon: f64,
    #[builder(default = DEFAULT_LAT_STEP)]
    pub lat_step: f64,
    #[builder(default = DEFAULT_LON_STEP)]
    pub lon_step: f64,
    #[builder(default = DEFAULT_LAT_MIN)]
    pub lat_min: f64,
    #[builder(default = DEFAULT_LAT_MAX)]
    pub lat_max: f64,
    #[builder(default = DEFAULT_LON_MIN)]
    pub lon_min: f64,
    #[builder(default = DEFAULT_LON_MAX)]
    pub lon_max: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl GridConfig {
    /// Checks that steps are at least [`MIN_STEP`] and bounds are ordered.
    pub fn validate(&self) -> Result<(), GridError> {
        if !self.anchor_lat.is_finite() || !self.anchor_lon.is_finite() {
            return Err(GridError::InvalidAnchor {
                lat: self.anchor_lat,
                lon: self.anchor_lon,
            });
        }
        for (axis, step) in [("latitude", self.lat_step), ("longitude", self.lon_step)] {
            if !step.is_finite() || step < MIN_STEP {
                return Err(GridError::InvalidStep { axis, step });
            }
        }
        for (axis, min, max) in [
            ("latitude", self.lat_min, self.lat_max),
            ("longitude", self.lon_min, self.lon_max),
        ] {
            if !min.is_finite() || !max.is_finite() || min > max {
                return Err(GridError::InvalidBounds { axis, min, max });
            }
        }
        Ok(())
    }

    /// Returns the unfiltered lattice, sorted by latitude then longitude.
    pub fn lattice_points(&self) -> Result<Vec<GridPoint>, GridError> {
        build_grid_points(self)
    }

    /// Approximate cell size in kilometers `(north-south, east-west)` at the anchor.
    pub fn cell_size_km(&self) -> (f64, f64) {
        let (lat, lon) = (self.anchor_lat, self.anchor_lon);
        (
            distance(
                location(lat, lon),
                location(lat + self.lat_step, lon),
                Units::Kilometers,
            ),
            distance(
                location(lat, lon),
                location(lat, lon + self.lon_step),
                Units::Kilometers,
            ),
        )
    }
}

fn location(latitude: f64, longitude: f64) -> HaversineLocation {
    HaversineLocation {
        latitude,
        longitude,
    }
}

/// Builds the Cartesian product of the latitude and longitude axes of `config`.
///
/// Both axes are walked outward from the anchor in both directions, so the
/// anchor itself is always a grid point when it lies inside the bounds.
pub fn build_grid_points(config: &GridConfig) -> Result<Vec<GridPoint>, GridError> {
    config.validate()?;
    let lats = axis_values(config.anchor_lat, config.lat_step, config.lat_min, config.lat_max);
    let lons = axis_values(config.anchor_lon, config.lon_step, config.lon_min, config.lon_max);

    let mut points = Vec::with_capacity(lats.len() * lons.len());
    for &lat in &lats {
        for &lon in &lons {
            points.push(GridPoint::new(lat, lon));
        }
    }
    Ok(points)
}

/// All rounded values `anchor + n * step` inside `[min, max]`, ascending.
fn axis_values(anchor: f64, step: f64, min: f64, max: f64) -> Vec<f64> {
    let mut values = Vec::new();

    let mut n: i64 = 0;
    loop {
        let value = round1(anchor + n as f64 * step);
        if value > max {
            break;
        }
        if value >= min {
            values.push(value);
        }
        n += 1;
    }

    let mut n: i64 = -1;
    loop {
        let value = round1(anchor + n as f64 * step);
        if value < min {
            break;
        }
        if value <= max {
            values.push(value);
        }
        n -= 1;
    }

    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    values.dedup();
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_on_axis(value: f64, anchor: f64, step: f64) -> bool {
        let steps = (value - anchor) / step;
        // Rounding to 0.1° can shift a value by up to 0.05°.
        (steps - steps.round()).abs() * step <= 0.05 + 1e-9
    }

    #[test]
    fn test_default_grid_contains_tarifa_anchor() {
        let points = GridConfig::default().lattice_points().unwrap();
        assert!(points
            .iter()
            .any(|p| p.latitude == 36.0 && p.longitude == -5.6));
    }

    #[test]
    fn test_default_grid_points_lie_on_lattice_within_bounds() {
        let config = GridConfig::default();
        let points = config.lattice_points().unwrap();
        assert!(!points.is_empty());
        for p in &points {
            assert!(p.latitude >= config.lat_min && p.latitude <= config.lat_max);
            assert!(p.longitude >= config.lon_min && p.longitude <= config.lon_max);
            assert!(is_on_axis(p.latitude, config.anchor_lat, config.lat_step), "{p:?}");
            assert!(is_on_axis(p.longitude, config.anchor_lon, config.lon_step), "{p:?}");
        }
    }

    #[test]
    fn test_default_grid_axis_sizes() {
        // 35.0..=56.0 in whole degrees, and -9.5..=15.3 in 1.3° steps from -5.6.
        let lats = axis_values(36.0, 1.0, 35.0, 56.0);
        let lons = axis_values(-5.6, 1.3, -9.5, 15.3);
        assert_eq!(lats.len(), 22);
        assert_eq!(lats.first(), Some(&35.0));
        assert_eq!(lats.last(), Some(&56.0));
        assert_eq!(lons.first(), Some(&-9.5));
        assert_eq!(lons.last(), Some(&15.2));
        assert_eq!(lons.len(), 20);
        assert_eq!(
            GridConfig::default().lattice_points().unwrap().len(),
            lats.len() * lons.len()
        );
    }

    #[test]
    fn test_points_sorted_and_unique() {
        let points = GridConfig::default().lattice_points().unwrap();
        for pair in points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let ordered = a.latitude < b.latitude
                || (a.latitude == b.latitude && a.longitude < b.longitude);
            assert!(ordered, "{a:?} before {b:?}");
        }
    }

    #[test]
    fn test_anchor_outside_bounds_still_defines_lattice() {
        let config = GridConfig::builder()
            .anchor_lat(30.0)
            .anchor_lon(0.0)
            .lat_step(2.0)
            .lon_step(2.5)
            .lat_min(41.0)
            .lat_max(45.0)
            .lon_min(1.0)
            .lon_max(6.0)
            .build();
        let points = config.lattice_points().unwrap();
        let lats: Vec<f64> = axis_values(30.0, 2.0, 41.0, 45.0);
        let lons: Vec<f64> = axis_values(0.0, 2.5, 1.0, 6.0);
        assert_eq!(lats, vec![42.0, 44.0]);
        assert_eq!(lons, vec![2.5, 5.0]);
        assert_eq!(points.len(), 4);
    }

    #[test]
    fn test_invalid_step_is_rejected() {
        let config = GridConfig::builder().lat_step(0.0).build();
        assert_eq!(
            config.lattice_points(),
            Err(GridError::InvalidStep {
                axis: "latitude",
                step: 0.0
            })
        );
        let config = GridConfig::builder().lon_step(f64::NAN).build();
        assert!(matches!(
            config.lattice_points(),
            Err(GridError::InvalidStep { axis: "longitude", .. })
        ));
    }

    #[test]
    fn test_step_below_coordinate_resolution_is_rejected() {
        let config = GridConfig::builder().lon_step(1e-17).build();
        assert!(matches!(
            config.lattice_points(),
            Err(GridError::InvalidStep { axis: "longitude", .. })
        ));
        let config = GridConfig::builder().lat_step(0.05).build();
        assert!(matches!(
            config.validate(),
            Err(GridError::InvalidStep { axis: "latitude", .. })
        ));
        let config = GridConfig::builder().lat_step(MIN_STEP).lon_step(MIN_STEP).build();
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_quarter_degree_steps_round_half_to_even() {
        assert_eq!(axis_values(0.0, 0.25, 0.0, 1.0), vec![0.0, 0.2, 0.5, 0.8, 1.0]);
    }

    #[test]
    fn test_inverted_bounds_are_rejected() {
        let config = GridConfig::builder().lon_min(10.0).lon_max(-10.0).build();
        assert!(matches!(
            config.lattice_points(),
            Err(GridError::InvalidBounds { axis: "longitude", .. })
        ));
    }

    #[test]
    fn test_cell_size_is_roughly_a_hundred_km() {
        let (north_south, east_west) = GridConfig::default().cell_size_km();
        assert!((north_south - 111.0).abs() < 2.0, "{north_south}");
        assert!(east_west > 100.0 && east_west < 125.0, "{east_west}");
    }
}
