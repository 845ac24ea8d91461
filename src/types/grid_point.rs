//! Defines [`GridPoint`], a single sample location on the analysis lattice.

use serde::{Deserialize, Serialize};

/// A fixed (latitude, longitude) sample location on the raster.
///
/// Coordinates are always rounded to one decimal place by the grid builder, so
/// two points generated from the same lattice compare equal exactly.
///
/// # Examples
///
/// ```
/// use migration_raster::GridPoint;
///
/// let tarifa = GridPoint::new(36.0, -5.6);
/// assert_eq!(tarifa.latitude, 36.0);
/// assert_eq!(tarifa.longitude, -5.6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    /// Latitude in decimal degrees (positive for North).
    pub latitude: f64,
    /// Longitude in decimal degrees (positive for East).
    pub longitude: f64,
}

impl GridPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}
