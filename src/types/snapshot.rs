//! The persisted snapshot document and its parts.

use crate::types::day_score::DayScore;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// All day scores for one surviving grid point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointResult {
    pub latitude: f64,
    pub longitude: f64,
    /// One entry per forecast day, indexed by `day_offset`.
    pub days: Vec<DayScore>,
}

/// Grid-wide average for one forecast day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayAggregate {
    pub date: NaiveDate,
    pub day_offset: usize,
    pub aggregate_score: f64,
    pub aggregate_confidence: f64,
}

/// Lattice parameters recorded alongside the results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterInfo {
    pub anchor_lat: f64,
    pub anchor_lon: f64,
    pub lat_step: f64,
    pub lon_step: f64,
    pub point_count: usize,
    pub forecast_days: usize,
}

/// The complete output of one pipeline run.
///
/// Serializes with fields in declaration order, which is the key order of the
/// JSON file read by dashboards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub updated_at: DateTime<Utc>,
    pub ttl_minutes: u32,
    pub source: String,
    pub raster: RasterInfo,
    pub day_aggregates: Vec<DayAggregate>,
    pub grid_points: Vec<PointResult>,
}
