//! The main entry point: builds the raster, scores it and writes the snapshot.

use crate::config::{DEFAULT_FORECAST_DAYS, DEFAULT_MAX_WORKERS};
use crate::error::MigrationError;
use crate::forecast::fetcher::{
    ForecastFetcher, ForecastSource, DEFAULT_FORECAST_URL, DEFAULT_REQUEST_TIMEOUT_SECONDS,
};
use crate::grid::build_grid::GridConfig;
use crate::grid::land_filter::LandFilter;
use crate::pipeline::aggregate::{build_snapshot, score_grid, score_point};
use crate::scoring::labels::score_to_color;
use crate::scoring::model::{ModelVariant, ScoringModel};
use crate::snapshot::writer::write_snapshot;
use crate::types::grid_point::GridPoint;
use crate::types::location_score::LocationScore;
use crate::types::observation::WeatherObservation;
use crate::types::snapshot::{PointResult, Snapshot};
use bon::bon;
use chrono::Utc;
use log::info;
use std::path::Path;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_TTL_MINUTES: u32 = 60;
pub const DEFAULT_SOURCE_TAG: &str = "migration-raster-tarifa";

/// The migration favourability raster.
///
/// Owns the lattice definition, the land filter, the forecast fetcher and
/// the scoring model. Every run is a pure function of this configuration and
/// the time it starts; nothing is carried over between runs.
///
/// # Examples
///
/// ```no_run
/// use migration_raster::{MigrationError, MigrationRaster};
/// use std::path::Path;
///
/// # async fn run() -> Result<(), MigrationError> {
/// let raster = MigrationRaster::builder().forecast_days(3).build()?;
/// let snapshot = raster.refresh(Path::new("data/migration/latest.json")).await?;
/// for day in &snapshot.day_aggregates {
///     println!("{}: {:.3}", day.date, day.aggregate_score);
/// }
/// # Ok(())
/// # }
/// ```
pub struct MigrationRaster {
    grid: GridConfig,
    land_filter: LandFilter,
    fetcher: ForecastFetcher,
    scoring: ScoringModel,
    forecast_days: usize,
    max_workers: usize,
    ttl_minutes: u32,
    source_tag: String,
}

#[bon]
impl MigrationRaster {
    /// Creates a raster from its configuration.
    ///
    /// Every setting has a default; `land_filter` defaults to the embedded
    /// timezone lookup, which takes a moment to load.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::Grid`] if the grid configuration is invalid and
    /// [`MigrationError::Forecast`] if the HTTP client cannot be created.
    #[builder]
    pub fn new(
        #[builder(default)] grid: GridConfig,
        #[builder(default)] scoring: ScoringModel,
        #[builder(default = DEFAULT_FORECAST_DAYS)] forecast_days: usize,
        #[builder(default = DEFAULT_MAX_WORKERS)] max_workers: usize,
        #[builder(default = Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECONDS))]
        request_timeout: Duration,
        #[builder(into, default = DEFAULT_FORECAST_URL.to_string())] forecast_url: String,
        #[builder(default = DEFAULT_TTL_MINUTES)] ttl_minutes: u32,
        #[builder(into, default = DEFAULT_SOURCE_TAG.to_string())] source_tag: String,
        land_filter: Option<LandFilter>,
    ) -> Result<Self, MigrationError> {
        grid.validate()?;
        let fetcher = ForecastFetcher::new(forecast_url, request_timeout)?;
        Ok(Self {
            grid,
            land_filter: land_filter.unwrap_or_default(),
            fetcher,
            scoring,
            forecast_days,
            max_workers: max_workers.max(1),
            ttl_minutes,
            source_tag,
        })
    }

    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    pub fn scoring(&self) -> &ScoringModel {
        &self.scoring
    }

    pub fn forecast_days(&self) -> usize {
        self.forecast_days
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// The lattice points that pass the land filter, in lattice order.
    pub fn grid_points(&self) -> Result<Vec<GridPoint>, MigrationError> {
        let lattice = self.grid.lattice_points()?;
        let points = self.land_filter.filter_points(&lattice);
        info!(
            "Grid has {} land points out of {} lattice points",
            points.len(),
            lattice.len()
        );
        Ok(points)
    }

    /// Fetches and scores every land point and assembles a snapshot.
    pub async fn build_snapshot(&self) -> Result<Snapshot, MigrationError> {
        self.build_snapshot_with_cancel(&CancellationToken::new())
            .await
    }

    /// Like [`MigrationRaster::build_snapshot`], but stops early with
    /// [`MigrationError::Cancelled`] once `cancel` fires.
    pub async fn build_snapshot_with_cancel(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Snapshot, MigrationError> {
        let run_started = Utc::now();
        let points = self.grid_points()?;
        let results = score_grid(
            &self.fetcher,
            &self.scoring,
            &points,
            self.forecast_days,
            self.max_workers,
            cancel,
        )
        .await?;
        Ok(build_snapshot(
            results,
            &self.grid,
            self.forecast_days,
            run_started,
            self.ttl_minutes,
            self.source_tag.as_str(),
        ))
    }

    /// Runs the pipeline once and atomically replaces the snapshot at `path`.
    pub async fn refresh(&self, path: &Path) -> Result<Snapshot, MigrationError> {
        self.refresh_with_cancel(path, &CancellationToken::new())
            .await
    }

    /// Like [`MigrationRaster::refresh`]; a cancelled run writes nothing.
    pub async fn refresh_with_cancel(
        &self,
        path: &Path,
        cancel: &CancellationToken,
    ) -> Result<Snapshot, MigrationError> {
        let snapshot = self.build_snapshot_with_cancel(cancel).await?;
        write_snapshot(&snapshot, path).await?;
        Ok(snapshot)
    }

    /// Multi-day forecast scores for any coordinate, on or off the lattice.
    pub async fn forecast_location(&self, latitude: f64, longitude: f64) -> PointResult {
        score_point(
            &self.fetcher,
            &self.scoring,
            GridPoint::new(latitude, longitude),
            self.forecast_days,
        )
        .await
    }

    /// Scores the current weather at a coordinate with the basic model.
    pub async fn score_location(&self, latitude: f64, longitude: f64) -> LocationScore {
        let observation = self
            .fetcher
            .current_observation(GridPoint::new(latitude, longitude))
            .await;
        current_location_score(&self.scoring, observation, latitude, longitude)
    }
}

fn current_location_score(
    scoring: &ScoringModel,
    observation: Option<WeatherObservation>,
    latitude: f64,
    longitude: f64,
) -> LocationScore {
    let model = ScoringModel::builder()
        .variant(ModelVariant::Basic)
        .zone(scoring.zone.clone())
        .build();
    let day = model.day_score(0, observation, latitude, longitude);
    LocationScore {
        latitude,
        longitude,
        score: day.score,
        confidence: day.confidence,
        class: day.class,
        color: score_to_color(day.score),
        flight_altitude_label: day.flight_altitude_label,
        in_regional_zone: day.in_regional_zone,
        weather: day.weather,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::land_filter::TimezoneLookup;
    use crate::snapshot::writer::read_snapshot;
    use crate::types::day_score::MigrationClass;

    /// Treats a small box around Brussels as land and everything else as sea.
    struct BeneluxOnly;

    impl TimezoneLookup for BeneluxOnly {
        fn timezone_at(&self, lat: f64, lon: f64) -> Option<&str> {
            if (50.0..=52.0).contains(&lat) && (3.0..=6.0).contains(&lon) {
                Some("Europe/Brussels")
            } else {
                Some("Etc/GMT")
            }
        }
    }

    fn offline_raster(forecast_days: usize) -> MigrationRaster {
        // Nothing listens on the discard port, so every fetch fails fast.
        MigrationRaster::builder()
            .forecast_days(forecast_days)
            .max_workers(4)
            .request_timeout(Duration::from_secs(2))
            .forecast_url("http://127.0.0.1:9/v1/forecast")
            .source_tag("test")
            .land_filter(LandFilter::new(BeneluxOnly))
            .build()
            .unwrap()
    }

    #[test]
    fn test_invalid_grid_is_rejected_at_construction() {
        let result = MigrationRaster::builder()
            .grid(GridConfig::builder().lat_step(-1.0).build())
            .land_filter(LandFilter::new(BeneluxOnly))
            .build();
        assert!(matches!(result, Err(MigrationError::Grid(_))));
    }

    #[test]
    fn test_grid_points_are_filtered_lattice_points() {
        let raster = offline_raster(2);
        let points = raster.grid_points().unwrap();
        let lattice = raster.grid().lattice_points().unwrap();
        assert!(!points.is_empty());
        assert!(points.len() < lattice.len());
        assert!(points.iter().all(|p| lattice.contains(p)));
        assert!(points
            .iter()
            .all(|p| (50.0..=52.0).contains(&p.latitude) && (3.0..=6.0).contains(&p.longitude)));
    }

    #[tokio::test]
    async fn test_degraded_run_still_writes_complete_snapshot() {
        let raster = offline_raster(2);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("migration").join("latest.json");

        let snapshot = raster.refresh(&path).await.unwrap();
        let expected_points = raster.grid_points().unwrap().len();
        assert_eq!(snapshot.raster.point_count, expected_points);
        assert_eq!(snapshot.grid_points.len(), expected_points);
        assert_eq!(snapshot.source, "test");
        assert_eq!(snapshot.ttl_minutes, 60);
        for point in &snapshot.grid_points {
            assert_eq!(point.days.len(), 2);
            for day in &point.days {
                assert_eq!((day.score, day.confidence), (0.5, 0.3));
                assert!(day.weather.is_none());
            }
        }
        for aggregate in &snapshot.day_aggregates {
            assert_eq!(aggregate.aggregate_score, 0.5);
            assert_eq!(aggregate.aggregate_confidence, 0.3);
        }
        assert_eq!(read_snapshot(&path).await.unwrap(), snapshot);
    }

    #[tokio::test]
    async fn test_cancelled_refresh_writes_nothing() {
        let raster = offline_raster(1);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latest.json");
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = raster.refresh_with_cancel(&path, &cancel).await;
        assert!(matches!(result, Err(MigrationError::Cancelled)));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_offline_location_lookups_are_unknown() {
        let raster = offline_raster(3);
        let forecast = raster.forecast_location(51.2, 4.4).await;
        assert_eq!(forecast.days.len(), 3);
        assert!(forecast.days.iter().all(|day| !day.has_weather()));

        let current = raster.score_location(51.2, 4.4).await;
        assert_eq!((current.score, current.confidence), (0.5, 0.3));
        assert_eq!(current.class, MigrationClass::Goed);
        assert_eq!(current.color, "#00ff00");
        assert!(current.in_regional_zone);
    }

    #[test]
    fn test_current_location_score_uses_basic_model() {
        let observation = WeatherObservation {
            temperature_2m: 14.0,
            wind_speed_10m: 15.0,
            wind_direction_10m: 0.0,
            precipitation: 0.0,
            visibility: 10_000.0,
            cloud_cover: 50.0,
            pressure_msl: None,
            cape: None,
            boundary_layer_height: None,
        };
        let score =
            current_location_score(&ScoringModel::default(), Some(observation), 40.0, -3.9);
        assert_eq!(score.score, 0.6);
        assert_eq!(score.class, MigrationClass::Goed);
        assert!(!score.in_regional_zone);
        assert!(score.weather.is_some());
    }
}
