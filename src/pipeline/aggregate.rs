//! Runs fetch-then-score over the filtered grid and averages the results per day.

use crate::error::MigrationError;
use crate::forecast::fetcher::ForecastSource;
use crate::grid::build_grid::GridConfig;
use crate::scoring::model::{ScoringModel, UNKNOWN_CONFIDENCE, UNKNOWN_SCORE};
use crate::types::grid_point::GridPoint;
use crate::types::snapshot::{DayAggregate, PointResult, RasterInfo, Snapshot};
use crate::utils::round3;
use chrono::{DateTime, Days, NaiveDate, SubsecRound, Utc};
use futures_util::stream::{self, StreamExt};
use log::{debug, info};
use tokio_util::sync::CancellationToken;

/// Fetches one forecast block for `point` and scores every day from it.
///
/// A failed fetch, or a day whose midday sample is incomplete, is scored as
/// unknown weather. This never fails.
pub async fn score_point<S: ForecastSource>(
    source: &S,
    model: &ScoringModel,
    point: GridPoint,
    forecast_days: usize,
) -> PointResult {
    let hourly = source.hourly_forecast(point, forecast_days).await;
    let days = (0..forecast_days)
        .map(|day| {
            let observation = hourly.as_ref().and_then(|forecast| {
                forecast
                    .observation_at(day)
                    .map_err(|e| {
                        debug!(
                            "Day +{} at ({}, {}) has no usable sample: {}",
                            day, point.latitude, point.longitude, e
                        )
                    })
                    .ok()
            });
            model.day_score(day, observation, point.latitude, point.longitude)
        })
        .collect();
    PointResult {
        latitude: point.latitude,
        longitude: point.longitude,
        days,
    }
}

/// Scores all `points` with at most `max_workers` fetches in flight.
///
/// Results come back in the order of `points`.
///
/// # Errors
///
/// Returns [`MigrationError::Cancelled`] if `cancel` fires before every point
/// has been scored; partial results are discarded.
pub async fn score_grid<S: ForecastSource>(
    source: &S,
    model: &ScoringModel,
    points: &[GridPoint],
    forecast_days: usize,
    max_workers: usize,
    cancel: &CancellationToken,
) -> Result<Vec<PointResult>, MigrationError> {
    info!(
        "Scoring {} grid points x {} days with {} workers",
        points.len(),
        forecast_days,
        max_workers
    );
    let work = stream::iter(points.iter().copied())
        .map(|point| score_point(source, model, point, forecast_days))
        .buffered(max_workers.max(1))
        .collect::<Vec<_>>();

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(MigrationError::Cancelled),
        results = work => Ok(results),
    }
}

/// The calendar date of each forecast day, starting at `run_date`.
pub fn day_dates(run_date: NaiveDate, forecast_days: usize) -> Vec<NaiveDate> {
    (0..forecast_days)
        .filter_map(|offset| run_date.checked_add_days(Days::new(offset as u64)))
        .collect()
}

/// Averages every day across the grid.
///
/// The score average includes unknown-weather sentinels; the confidence
/// average only counts points with real weather and falls back to the
/// unknown confidence when there are none.
pub fn aggregate_days(
    results: &[PointResult],
    forecast_days: usize,
    run_date: NaiveDate,
) -> Vec<DayAggregate> {
    day_dates(run_date, forecast_days)
        .into_iter()
        .enumerate()
        .map(|(day_offset, date)| {
            let days: Vec<_> = results
                .iter()
                .filter_map(|point| point.days.get(day_offset))
                .collect();
            let scores: Vec<f64> = days.iter().map(|day| day.score).collect();
            let confidences: Vec<f64> = days
                .iter()
                .filter(|day| day.has_weather())
                .map(|day| day.confidence)
                .collect();
            DayAggregate {
                date,
                day_offset,
                aggregate_score: mean(&scores).map(round3).unwrap_or(UNKNOWN_SCORE),
                aggregate_confidence: mean(&confidences)
                    .map(round3)
                    .unwrap_or(UNKNOWN_CONFIDENCE),
            }
        })
        .collect()
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Assembles the snapshot document for one run.
pub fn build_snapshot(
    results: Vec<PointResult>,
    grid: &GridConfig,
    forecast_days: usize,
    run_started: DateTime<Utc>,
    ttl_minutes: u32,
    source: impl Into<String>,
) -> Snapshot {
    let day_aggregates = aggregate_days(&results, forecast_days, run_started.date_naive());
    Snapshot {
        updated_at: run_started.trunc_subsecs(0),
        ttl_minutes,
        source: source.into(),
        raster: RasterInfo {
            anchor_lat: grid.anchor_lat,
            anchor_lon: grid.anchor_lon,
            lat_step: grid.lat_step,
            lon_step: grid.lon_step,
            point_count: results.len(),
            forecast_days,
        },
        day_aggregates,
        grid_points: results,
    }
}
