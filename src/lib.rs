mod config;
mod error;
mod forecast;
mod grid;
mod migration;
mod pipeline;
mod scoring;
mod snapshot;
mod types;
mod utils;

pub use error::MigrationError;
pub use migration::*;

pub use config::RefreshSettings;

pub use grid::build_grid::{build_grid_points, GridConfig};
pub use grid::error::GridError;
pub use grid::land_filter::{classify_timezone, LandClass, LandFilter, TimezoneLookup, TzfLookup};

pub use forecast::error::ForecastError;
pub use forecast::extractor::{midday_index, CurrentConditions, HourlyForecast};
pub use forecast::fetcher::{ForecastFetcher, ForecastSource, DEFAULT_FORECAST_URL};

pub use scoring::factors;
pub use scoring::labels::{flight_altitude, score_to_class, score_to_color};
pub use scoring::model::{compute_score, FactorWeights, ModelVariant, RegionalZone, Score, ScoringModel};

pub use pipeline::aggregate::{aggregate_days, build_snapshot, day_dates, score_grid, score_point};

pub use snapshot::error::SnapshotError;
pub use snapshot::index::SnapshotIndex;
pub use snapshot::writer::{
    read_snapshot, stage_snapshot, write_snapshot, StagedSnapshot, DEFAULT_OUTPUT_PATH,
};

pub use types::day_score::{DayScore, FlightAltitude, MigrationClass};
pub use types::grid_point::GridPoint;
pub use types::location_score::LocationScore;
pub use types::observation::WeatherObservation;
pub use types::snapshot::{DayAggregate, PointResult, RasterInfo, Snapshot};
