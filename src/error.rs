use crate::forecast::error::ForecastError;
use crate::grid::error::GridError;
use crate::snapshot::error::SnapshotError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error("Pipeline run was cancelled before all grid points were scored")]
    Cancelled,
}
