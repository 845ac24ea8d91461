//! Runs the migration raster pipeline once and writes the snapshot.
//!
//! Configuration comes from `MIGRATION_*` environment variables, and the output
//! path from `BMWT_MIGRATION_OUTPUT_PATH`; logging is controlled with
//! `RUST_LOG` (default `info`).

use anyhow::{Context, Result};
use log::warn;
use migration_raster::{GridConfig, MigrationRaster, RefreshSettings};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = RefreshSettings::from_env().context("Invalid refresh configuration")?;
    let grid = GridConfig::default();
    let (cell_ns, cell_ew) = grid.cell_size_km();
    println!(
        "Building {}-day migration raster ({:.0}° lat × {:.1}° lon, step {}°×{}°, ~{:.0} × {:.0} km cells, land filtered)…",
        settings.forecast_days,
        grid.lat_max - grid.lat_min,
        grid.lon_max - grid.lon_min,
        grid.lat_step,
        grid.lon_step,
        cell_ns,
        cell_ew,
    );

    let raster = MigrationRaster::builder()
        .grid(grid)
        .forecast_days(settings.forecast_days)
        .max_workers(settings.max_workers)
        .request_timeout(settings.request_timeout)
        .forecast_url(settings.forecast_url.clone())
        .build()
        .context("Failed to set up the migration raster")?;

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling the run");
            on_ctrl_c.cancel();
        }
    });

    let snapshot = raster
        .refresh_with_cancel(&settings.output_path, &cancel)
        .await
        .with_context(|| {
            format!(
                "Failed to refresh snapshot at {}",
                settings.output_path.display()
            )
        })?;

    println!(
        "Wrote {} land points × {} days to {}",
        snapshot.raster.point_count,
        snapshot.raster.forecast_days,
        settings.output_path.display()
    );
    for day in &snapshot.day_aggregates {
        println!(
            "  Day +{} ({}): score={:.3}  conf={:.3}",
            day.day_offset, day.date, day.aggregate_score, day.aggregate_confidence
        );
    }
    Ok(())
}
