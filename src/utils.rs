use log::info;
use rust_decimal::{Decimal, RoundingStrategy};
use std::io;
use std::path::Path;

pub fn clamp(value: f64, min_value: f64, max_value: f64) -> f64 {
    value.max(min_value).min(max_value)
}

/// Rounds to 3 decimals, the precision of every score written to a snapshot.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Rounds to 1 decimal, the precision of lattice coordinates.
///
/// Rounds the exact binary value with ties to even, so `0.25` becomes `0.2`
/// and `0.35` (stored as `0.34999...`) becomes `0.3`.
pub fn round1(value: f64) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|exact| exact.round_dp_with_strategy(1, RoundingStrategy::MidpointNearestEven))
        .and_then(|rounded| rounded.to_string().parse().ok())
        .unwrap_or(value)
}

pub async fn ensure_dir_exists(path: &Path) -> io::Result<()> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("Output path exists but is not a directory: {}", path.display()),
                ));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Creating output directory: {}", path.display());
            tokio::fs::create_dir_all(path).await
        }
        Err(e) => Err(e),
    }
}
