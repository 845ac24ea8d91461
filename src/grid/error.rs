use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("Grid step for {axis} must be a finite number of at least 0.1 degrees, got {step}")]
    InvalidStep { axis: &'static str, step: f64 },

    #[error("Grid bounds for {axis} are inverted or not finite: [{min}, {max}]")]
    InvalidBounds {
        axis: &'static str,
        min: f64,
        max: f64,
    },

    #[error("Grid anchor ({lat}, {lon}) is not a finite coordinate")]
    InvalidAnchor { lat: f64, lon: f64 },
}
