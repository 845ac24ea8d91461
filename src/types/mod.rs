pub mod day_score;
pub mod grid_point;
pub mod location_score;
pub mod observation;
pub mod snapshot;
