pub mod build_grid;
pub mod error;
pub mod land_filter;
