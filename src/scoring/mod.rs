pub mod factors;
pub mod labels;
pub mod model;
