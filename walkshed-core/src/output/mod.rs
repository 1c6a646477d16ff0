//! Writing classified coverage for downstream consumers

mod features;
mod json;

pub use features::{coverage_to_geojson, write_geojson};
pub use json::write_coverage_map;
