// Re-export key components
pub use crate::algo::{
    CoverageMap, PropagationStats, SegmentCoverage, SegmentKey, UNCOVERED, add_point,
    add_shelters, classify, insert_at_nearest, propagate, split_edge,
};
pub use crate::loading::{
    CoverageModel, CoverageModelConfig, create_coverage_model, read_shelters, read_street_graph,
};
pub use crate::model::{EdgeHandle, Shelter, StreetEdge, StreetGraph, StreetNode, great_circle};
pub use crate::output::{coverage_to_geojson, write_coverage_map, write_geojson};
pub use crate::Error;

// Core types for the street network
pub use crate::EdgeKey;
pub use crate::Meters;
pub use crate::NodeId;
