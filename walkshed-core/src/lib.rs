//! Walking-distance coverage of street segments around shelters.
//!
//! The crate models a pedestrian street network as an undirected multigraph,
//! inserts shelters into it by splitting the nearest street segment, spreads a
//! bounded walking budget out of every shelter and classifies each segment as
//! covered or not.

pub mod algo;
pub mod error;
pub mod loading;
pub mod model;
pub mod output;
pub mod prelude;

pub use algo::{
    CoverageMap, PropagationStats, SegmentCoverage, SegmentKey, add_point, add_shelters,
    classify, insert_at_nearest, propagate, split_edge,
};
pub use error::Error;
pub use loading::{CoverageModel, CoverageModelConfig, create_coverage_model};
pub use model::{EdgeHandle, Shelter, StreetEdge, StreetGraph, StreetNode};

/// Identifier of a street graph node, stable across edge splits
pub type NodeId = u64;
/// Disambiguates parallel edges between the same pair of nodes
pub type EdgeKey = u32;
/// Distance along the street network, in meters
pub type Meters = f64;
