//! Pedestrian street network model

pub mod components;
pub mod network;

pub use components::{EdgeHandle, Shelter, StreetEdge, StreetNode};
pub use network::{IndexedPoint, IndexedSegment, StreetGraph, great_circle};
