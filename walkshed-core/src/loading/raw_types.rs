//! Serialized shapes of the street network and shelter inputs

use serde::Deserialize;

use crate::{EdgeKey, Meters, NodeId};

#[derive(Debug, Deserialize)]
pub struct RawNetwork {
    pub nodes: Vec<RawNode>,
    pub edges: Vec<RawEdge>,
}

#[derive(Debug, Deserialize)]
pub struct RawNode {
    pub id: NodeId,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Deserialize)]
pub struct RawEdge {
    pub u: NodeId,
    pub v: NodeId,
    #[serde(default)]
    pub key: EdgeKey,
    pub length: Meters,
    /// `[lon, lat]` pairs; a straight line between the endpoints when absent
    #[serde(default)]
    pub geometry: Vec<[f64; 2]>,
}

/// Shelter as listed in a JSON shelter file
#[derive(Debug, Deserialize)]
pub struct RawShelter {
    pub name: String,
    /// `[lat, lon]`
    pub coords: [f64; 2],
}

/// Shelter as listed in a CSV shelter file
#[derive(Debug, Deserialize)]
pub(super) struct CsvShelter {
    pub(super) name: String,
    pub(super) lat: f64,
    pub(super) lon: f64,
}
