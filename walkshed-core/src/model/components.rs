//! Street network components - nodes, edges and edge handles

use std::fmt;

use geo::{LineString, Point};
use serde::{Deserialize, Serialize};

use crate::{EdgeKey, Meters, NodeId};

/// Street graph node
#[derive(Debug, Clone)]
pub struct StreetNode {
    /// Identifier, unique within the graph
    pub id: NodeId,
    /// Node coordinates, x is longitude and y is latitude
    pub geometry: Point<f64>,
    /// Unused walking budget left at this node after propagation
    pub rem: Meters,
    pub is_shelter: bool,
    /// Display name, set for shelters
    pub name: Option<String>,
}

impl StreetNode {
    pub fn new(id: NodeId, geometry: Point<f64>) -> Self {
        Self {
            id,
            geometry,
            rem: 0.0,
            is_shelter: false,
            name: None,
        }
    }

    pub fn lat(&self) -> f64 {
        self.geometry.y()
    }

    pub fn lon(&self) -> f64 {
        self.geometry.x()
    }
}

/// Street graph edge (street segment)
#[derive(Debug, Clone)]
pub struct StreetEdge {
    pub u: NodeId,
    pub v: NodeId,
    /// Distinguishes parallel segments between `u` and `v`
    pub key: EdgeKey,
    /// Great-circle length of the segment in meters
    pub length: Meters,
    pub geometry: LineString<f64>,
}

impl StreetEdge {
    pub fn handle(&self) -> EdgeHandle {
        EdgeHandle {
            u: self.u,
            v: self.v,
            key: self.key,
        }
    }

    /// Endpoint on the other side of the segment from `node`
    pub fn opposite(&self, node: NodeId) -> NodeId {
        if self.u == node { self.v } else { self.u }
    }
}

/// Identity of a single edge instance of the multigraph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeHandle {
    pub u: NodeId,
    pub v: NodeId,
    pub key: EdgeKey,
}

impl fmt::Display for EdgeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.u, self.v, self.key)
    }
}

/// Point of interest from which walking coverage spreads
#[derive(Debug, Clone, PartialEq)]
pub struct Shelter {
    pub name: String,
    /// Shelter coordinates, x is longitude and y is latitude
    pub location: Point<f64>,
}

impl Shelter {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            location: Point::new(lon, lat),
        }
    }
}
