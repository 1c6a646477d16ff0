use thiserror::Error;

use crate::{EdgeKey, NodeId};

#[derive(Error, Debug)]
pub enum Error {
    #[error("No nearby points found for snapping")]
    NoPointsFound,
    #[error("Node {0} does not exist in the street graph")]
    NodeNotFound(NodeId),
    #[error("Edge {u} {v} {key} does not exist in the street graph")]
    EdgeNotFound { u: NodeId, v: NodeId, key: EdgeKey },
    #[error("Radius must be a positive number of meters, got {0}")]
    InvalidRadius(f64),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Unrecoverable error: {0}")]
    UnrecoverableError(&'static str),
}
