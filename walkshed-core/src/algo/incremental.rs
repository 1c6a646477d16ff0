//! Adding points to an already propagated graph

use geo::Point;
use log::debug;

use super::insertion::insert_at_nearest;
use crate::{Error, Meters, NodeId, StreetGraph};

/// Local budget estimate for `id` from its direct neighbours.
///
/// Every incident edge offers `rem[neighbour] - length`; the best offer wins and
/// the result never drops below zero. Neighbours are not updated and no wave is
/// started, so the estimate only looks one edge away.
///
/// # Errors
///
/// Returns [`Error::NodeNotFound`] if the node does not exist.
pub fn estimate_rem(graph: &StreetGraph, id: NodeId) -> Result<Meters, Error> {
    Ok(graph
        .incident_edges(id)?
        .map(|(neighbour, edge)| neighbour.rem - edge.length)
        .fold(0.0, f64::max))
}

/// Inserts a point on its nearest street after propagation and estimates its budget
///
/// # Errors
///
/// Returns [`Error::NoPointsFound`] if the graph has no edges.
pub fn add_point(graph: &mut StreetGraph, point: Point<f64>) -> Result<NodeId, Error> {
    let id = insert_at_nearest(graph, point)?;
    let rem = estimate_rem(graph, id)?;
    if let Some(node) = graph.node_mut(id) {
        node.rem = rem;
    }
    debug!("Added node {id} with estimated budget {rem:.1}m");
    Ok(id)
}
