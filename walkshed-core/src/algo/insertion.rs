//! Inserting new nodes into the street graph by splitting existing segments

use geo::Point;
use log::{trace, warn};

use crate::model::great_circle;
use crate::model::network::{finite_coords, straight_line};
use crate::{EdgeHandle, Error, Meters, NodeId, Shelter, StreetGraph};

/// Splits `edge` at `point` into two segments meeting at a new node.
///
/// The new node sits exactly at `point`, which does not have to lie on the
/// original geometry. Each half gets the great-circle length from its old
/// endpoint to `point` and a straight geometry. The original edge is removed.
///
/// # Errors
///
/// Returns [`Error::EdgeNotFound`] if `edge` is not part of the graph and
/// [`Error::InvalidData`] if `point` has non-finite coordinates. The graph is
/// left untouched in both cases.
pub fn split_edge(
    graph: &mut StreetGraph,
    edge: EdgeHandle,
    point: Point<f64>,
) -> Result<NodeId, Error> {
    if !graph.contains_edge(edge) {
        return Err(Error::EdgeNotFound {
            u: edge.u,
            v: edge.v,
            key: edge.key,
        });
    }
    finite_coords(point)?;
    let u_loc = graph.node(edge.u).ok_or(Error::NodeNotFound(edge.u))?.geometry;
    let v_loc = graph.node(edge.v).ok_or(Error::NodeNotFound(edge.v))?.geometry;

    let (u_len, v_len) = (great_circle(u_loc, point), great_circle(v_loc, point));

    let id = graph.add_node(point)?;
    graph.add_edge(edge.u, id, u_len, straight_line(u_loc, point))?;
    graph.add_edge(id, edge.v, v_len, straight_line(point, v_loc))?;
    graph.remove_edge(edge)?;

    Ok(id)
}

/// Splits the street closest to `point`
///
/// # Errors
///
/// Returns [`Error::NoPointsFound`] if the graph has no edges.
pub fn insert_at_nearest(graph: &mut StreetGraph, point: Point<f64>) -> Result<NodeId, Error> {
    let edge = graph.nearest_edge(point)?;
    split_edge(graph, edge, point)
}

/// Inserts every shelter at its nearest street, in order, and returns the new node ids.
///
/// Shelters farther than `max_snap_distance` from any street are still inserted,
/// but reported since their coverage is unlikely to be meaningful.
///
/// # Errors
///
/// Fails on the first shelter that cannot be snapped to a street.
pub fn add_shelters(
    graph: &mut StreetGraph,
    shelters: &[Shelter],
    max_snap_distance: Option<Meters>,
) -> Result<Vec<NodeId>, Error> {
    let mut shelter_nodes = Vec::with_capacity(shelters.len());

    for shelter in shelters {
        let edge = graph.nearest_edge(shelter.location)?;
        let snap_distance = graph.distance_to_edge(shelter.location, edge)?;
        match max_snap_distance {
            Some(max) if snap_distance > max => warn!(
                "Shelter '{}' is {snap_distance:.0}m from the nearest street (max: {max:.0}m)",
                shelter.name
            ),
            _ => trace!(
                "Shelter '{}' snapped to edge {edge} ({snap_distance:.1}m away)",
                shelter.name
            ),
        }

        let node_id = split_edge(graph, edge, shelter.location)?;
        if let Some(node) = graph.node_mut(node_id) {
            node.is_shelter = true;
            node.name = Some(shelter.name.clone());
        }
        shelter_nodes.push(node_id);
    }

    Ok(shelter_nodes)
}
