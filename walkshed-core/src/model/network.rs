//! Undirected street multigraph with spatial indices

use geo::{Closest, ClosestPoint, Coord, Distance, Haversine, LineString, Point};
use hashbrown::HashMap;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableUnGraph};
use petgraph::visit::EdgeRef;
use rstar::RTree;
use rstar::primitives::{GeomWithData, Line};

use super::components::{EdgeHandle, StreetEdge, StreetNode};
use crate::{EdgeKey, Error, Meters, NodeId};

/// Node location stored in the node R*-tree
pub type IndexedPoint = GeomWithData<[f64; 2], NodeIndex>;
/// One straight piece of an edge geometry stored in the edge R*-tree
pub type IndexedSegment = GeomWithData<Line<[f64; 2]>, EdgeIndex>;

/// Great-circle distance between two coordinates in meters
pub fn great_circle(a: Point<f64>, b: Point<f64>) -> Meters {
    Haversine.distance(a, b)
}

/// Street network graph.
///
/// Edges are first-class entities: parallel segments between the same pair of
/// nodes are told apart by their key, and the pair index maps every unordered
/// node pair to the keys currently in use. Node identifiers are allocated by the
/// graph itself, so nodes created by splits never collide with loaded ones.
#[derive(Debug, Clone)]
pub struct StreetGraph {
    pub(crate) graph: StableUnGraph<StreetNode, StreetEdge>,
    node_index: HashMap<NodeId, NodeIndex>,
    pair_index: HashMap<(NodeId, NodeId), HashMap<EdgeKey, EdgeIndex>>,
    node_tree: RTree<IndexedPoint>,
    edge_tree: RTree<IndexedSegment>,
    next_id: NodeId,
}

impl Default for StreetGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl StreetGraph {
    pub fn new() -> Self {
        Self {
            graph: StableUnGraph::default(),
            node_index: HashMap::new(),
            pair_index: HashMap::new(),
            node_tree: RTree::new(),
            edge_tree: RTree::new(),
            next_id: 1,
        }
    }

    /// Builds a graph from nodes and edges with caller-chosen identifiers and keys.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] on duplicate node ids, duplicate edge keys or
    /// invalid lengths, and [`Error::NodeNotFound`] for edges referencing unknown nodes.
    pub fn from_parts(
        nodes: impl IntoIterator<Item = StreetNode>,
        edges: impl IntoIterator<Item = StreetEdge>,
    ) -> Result<Self, Error> {
        let mut graph = Self::new();
        let mut points = Vec::new();
        for node in nodes {
            let coord = [node.geometry.x(), node.geometry.y()];
            let idx = graph.insert_node(node)?;
            points.push(IndexedPoint::new(coord, idx));
        }
        graph.node_tree = RTree::bulk_load(points);

        let mut segments = Vec::new();
        for edge in edges {
            let idx = graph.insert_edge(edge)?;
            segments.extend(edge_segments(&graph.graph[idx].geometry, idx));
        }
        graph.edge_tree = RTree::bulk_load(segments);

        Ok(graph)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Identifier the next created node will receive
    pub fn next_id(&self) -> NodeId {
        self.next_id
    }

    pub fn nodes(&self) -> impl Iterator<Item = &StreetNode> {
        self.graph.node_indices().map(|idx| &self.graph[idx])
    }

    pub fn edges(&self) -> impl Iterator<Item = &StreetEdge> {
        self.graph.edge_indices().map(|idx| &self.graph[idx])
    }

    pub fn node(&self, id: NodeId) -> Option<&StreetNode> {
        self.node_index.get(&id).map(|&idx| &self.graph[idx])
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut StreetNode> {
        self.node_index.get(&id).map(|&idx| &mut self.graph[idx])
    }

    pub fn rem(&self, id: NodeId) -> Option<Meters> {
        self.node(id).map(|node| node.rem)
    }

    pub fn edge(&self, handle: EdgeHandle) -> Option<&StreetEdge> {
        self.edge_index(handle).map(|idx| &self.graph[idx])
    }

    pub fn contains_edge(&self, handle: EdgeHandle) -> bool {
        self.edge_index(handle).is_some()
    }

    /// Neighbours of `id` together with the connecting edge, one entry per edge
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] if the node does not exist.
    pub fn incident_edges(
        &self,
        id: NodeId,
    ) -> Result<impl Iterator<Item = (&StreetNode, &StreetEdge)>, Error> {
        let idx = self.index_of(id)?;
        Ok(self.graph.edges(idx).map(move |edge| {
            let other = if edge.source() == idx {
                edge.target()
            } else {
                edge.source()
            };
            (&self.graph[other], edge.weight())
        }))
    }

    /// Resets the walking budget of every node to zero
    pub fn reset_rem(&mut self) {
        for &idx in self.node_index.values() {
            self.graph[idx].rem = 0.0;
        }
    }

    /// Creates a node at `geometry` with a freshly allocated identifier
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] for non-finite coordinates or if the
    /// identifier space is exhausted.
    pub fn add_node(&mut self, geometry: Point<f64>) -> Result<NodeId, Error> {
        finite_coords(geometry)?;
        let id = self.next_id;
        let idx = self.insert_node(StreetNode::new(id, geometry))?;
        self.node_tree
            .insert(IndexedPoint::new([geometry.x(), geometry.y()], idx));
        Ok(id)
    }

    /// Adds an edge between two existing nodes.
    ///
    /// The key starts at the number of parallel edges already joining the pair
    /// and steps up past keys still in use, so a key freed by
    /// [`remove_edge`](Self::remove_edge) is not handed out again while a higher
    /// key remains.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] if an endpoint is missing and
    /// [`Error::InvalidData`] for a negative or non-finite length.
    pub fn add_edge(
        &mut self,
        u: NodeId,
        v: NodeId,
        length: Meters,
        geometry: LineString<f64>,
    ) -> Result<EdgeHandle, Error> {
        let key = self.free_key(u, v);
        let idx = self.insert_edge(StreetEdge {
            u,
            v,
            key,
            length,
            geometry,
        })?;
        for segment in edge_segments(&self.graph[idx].geometry, idx) {
            self.edge_tree.insert(segment);
        }
        Ok(EdgeHandle { u, v, key })
    }

    /// Removes the single parallel edge identified by `handle`
    ///
    /// # Errors
    ///
    /// Returns [`Error::EdgeNotFound`] if no such edge exists.
    pub fn remove_edge(&mut self, handle: EdgeHandle) -> Result<StreetEdge, Error> {
        let pair = ordered_pair(handle.u, handle.v);
        let idx = self
            .pair_index
            .get_mut(&pair)
            .and_then(|keys| keys.remove(&handle.key))
            .ok_or(Error::EdgeNotFound {
                u: handle.u,
                v: handle.v,
                key: handle.key,
            })?;
        if self.pair_index.get(&pair).is_some_and(HashMap::is_empty) {
            self.pair_index.remove(&pair);
        }

        for segment in edge_segments(&self.graph[idx].geometry, idx) {
            self.edge_tree.remove(&segment);
        }
        self.graph
            .remove_edge(idx)
            .ok_or(Error::EdgeNotFound {
                u: handle.u,
                v: handle.v,
                key: handle.key,
            })
    }

    /// Finds the edge whose geometry lies closest to `point`.
    ///
    /// Distances are planar in coordinate space, which is accurate enough to pick
    /// the right street at city scale.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] for non-finite coordinates and
    /// [`Error::NoPointsFound`] if the graph has no edges.
    pub fn nearest_edge(&self, point: Point<f64>) -> Result<EdgeHandle, Error> {
        let query = finite_coords(point)?;
        self.edge_tree
            .nearest_neighbor(&query)
            .map(|segment| self.graph[segment.data].handle())
            .ok_or(Error::NoPointsFound)
    }

    /// Finds the node closest to `point` and its great-circle distance in meters
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] for non-finite coordinates and
    /// [`Error::NoPointsFound`] if the graph has no nodes.
    pub fn nearest_node(&self, point: Point<f64>) -> Result<(NodeId, Meters), Error> {
        let query = finite_coords(point)?;
        self.node_tree
            .nearest_neighbor(&query)
            .map(|indexed| {
                let node = &self.graph[indexed.data];
                (node.id, great_circle(point, node.geometry))
            })
            .ok_or(Error::NoPointsFound)
    }

    /// Great-circle distance from `point` to the closest point of an edge geometry
    ///
    /// # Errors
    ///
    /// Returns [`Error::EdgeNotFound`] if no such edge exists.
    pub fn distance_to_edge(&self, point: Point<f64>, handle: EdgeHandle) -> Result<Meters, Error> {
        let edge = self.edge(handle).ok_or(Error::EdgeNotFound {
            u: handle.u,
            v: handle.v,
            key: handle.key,
        })?;
        let closest = match edge.geometry.closest_point(&point) {
            Closest::Intersection(p) | Closest::SinglePoint(p) => p,
            Closest::Indeterminate => return Ok(0.0),
        };
        Ok(great_circle(point, closest))
    }

    pub(crate) fn index_of(&self, id: NodeId) -> Result<NodeIndex, Error> {
        self.node_index
            .get(&id)
            .copied()
            .ok_or(Error::NodeNotFound(id))
    }

    fn edge_index(&self, handle: EdgeHandle) -> Option<EdgeIndex> {
        self.pair_index
            .get(&ordered_pair(handle.u, handle.v))
            .and_then(|keys| keys.get(&handle.key))
            .copied()
    }

    fn free_key(&self, u: NodeId, v: NodeId) -> EdgeKey {
        let Some(keys) = self.pair_index.get(&ordered_pair(u, v)) else {
            return 0;
        };
        let mut key = EdgeKey::try_from(keys.len()).unwrap_or(EdgeKey::MAX);
        while keys.contains_key(&key) {
            key = key.wrapping_add(1);
        }
        key
    }

    fn insert_node(&mut self, node: StreetNode) -> Result<NodeIndex, Error> {
        let id = node.id;
        if self.node_index.contains_key(&id) {
            return Err(Error::InvalidData(format!("Duplicate node id {id}")));
        }
        let next = id
            .checked_add(1)
            .ok_or_else(|| Error::InvalidData(format!("Node id {id} is out of range")))?;

        let idx = self.graph.add_node(node);
        self.node_index.insert(id, idx);
        self.next_id = self.next_id.max(next);
        Ok(idx)
    }

    fn insert_edge(&mut self, mut edge: StreetEdge) -> Result<EdgeIndex, Error> {
        if !edge.length.is_finite() || edge.length < 0.0 {
            return Err(Error::InvalidData(format!(
                "Edge {} has invalid length {}",
                edge.handle(),
                edge.length
            )));
        }
        let a = self.index_of(edge.u)?;
        let b = self.index_of(edge.v)?;
        let pair = ordered_pair(edge.u, edge.v);
        if self
            .pair_index
            .get(&pair)
            .is_some_and(|keys| keys.contains_key(&edge.key))
        {
            return Err(Error::InvalidData(format!(
                "Duplicate edge {}",
                edge.handle()
            )));
        }
        if edge.geometry.0.len() < 2 {
            edge.geometry = straight_line(self.graph[a].geometry, self.graph[b].geometry);
        }

        let key = edge.key;
        let idx = self.graph.add_edge(a, b, edge);
        self.pair_index.entry(pair).or_default().insert(key, idx);
        Ok(idx)
    }
}

/// Coordinates of `point` as an R*-tree query, rejecting NaN and infinities
pub(crate) fn finite_coords(point: Point<f64>) -> Result<[f64; 2], Error> {
    if point.x().is_finite() && point.y().is_finite() {
        Ok([point.x(), point.y()])
    } else {
        Err(Error::InvalidData(format!(
            "Coordinates must be finite, got ({}, {})",
            point.x(),
            point.y()
        )))
    }
}

pub(crate) fn straight_line(from: Point<f64>, to: Point<f64>) -> LineString<f64> {
    LineString::new(vec![Coord::from(from), Coord::from(to)])
}

fn ordered_pair(u: NodeId, v: NodeId) -> (NodeId, NodeId) {
    if u <= v { (u, v) } else { (v, u) }
}

fn edge_segments(
    geometry: &LineString<f64>,
    idx: EdgeIndex,
) -> impl Iterator<Item = IndexedSegment> + '_ {
    geometry.lines().map(move |line| {
        IndexedSegment::new(
            Line::new([line.start.x, line.start.y], [line.end.x, line.end.y]),
            idx,
        )
    })
}
