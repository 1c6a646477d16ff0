//! Spreading the walking budget out of shelter nodes.
//!
//! Each source starts a depth-first wave with the full radius. Crossing an edge
//! costs its length; a neighbour is only rewritten when the wave brings strictly
//! more budget than it already holds, which bounds the work per node and makes
//! later sources unable to undo the reach of earlier ones. A neighbour reached
//! with less budget than the edge it was reached over is marked with zero budget
//! and the wave stops there.
//!
//! This is a bounded label-correcting relaxation, not a shortest-path search:
//! results depend on source order and edge order.

use fixedbitset::FixedBitSet;
use log::debug;
use petgraph::stable_graph::{NodeIndex, StableUnGraph};
use petgraph::visit::{EdgeRef, NodeIndexable};

use crate::{Error, Meters, NodeId, StreetEdge, StreetGraph, StreetNode};

/// Counters describing a propagation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropagationStats {
    pub sources: usize,
    /// Neighbours that received a budget and were descended into
    pub relaxations: usize,
    /// Neighbours reached with too little budget to continue past them
    pub partial_reaches: usize,
    /// Distinct nodes touched by any wave, sources included
    pub reached_nodes: usize,
}

/// A node being expanded together with the position in its incident edges
struct Frame {
    node: NodeIndex,
    neighbours: Vec<(NodeIndex, Meters)>,
    cursor: usize,
}

impl Frame {
    fn new(graph: &StableUnGraph<StreetNode, StreetEdge>, node: NodeIndex) -> Self {
        let neighbours = graph
            .edges(node)
            .map(|edge| {
                let other = if edge.source() == node {
                    edge.target()
                } else {
                    edge.source()
                };
                (other, edge.weight().length)
            })
            .collect();
        Self {
            node,
            neighbours,
            cursor: 0,
        }
    }

    fn advance(&mut self) -> Option<(NodeIndex, Meters)> {
        let next = self.neighbours.get(self.cursor).copied();
        self.cursor += 1;
        next
    }
}

/// Assigns every node the walking budget left after reaching it from `sources`.
///
/// All budgets are reset to zero first, then each source in list order is given
/// `radius` and a wave is run from it. The descent keeps its own stack, so deep
/// waves over dense graphs do not grow the call stack.
///
/// # Errors
///
/// Returns [`Error::InvalidRadius`] for a non-positive or non-finite radius and
/// [`Error::NodeNotFound`] for an unknown source; in both cases no budget is touched.
pub fn propagate(
    graph: &mut StreetGraph,
    sources: &[NodeId],
    radius: Meters,
) -> Result<PropagationStats, Error> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(Error::InvalidRadius(radius));
    }
    let roots = sources
        .iter()
        .map(|&id| graph.index_of(id))
        .collect::<Result<Vec<_>, _>>()?;

    graph.reset_rem();

    let graph = &mut graph.graph;
    let mut stats = PropagationStats {
        sources: roots.len(),
        ..PropagationStats::default()
    };
    let mut reached = FixedBitSet::with_capacity(graph.node_bound());
    let mut stack: Vec<Frame> = Vec::new();

    for root in roots {
        graph[root].rem = radius;
        reached.insert(root.index());
        stack.push(Frame::new(graph, root));

        while let Some(frame) = stack.last_mut() {
            let node = frame.node;
            let Some((next, length)) = frame.advance() else {
                stack.pop();
                continue;
            };

            let remain = graph[node].rem - length;
            if remain <= graph[next].rem {
                continue;
            }
            reached.insert(next.index());

            if remain < length {
                graph[next].rem = 0.0;
                stats.partial_reaches += 1;
            } else {
                graph[next].rem = remain;
                stats.relaxations += 1;
                stack.push(Frame::new(graph, next));
            }
        }
    }

    stats.reached_nodes = reached.count_ones(..);
    debug!(
        "Propagated {radius}m from {} sources: {} relaxations, {} partial reaches, \
         {} nodes reached",
        stats.sources, stats.relaxations, stats.partial_reaches, stats.reached_nodes
    );

    Ok(stats)
}
