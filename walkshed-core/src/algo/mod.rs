//! Coverage algorithms over the street graph
//!
//! Shelters are inserted by splitting streets ([`insertion`]), a walking budget
//! spreads out of them ([`propagation`]), and every segment is then classified
//! ([`classify`]). Points added afterwards get a local estimate ([`incremental`]).

pub mod classify;
pub mod incremental;
pub mod insertion;
pub mod propagation;

pub use classify::{CoverageMap, SegmentCoverage, SegmentKey, UNCOVERED, classify};
pub use incremental::{add_point, estimate_rem};
pub use insertion::{add_shelters, insert_at_nearest, split_edge};
pub use propagation::{PropagationStats, propagate};

#[cfg(test)]
pub(crate) mod fixtures {
    use geo::{LineString, point};

    use crate::{Meters, NodeId, StreetEdge, StreetGraph, StreetNode};

    pub(crate) const A: NodeId = 1;
    pub(crate) const B: NodeId = 2;
    pub(crate) const C: NodeId = 3;

    /// Straight street A-B-C running east along the equator
    pub(crate) fn line_graph(ab: Meters, bc: Meters) -> StreetGraph {
        StreetGraph::from_parts(
            vec![
                StreetNode::new(A, point!(x: 0.0, y: 0.0)),
                StreetNode::new(B, point!(x: 0.0001, y: 0.0)),
                StreetNode::new(C, point!(x: 0.0002, y: 0.0)),
            ],
            vec![edge(A, B, 0, ab), edge(B, C, 0, bc)],
        )
        .unwrap()
    }

    pub(crate) fn edge(u: NodeId, v: NodeId, key: u32, length: Meters) -> StreetEdge {
        StreetEdge {
            u,
            v,
            key,
            length,
            geometry: LineString::new(vec![]),
        }
    }
}
