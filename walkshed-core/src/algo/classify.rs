//! Classifying street segments as covered or not from propagated budgets

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{EdgeKey, Error, Meters, NodeId, StreetGraph};

/// Budget value marking a segment that no shelter covers
pub const UNCOVERED: Meters = -1.0;

/// One traversal direction of one edge instance, written as `"<from> <to> <key>"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentKey {
    pub from: NodeId,
    pub to: NodeId,
    pub key: EdgeKey,
}

impl SegmentKey {
    pub fn new(from: NodeId, to: NodeId, key: EdgeKey) -> Self {
        Self { from, to, key }
    }

    pub fn reversed(self) -> Self {
        Self {
            from: self.to,
            to: self.from,
            key: self.key,
        }
    }
}

impl fmt::Display for SegmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.from, self.to, self.key)
    }
}

impl FromStr for SegmentKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidData(format!("Invalid segment key '{s}'"));
        let mut parts = s.split(' ');
        let from = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        let to = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        let key = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self { from, to, key })
    }
}

/// Coverage record of one segment direction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentCoverage {
    pub length: Meters,
    /// Budget of the `from` node, or [`UNCOVERED`]
    pub rem: Meters,
}

impl SegmentCoverage {
    pub fn is_covered(&self) -> bool {
        self.rem >= 0.0
    }
}

/// Coverage of every segment in both traversal directions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverageMap {
    records: BTreeMap<SegmentKey, SegmentCoverage>,
}

impl CoverageMap {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, from: NodeId, to: NodeId, key: EdgeKey) -> Option<&SegmentCoverage> {
        self.records.get(&SegmentKey::new(from, to, key))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SegmentKey, &SegmentCoverage)> {
        self.records.iter()
    }

    /// Number of covered records, counting both directions
    pub fn covered_count(&self) -> usize {
        self.records.values().filter(|r| r.is_covered()).count()
    }
}

impl FromIterator<(SegmentKey, SegmentCoverage)> for CoverageMap {
    fn from_iter<I: IntoIterator<Item = (SegmentKey, SegmentCoverage)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl Serialize for CoverageMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.records.iter().map(|(k, v)| (k.to_string(), v)))
    }
}

impl<'de> Deserialize<'de> for CoverageMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        BTreeMap::<String, SegmentCoverage>::deserialize(deserializer)?
            .into_iter()
            .map(|(k, v)| {
                k.parse::<SegmentKey>()
                    .map(|key| (key, v))
                    .map_err(D::Error::custom)
            })
            .collect()
    }
}

/// Classifies every edge from the budgets currently stored on the nodes.
///
/// An edge of length `L` between `u` and `v` is covered when
/// `rem[u] + rem[v] > L`; its `u v` record then carries `rem[u]` and its
/// `v u` record carries `rem[v]`. Otherwise both records carry [`UNCOVERED`].
/// Before any propagation every edge comes out uncovered.
pub fn classify(graph: &StreetGraph) -> CoverageMap {
    let edge_indices: Vec<_> = graph.graph.edge_indices().collect();

    let records: BTreeMap<_, _> = edge_indices
        .par_iter()
        .filter_map(|&idx| {
            let (a, b) = graph.graph.edge_endpoints(idx)?;
            Some((&graph.graph[idx], graph.graph[a].rem, graph.graph[b].rem))
        })
        .flat_map_iter(|(edge, rem_u, rem_v)| {
            let (forward, backward) = if rem_u + rem_v > edge.length {
                (rem_u, rem_v)
            } else {
                (UNCOVERED, UNCOVERED)
            };
            let key = SegmentKey::new(edge.u, edge.v, edge.key);
            [
                (
                    key,
                    SegmentCoverage {
                        length: edge.length,
                        rem: forward,
                    },
                ),
                (
                    key.reversed(),
                    SegmentCoverage {
                        length: edge.length,
                        rem: backward,
                    },
                ),
            ]
        })
        .collect();

    CoverageMap { records }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::fixtures::{A, B, C, edge, line_graph};
    use crate::algo::propagate;
    use crate::StreetNode;

    #[test]
    fn short_radius_covers_first_segment_only() {
        let mut graph = line_graph(10.0, 10.0);
        propagate(&mut graph, &[A], 15.0).unwrap();
        let coverage = classify(&graph);

        assert_eq!(coverage.len(), 4);
        let ab = coverage.get(A, B, 0).unwrap();
        assert!(ab.is_covered());
        assert_eq!(ab.rem, 15.0);
        assert_eq!(coverage.get(B, A, 0).unwrap().rem, 0.0);

        assert_eq!(coverage.get(B, C, 0).unwrap().rem, UNCOVERED);
        assert_eq!(coverage.get(C, B, 0).unwrap().rem, UNCOVERED);
    }

    #[test]
    fn partial_reach_still_covers_adjacent_segment() {
        let mut graph = line_graph(10.0, 10.0);
        propagate(&mut graph, &[A], 25.0).unwrap();
        let coverage = classify(&graph);

        let bc = coverage.get(B, C, 0).unwrap();
        assert!(bc.is_covered());
        assert_eq!(bc.rem, 15.0);
        assert_eq!(coverage.get(C, B, 0).unwrap().rem, 0.0);
        assert_eq!(coverage.covered_count(), 4);
    }

    #[test]
    fn unpropagated_graph_is_uncovered() {
        let graph = line_graph(10.0, 10.0);
        let coverage = classify(&graph);
        assert_eq!(coverage.covered_count(), 0);
        assert!(coverage.iter().all(|(_, r)| r.rem == UNCOVERED));
    }

    #[test]
    fn directions_agree_on_length_and_coverage() {
        let mut graph = StreetGraph::from_parts(
            (1..=4).map(|id| StreetNode::new(id, geo::point!(x: id as f64 * 0.0001, y: 0.0))),
            vec![
                edge(1, 2, 0, 10.0),
                edge(1, 2, 1, 14.0),
                edge(2, 3, 0, 30.0),
                edge(3, 4, 0, 3.0),
            ],
        )
        .unwrap();
        propagate(&mut graph, &[1], 33.0).unwrap();
        let coverage = classify(&graph);

        assert_eq!(coverage.len(), 8);
        for (key, record) in coverage.iter() {
            let reverse = coverage.get(key.to, key.from, key.key).unwrap();
            assert_eq!(record.length, reverse.length);
            assert_eq!(record.is_covered(), reverse.is_covered());
        }
        assert_eq!(coverage.get(1, 2, 1).unwrap().length, 14.0);
    }

    #[test]
    fn records_follow_key_order_without_removed_edges() {
        let mut graph = line_graph(10.0, 10.0);
        let extra = graph.add_edge(C, A, 20.0, geo::LineString::new(vec![])).unwrap();
        graph
            .remove_edge(crate::EdgeHandle { u: A, v: B, key: 0 })
            .unwrap();
        let coverage = classify(&graph);

        let keys: Vec<_> = coverage.iter().map(|(key, _)| key.to_string()).collect();
        assert_eq!(keys, ["1 3 0", "2 3 0", "3 1 0", "3 2 0"]);
        assert_eq!(extra.key, 0);
        assert!(coverage.get(A, B, 0).is_none());
    }

    #[test]
    fn serializes_with_string_keys() {
        let mut graph = line_graph(10.0, 10.0);
        propagate(&mut graph, &[A], 15.0).unwrap();
        let coverage = classify(&graph);

        let json = serde_json::to_value(&coverage).unwrap();
        assert_eq!(json["1 2 0"]["length"], 10.0);
        assert_eq!(json["1 2 0"]["rem"], 15.0);
        assert_eq!(json["3 2 0"]["rem"], -1.0);

        let parsed: CoverageMap = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, coverage);
    }

    #[test]
    fn rejects_malformed_segment_keys() {
        assert!("1 2".parse::<SegmentKey>().is_err());
        assert!("1 2 0 7".parse::<SegmentKey>().is_err());
        assert!("a 2 0".parse::<SegmentKey>().is_err());
        assert_eq!("4 5 1".parse::<SegmentKey>().unwrap(), SegmentKey::new(4, 5, 1));
    }
}
