//! Street network input

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use geo::{Coord, LineString, Point};
use log::info;

use super::raw_types::{RawEdge, RawNetwork, RawNode};
use crate::{Error, StreetEdge, StreetGraph, StreetNode};

/// Reads a street network JSON file
///
/// # Errors
///
/// Returns an error if the file cannot be opened or parsed, or if the network
/// itself is malformed.
pub fn read_street_graph(path: &Path) -> Result<StreetGraph, Error> {
    let file = File::open(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to open file '{}': {}", path.display(), e),
        )
    })?;
    let graph = street_graph_from_reader(BufReader::new(file))?;
    info!(
        "Loaded street network with {} nodes and {} edges from {}",
        graph.node_count(),
        graph.edge_count(),
        path.display()
    );
    Ok(graph)
}

/// Parses a street network from any JSON source
///
/// # Errors
///
/// Returns an error if the JSON is invalid or the network is malformed.
pub fn street_graph_from_reader(reader: impl Read) -> Result<StreetGraph, Error> {
    let raw: RawNetwork = serde_json::from_reader(reader)?;
    let nodes = raw
        .nodes
        .into_iter()
        .map(street_node)
        .collect::<Result<Vec<_>, _>>()?;
    let edges = raw.edges.into_iter().map(street_edge);
    StreetGraph::from_parts(nodes, edges)
}

fn street_node(raw: RawNode) -> Result<StreetNode, Error> {
    if !raw.lat.is_finite() || !raw.lon.is_finite() {
        return Err(Error::InvalidData(format!(
            "Node {} has invalid coordinates ({}, {})",
            raw.id, raw.lat, raw.lon
        )));
    }
    Ok(StreetNode::new(raw.id, Point::new(raw.lon, raw.lat)))
}

fn street_edge(raw: RawEdge) -> StreetEdge {
    StreetEdge {
        u: raw.u,
        v: raw.v,
        key: raw.key,
        length: raw.length,
        geometry: raw
            .geometry
            .into_iter()
            .map(|[x, y]| Coord { x, y })
            .collect::<LineString<f64>>(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EdgeHandle;

    const NETWORK: &str = r#"{
        "nodes": [
            {"id": 100, "lat": 32.0100, "lon": 34.7700},
            {"id": 200, "lat": 32.0110, "lon": 34.7700},
            {"id": 300, "lat": 32.0110, "lon": 34.7712}
        ],
        "edges": [
            {"u": 100, "v": 200, "length": 111.2},
            {"u": 100, "v": 200, "key": 1, "length": 130.0,
             "geometry": [[34.7700, 32.0100], [34.7695, 32.0105], [34.7700, 32.0110]]},
            {"u": 200, "v": 300, "key": 0, "length": 113.4}
        ]
    }"#;

    #[test]
    fn parses_nodes_edges_and_parallel_keys() {
        let graph = street_graph_from_reader(NETWORK.as_bytes()).unwrap();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.next_id(), 301);

        let straight = graph.edge(EdgeHandle { u: 100, v: 200, key: 0 }).unwrap();
        assert_eq!(straight.geometry.0.len(), 2);
        let curved = graph.edge(EdgeHandle { u: 200, v: 100, key: 1 }).unwrap();
        assert_eq!(curved.geometry.0.len(), 3);
        assert_eq!(curved.length, 130.0);

        let node = graph.node(300).unwrap();
        assert_eq!((node.lat(), node.lon()), (32.0110, 34.7712));
    }

    #[test]
    fn surfaces_parse_errors() {
        let result = street_graph_from_reader(r#"{"nodes": []}"#.as_bytes());
        assert!(matches!(result, Err(Error::JsonError(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = read_street_graph(Path::new("does/not/exist.json"));
        assert!(matches!(result, Err(Error::IoError(_))));
    }
}
