use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use geojson::{Feature, FeatureCollection, Geometry, GeometryValue};
use serde_json::json;

use crate::{CoverageMap, Error, StreetEdge, StreetGraph, StreetNode};

/// Converts classified segments and shelters into a `GeoJSON` `FeatureCollection`.
///
/// Every edge becomes one `LineString` feature carrying the records of both
/// directions from `coverage`; every shelter becomes a `Point` feature.
pub fn coverage_to_geojson(
    graph: &StreetGraph,
    coverage: &CoverageMap,
) -> Result<FeatureCollection, Error> {
    let mut features = graph
        .edges()
        .map(|edge| create_segment_feature(edge, coverage))
        .collect::<Result<Vec<_>, _>>()?;

    for shelter in graph.nodes().filter(|node| node.is_shelter) {
        features.push(create_shelter_feature(shelter)?);
    }

    Ok(FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    })
}

/// Writes a `FeatureCollection` to `path`
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_geojson(path: &Path, collection: &FeatureCollection) -> Result<(), Error> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, collection)?;
    writer.flush()?;
    Ok(())
}

fn create_segment_feature(edge: &StreetEdge, coverage: &CoverageMap) -> Result<Feature, Error> {
    let forward = coverage.get(edge.u, edge.v, edge.key);
    let backward = coverage.get(edge.v, edge.u, edge.key);
    let covered = forward.is_some_and(|r| r.is_covered());

    let geometry = Geometry::new(GeometryValue::from(&edge.geometry));

    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "u": edge.u,
            "v": edge.v,
            "key": edge.key,
            "length": edge.length,
            "rem_u": forward.map(|r| r.rem),
            "rem_v": backward.map(|r| r.rem),
            "covered": covered,
        }
    });

    serde_json::from_value::<Feature>(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}

fn create_shelter_feature(node: &StreetNode) -> Result<Feature, Error> {
    let geometry = Geometry::new(GeometryValue::from(&node.geometry));

    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "id": node.id,
            "name": node.name.as_deref().unwrap_or_default(),
            "rem": node.rem,
        }
    });

    serde_json::from_value::<Feature>(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::fixtures::line_graph;
    use crate::{Shelter, algo};

    #[test]
    fn one_feature_per_segment_and_shelter() {
        let mut graph = line_graph(11.0, 11.0);
        let shelters = vec![Shelter::new("east", 0.0, 0.00015)];
        let ids = algo::add_shelters(&mut graph, &shelters, None).unwrap();
        algo::propagate(&mut graph, &ids, 8.0).unwrap();
        let coverage = algo::classify(&graph);

        let collection = coverage_to_geojson(&graph, &coverage).unwrap();

        assert_eq!(collection.features.len(), 4);
        let covered = collection
            .features
            .iter()
            .filter(|f| f.property("covered") == Some(&json!(true)))
            .count();
        assert_eq!(covered, 2);

        let shelter = collection
            .features
            .iter()
            .find(|f| f.property("name") == Some(&json!("east")))
            .unwrap();
        assert_eq!(shelter.property("rem"), Some(&json!(8.0)));
    }

    #[test]
    fn segment_geometry_follows_the_street() {
        let graph = line_graph(11.0, 11.0);
        let coverage = algo::classify(&graph);

        let collection = coverage_to_geojson(&graph, &coverage).unwrap();

        assert_eq!(collection.features.len(), 2);
        for feature in &collection.features {
            let geometry = feature.geometry.as_ref().unwrap();
            let GeometryValue::LineString { coordinates } = &geometry.value else {
                panic!("segment is not a line string: {:?}", geometry.value);
            };
            assert_eq!(coordinates.len(), 2);
            assert_eq!(feature.property("covered"), Some(&json!(false)));
        }
    }
}
