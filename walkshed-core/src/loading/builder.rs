use geo::Point;
use log::info;

use super::config::CoverageModelConfig;
use super::network::read_street_graph;
use super::shelters::read_shelters;
use crate::algo::{self, CoverageMap, PropagationStats};
use crate::{Error, Meters, NodeId, Shelter, StreetGraph};

/// Street graph with shelters inserted and budgets propagated
#[derive(Debug, Clone)]
pub struct CoverageModel {
    pub graph: StreetGraph,
    /// Shelter node ids, in input order
    pub shelter_nodes: Vec<NodeId>,
    pub radius: Meters,
    pub stats: PropagationStats,
}

impl CoverageModel {
    /// Inserts `shelters` into `graph` and propagates `radius` from them
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is invalid or a shelter cannot be snapped.
    pub fn build(
        mut graph: StreetGraph,
        shelters: &[Shelter],
        radius: Meters,
        max_snap_distance: Option<Meters>,
    ) -> Result<Self, Error> {
        validate_radius(radius)?;

        let shelter_nodes = algo::add_shelters(&mut graph, shelters, max_snap_distance)?;
        info!("Inserted {} shelters into the street network", shelter_nodes.len());

        let stats = algo::propagate(&mut graph, &shelter_nodes, radius)?;
        info!(
            "Walking radius of {radius}m reaches {} of {} nodes",
            stats.reached_nodes,
            graph.node_count()
        );

        Ok(Self {
            graph,
            shelter_nodes,
            radius,
            stats,
        })
    }

    /// Classifies every segment from the propagated budgets
    pub fn coverage(&self) -> CoverageMap {
        algo::classify(&self.graph)
    }

    /// Adds a point on its nearest street without propagating again
    ///
    /// # Errors
    ///
    /// Returns an error if the point cannot be snapped to a street.
    pub fn add_point(&mut self, point: Point<f64>) -> Result<NodeId, Error> {
        algo::add_point(&mut self.graph, point)
    }

    pub fn shelter_count(&self) -> usize {
        self.shelter_nodes.len()
    }
}

/// Creates a coverage model based on the provided configuration
///
/// # Errors
///
/// Returns an error if there are problems reading or processing data
pub fn create_coverage_model(config: &CoverageModelConfig) -> Result<CoverageModel, Error> {
    validate_config(config)?;

    info!(
        "Processing street network: {}",
        config.graph_path.display()
    );

    // Parse the network in a separate thread while the shelter list is read
    let graph_path = config.graph_path.clone();
    let graph_handle = std::thread::spawn(move || read_street_graph(&graph_path));

    let shelters = read_shelters(&config.shelters_path)?;

    let graph = graph_handle
        .join()
        .map_err(|_| Error::UnrecoverableError("Street network loading thread panicked"))??;

    let model = CoverageModel::build(graph, &shelters, config.radius, config.max_snap_distance)?;
    info!("Coverage model created successfully");
    Ok(model)
}

fn validate_radius(radius: Meters) -> Result<(), Error> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidRadius(radius))
    }
}

fn validate_config(config: &CoverageModelConfig) -> Result<(), Error> {
    validate_radius(config.radius)?;

    if let Some(max) = config.max_snap_distance {
        if !max.is_finite() || max < 0.0 {
            return Err(Error::InvalidData(format!(
                "Maximum snap distance must be a non-negative number of meters, got {max}"
            )));
        }
    }

    for path in [&config.graph_path, &config.shelters_path] {
        if !path.exists() {
            return Err(Error::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Input file not found: {}", path.display()),
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::algo::fixtures::{A, B, line_graph};

    #[test]
    fn build_inserts_and_propagates() {
        let graph = line_graph(11.0, 11.0);
        let shelters = vec![Shelter::new("east", 0.0, 0.00015)];

        let model = CoverageModel::build(graph, &shelters, 30.0, None).unwrap();

        assert_eq!(model.shelter_count(), 1);
        let shelter = model.shelter_nodes[0];
        assert_eq!(model.graph.rem(shelter), Some(30.0));
        assert!(model.graph.rem(B).unwrap() > 20.0);
        assert_eq!(model.coverage().len(), 6);
        assert!(model.graph.rem(A).is_some());
    }

    #[test]
    fn build_rejects_non_positive_radius() {
        let graph = line_graph(11.0, 11.0);
        let shelters = vec![Shelter::new("east", 0.0, 0.00015)];
        assert!(matches!(
            CoverageModel::build(graph, &shelters, -5.0, None),
            Err(Error::InvalidRadius(_))
        ));
    }

    #[test]
    fn config_requires_existing_files() {
        let config = CoverageModelConfig {
            graph_path: PathBuf::from("missing/graph.json"),
            shelters_path: PathBuf::from("missing/shelters.json"),
            radius: 100.0,
            max_snap_distance: None,
        };
        assert!(matches!(
            create_coverage_model(&config),
            Err(Error::IoError(_))
        ));
    }
}
