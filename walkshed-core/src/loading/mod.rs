//! This module is responsible for reading the street network and the shelter
//! list and building a propagated coverage model from them.

mod builder;
mod config;
mod network;
mod raw_types;
mod shelters;

pub use builder::{CoverageModel, create_coverage_model};
pub use config::CoverageModelConfig;
pub use network::{read_street_graph, street_graph_from_reader};
pub use raw_types::{RawEdge, RawNetwork, RawNode, RawShelter};
pub use shelters::{read_shelters, shelters_from_csv, shelters_from_json};
