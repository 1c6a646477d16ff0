use std::path::PathBuf;

use crate::Meters;

/// Inputs needed to build a [`CoverageModel`](super::CoverageModel) from files
#[derive(Debug, Clone)]
pub struct CoverageModelConfig {
    /// Street network in the JSON node/edge format
    pub graph_path: PathBuf,
    /// Shelter list, CSV when the extension is `.csv` and JSON otherwise
    pub shelters_path: PathBuf,
    /// Walking radius around each shelter in meters
    pub radius: Meters,
    /// Shelters farther than this from any street are reported
    pub max_snap_distance: Option<Meters>,
}
