use std::path::{Path, PathBuf};

use serde::Deserialize;
use walkshed_core::Error;

use crate::cli::Args;

const DEFAULT_OUTPUT: &str = "coverage.json";

/// Values read from the optional TOML settings file
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileSettings {
    pub graph: Option<PathBuf>,
    pub shelters: Option<PathBuf>,
    pub radius: Option<f64>,
    pub output: Option<PathBuf>,
    pub geojson: Option<PathBuf>,
    pub max_snap_distance: Option<f64>,
}

impl FileSettings {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
            .map_err(|e| Error::InvalidData(format!("Invalid settings in {}: {e}", path.display())))
    }

    fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

/// Fully resolved run settings
#[derive(Debug, PartialEq)]
pub struct Settings {
    pub graph: PathBuf,
    pub shelters: PathBuf,
    pub radius: Option<f64>,
    pub output: PathBuf,
    pub geojson: Option<PathBuf>,
    pub max_snap_distance: Option<f64>,
    pub add_points: Vec<(f64, f64)>,
}

impl Settings {
    /// Merges command line arguments over the settings file
    pub fn resolve(args: Args, file: FileSettings) -> Result<Self, Error> {
        let graph = args
            .graph
            .or(file.graph)
            .ok_or_else(|| Error::InvalidData("No street network file given".to_string()))?;
        let shelters = args
            .shelters
            .or(file.shelters)
            .ok_or_else(|| Error::InvalidData("No shelter file given".to_string()))?;

        Ok(Self {
            graph,
            shelters,
            radius: args.radius.or(file.radius),
            output: args
                .output
                .or(file.output)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            geojson: args.geojson.or(file.geojson),
            max_snap_distance: args.max_snap_distance.or(file.max_snap_distance),
            add_points: args.add_points,
        })
    }
}
