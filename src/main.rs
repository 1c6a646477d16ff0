use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use geo::Point;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use walkshed_core::prelude::*;

mod cli;
mod settings;

use cli::Args;
use settings::{FileSettings, Settings};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Error> {
    let file = match &args.config {
        Some(path) => FileSettings::load(path)?,
        None => FileSettings::default(),
    };
    let settings = Settings::resolve(args, file)?;

    let radius = match settings.radius {
        Some(radius) => radius,
        None => prompt_radius()?,
    };

    let config = CoverageModelConfig {
        graph_path: settings.graph,
        shelters_path: settings.shelters,
        radius,
        max_snap_distance: settings.max_snap_distance,
    };
    let mut model = create_coverage_model(&config)?;

    for &(lat, lon) in &settings.add_points {
        let id = model.add_point(Point::new(lon, lat))?;
        let rem = model.graph.rem(id).unwrap_or_default();
        info!("Added point ({lat}, {lon}) as node {id} with {rem:.1}m of walking budget left");
    }

    let coverage = model.coverage();
    if coverage.covered_count() == 0 {
        warn!("No street segment is within {radius}m of a shelter");
    }
    write_coverage_map(&settings.output, &coverage)?;

    if let Some(path) = &settings.geojson {
        let collection = coverage_to_geojson(&model.graph, &coverage)?;
        write_geojson(path, &collection)?;
        info!("Saved {} features to {}", collection.features.len(), path.display());
    }

    Ok(())
}

fn prompt_radius() -> Result<f64, Error> {
    print!("Enter the max distance from a shelter (in meters): ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let radius: f64 = line
        .trim()
        .parse()
        .map_err(|e| Error::InvalidData(format!("Invalid radius '{}': {e}", line.trim())))?;
    if !radius.is_finite() || radius <= 0.0 {
        return Err(Error::InvalidRadius(radius));
    }
    Ok(radius)
}
