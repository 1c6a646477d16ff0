use std::path::PathBuf;

use clap::Parser;

/// Marks the street segments within walking distance of at least one shelter.
#[derive(Parser, Debug, Default)]
#[command(name = "walkshed", version)]
pub struct Args {
    /// TOML settings file; explicit flags take precedence over its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Street network JSON file
    #[arg(short, long)]
    pub graph: Option<PathBuf>,
    /// Shelter list, JSON or CSV
    #[arg(short, long)]
    pub shelters: Option<PathBuf>,
    /// Walking radius in meters; prompted for when not given anywhere
    #[arg(short, long)]
    pub radius: Option<f64>,
    /// Where to write the coverage map
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Also write the classified segments as GeoJSON
    #[arg(long)]
    pub geojson: Option<PathBuf>,
    /// Warn about shelters farther than this many meters from any street
    #[arg(long)]
    pub max_snap_distance: Option<f64>,
    /// Extra `LAT,LON` point added after propagation, may be repeated
    #[arg(long = "add-point", value_parser = parse_lat_lon)]
    pub add_points: Vec<(f64, f64)>,
}

fn parse_lat_lon(s: &str) -> Result<(f64, f64), String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got '{s}'"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("invalid latitude '{lat}': {e}"))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|e| format!("invalid longitude '{lon}': {e}"))?;
    // NaN and infinities fall outside both ranges
    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("latitude must be within [-90, 90], got {lat}"));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(format!("longitude must be within [-180, 180], got {lon}"));
    }
    Ok((lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repeated_points() {
        let args = Args::try_parse_from([
            "walkshed",
            "--graph",
            "g.json",
            "--add-point",
            "32.01,34.77",
            "--add-point",
            "32.02, 34.78",
        ])
        .unwrap();
        assert_eq!(args.add_points, vec![(32.01, 34.77), (32.02, 34.78)]);
        assert_eq!(args.radius, None);
    }

    #[test]
    fn rejects_malformed_points() {
        assert!(parse_lat_lon("32.01").is_err());
        assert!(parse_lat_lon("north,34.77").is_err());
    }

    #[test]
    fn rejects_non_finite_and_out_of_range_points() {
        for bad in ["NaN,NaN", "inf,0", "0,-inf", "91,0", "-90.5,10", "0,180.01"] {
            assert!(parse_lat_lon(bad).is_err(), "{bad} was accepted");
        }
        assert_eq!(parse_lat_lon("-90,180"), Ok((-90.0, 180.0)));

        let result = Args::try_parse_from(["walkshed", "--add-point", "NaN,NaN"]);
        assert!(result.is_err());
    }
}
