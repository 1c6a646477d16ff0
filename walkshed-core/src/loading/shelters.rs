//! Shelter list input, JSON or CSV

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::info;

use super::raw_types::{CsvShelter, RawShelter};
use crate::{Error, Shelter};

/// Reads a shelter list, choosing the format by file extension
///
/// # Errors
///
/// Returns an error if the file cannot be opened or any record is malformed.
pub fn read_shelters(path: &Path) -> Result<Vec<Shelter>, Error> {
    let file = File::open(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to open file '{}': {}", path.display(), e),
        )
    })?;
    let reader = BufReader::new(file);

    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    let shelters = if is_csv {
        shelters_from_csv(reader)?
    } else {
        shelters_from_json(reader)?
    };

    info!("Loaded {} shelters from {}", shelters.len(), path.display());
    Ok(shelters)
}

/// Parses `[{"name": ..., "coords": [lat, lon]}, ...]`
///
/// # Errors
///
/// Returns an error on invalid JSON or coordinates.
pub fn shelters_from_json(reader: impl Read) -> Result<Vec<Shelter>, Error> {
    let raw: Vec<RawShelter> = serde_json::from_reader(reader)?;
    raw.into_iter()
        .map(|s| shelter(s.name, s.coords[0], s.coords[1]))
        .collect()
}

/// Parses a CSV file with a `name,lat,lon` header
///
/// # Errors
///
/// Returns an error on the first malformed row.
pub fn shelters_from_csv(reader: impl Read) -> Result<Vec<Shelter>, Error> {
    csv::Reader::from_reader(reader)
        .deserialize::<CsvShelter>()
        .map(|row| {
            let row = row?;
            shelter(row.name, row.lat, row.lon)
        })
        .collect()
}

fn shelter(name: String, lat: f64, lon: f64) -> Result<Shelter, Error> {
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(Error::InvalidData(format!(
            "Shelter '{name}' has invalid coordinates ({lat}, {lon})"
        )));
    }
    Ok(Shelter::new(name, lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_coords_are_lat_lon() {
        let json = r#"[{"name": "Shelter 12", "coords": [32.0105, 34.7702]}]"#;
        let shelters = shelters_from_json(json.as_bytes()).unwrap();

        assert_eq!(shelters.len(), 1);
        assert_eq!(shelters[0].name, "Shelter 12");
        assert_eq!(shelters[0].location.y(), 32.0105);
        assert_eq!(shelters[0].location.x(), 34.7702);
    }

    #[test]
    fn csv_rows_keep_order() {
        let csv = "name,lat,lon\nnorth,32.02,34.77\nsouth,32.00,34.78\n";
        let shelters = shelters_from_csv(csv.as_bytes()).unwrap();

        let names: Vec<_> = shelters.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["north", "south"]);
        assert_eq!(shelters[1].location.x(), 34.78);
    }

    #[test]
    fn malformed_rows_are_errors() {
        let csv = "name,lat,lon\nbroken,north,34.77\n";
        assert!(matches!(shelters_from_csv(csv.as_bytes()), Err(Error::CsvError(_))));

        let json = r#"[{"name": "nowhere", "coords": [132.0, 34.0]}]"#;
        assert!(matches!(
            shelters_from_json(json.as_bytes()),
            Err(Error::InvalidData(_))
        ));
    }
}
