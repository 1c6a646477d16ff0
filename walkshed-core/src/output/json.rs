use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;

use crate::{CoverageMap, Error};

/// Writes the coverage map as a JSON object keyed by `"<u> <v> <key>"`
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_coverage_map(path: &Path, coverage: &CoverageMap) -> Result<(), Error> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, coverage)?;
    writer.flush()?;

    info!(
        "Saved {} segment records ({} covered) to {}",
        coverage.len(),
        coverage.covered_count(),
        path.display()
    );
    Ok(())
}
