//! Writing feature collections to disk

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use log::{debug, info};

use super::driver::Driver;
use crate::errors::VectorResult;
use crate::feature::FeatureCollection;

/// Write a feature collection with the given driver
///
/// An existing file at `path` is removed first. GeoJSON output records the
/// collection's CRS in a named `crs` member; GeoJSONSeq output is one
/// feature per line and has no place for it.
///
/// # Arguments
/// * `path` - Output file
/// * `collection` - Features to write
/// * `driver` - Output format
pub fn write_collection(path: &Path, collection: &FeatureCollection, driver: Driver) -> VectorResult<()> {
    if path.exists() {
        debug!("Removing existing {}", path.display());
        fs::remove_file(path)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);

    match driver {
        Driver::GeoJson => {
            serde_json::to_writer(&mut writer, &collection.to_json())?;
            writeln!(writer)?;
        }
        Driver::GeoJsonSeq => {
            for feature in &collection.features {
                serde_json::to_writer(&mut writer, &feature.to_json())?;
                writeln!(writer)?;
            }
        }
    }

    writer.flush()?;
    info!("Wrote {} feature(s) to {} as {}", collection.len(), path.display(), driver);
    Ok(())
}
