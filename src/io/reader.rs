//! Reading feature collections from disk

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info};
use serde_json::Value;

use super::driver::Driver;
use crate::errors::{VectorError, VectorResult};
use crate::feature::{Feature, FeatureCollection};

/// RFC 8142 record separator that may prefix each GeoJSON text sequence record
const RECORD_SEPARATOR: char = '\u{1e}';

/// Read a feature collection with the given driver
///
/// # Arguments
/// * `path` - File to read
/// * `driver` - Format of the file
///
/// # Returns
/// The decoded collection; GeoJSONSeq files carry no CRS member
pub fn read_collection(path: &Path, driver: Driver) -> VectorResult<FeatureCollection> {
    info!("Reading {} as {}", path.display(), driver);

    let file = File::open(path).map_err(|e| {
        VectorError::IoError(std::io::Error::new(
            e.kind(),
            format!("cannot open {}: {}", path.display(), e),
        ))
    })?;
    let reader = BufReader::new(file);

    let collection = match driver {
        Driver::GeoJson => {
            let value: Value = serde_json::from_reader(reader)?;
            FeatureCollection::from_json(value)?
        }
        Driver::GeoJsonSeq => read_sequence(reader)?,
    };

    debug!("Read {} feature(s) from {}", collection.len(), path.display());
    Ok(collection)
}

fn read_sequence<R: BufRead>(reader: R) -> VectorResult<FeatureCollection> {
    let mut features = Vec::new();

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let record = line.trim().trim_start_matches(RECORD_SEPARATOR);
        if record.is_empty() {
            continue;
        }

        let value: Value = serde_json::from_str(record).map_err(|e| {
            VectorError::GenericError(format!("line {}: {}", number + 1, e))
        })?;
        features.push(Feature::from_json(value)?);
    }

    Ok(FeatureCollection::new(features))
}
