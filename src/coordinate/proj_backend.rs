//! PROJ-backed transforms, enabled with the `proj` cargo feature

use log::debug;
use proj::Proj;

use super::transform::CrsTransform;
use crate::errors::{VectorError, VectorResult};

/// A source/target pair resolved by the PROJ library
pub struct ProjTransform {
    proj: Proj,
    source_epsg: u32,
    target_epsg: u32,
}

impl ProjTransform {
    /// Resolve a pair of EPSG codes through PROJ's database
    pub fn new(source_epsg: u32, target_epsg: u32) -> VectorResult<Self> {
        let from = format!("EPSG:{}", source_epsg);
        let to = format!("EPSG:{}", target_epsg);

        // new_known_crs normalises axis order, so geographic input stays lon/lat
        let proj = Proj::new_known_crs(&from, &to, None)
            .map_err(|e| VectorError::UnresolvableCrs(format!("{} -> {}: {}", from, to, e)))?;
        debug!("PROJ resolved {} -> {}", from, to);

        Ok(ProjTransform {
            proj,
            source_epsg,
            target_epsg,
        })
    }
}

impl CrsTransform for ProjTransform {
    fn transform(&self, x: f64, y: f64) -> VectorResult<(f64, f64)> {
        self.proj
            .convert((x, y))
            .map_err(|e| VectorError::ProjectionError(format!("({}, {}): {}", x, y, e)))
    }

    fn source_epsg(&self) -> u32 {
        self.source_epsg
    }

    fn target_epsg(&self) -> u32 {
        self.target_epsg
    }
}
