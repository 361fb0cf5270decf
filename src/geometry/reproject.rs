//! Geometry reprojection
//!
//! Walks a coordinate tree exactly as deep as the geometry kind prescribes
//! and rebuilds it with every leaf's x/y transformed.

use log::debug;
use serde_json::Value;

use super::coordinates::Coordinates;
use super::kind::GeometryKind;
use super::types::Geometry;
use crate::coordinate::{build_transform, parse_epsg, CrsTransform, ProjectionEngine};
use crate::errors::{VectorError, VectorResult};

/// Reprojects geometries with a source/target pair resolved once
pub struct Reprojector {
    transform: Box<dyn CrsTransform>,
}

impl Reprojector {
    /// Wrap an already resolved transform
    pub fn new(transform: Box<dyn CrsTransform>) -> Self {
        Reprojector { transform }
    }

    /// Resolve both CRS identifiers on the given engine
    pub fn from_identifiers(source_crs: &str, target_crs: &str, engine: ProjectionEngine) -> VectorResult<Self> {
        let source = parse_epsg(source_crs)?;
        let target = parse_epsg(target_crs)?;
        Ok(Self::new(build_transform(source, target, engine)?))
    }

    pub fn source_epsg(&self) -> u32 {
        self.transform.source_epsg()
    }

    pub fn target_epsg(&self) -> u32 {
        self.transform.target_epsg()
    }

    /// Reproject one geometry, preserving nesting and element counts
    pub fn reproject(&self, geometry: &Geometry) -> VectorResult<Geometry> {
        let coordinates = self.reproject_level(&geometry.coordinates, geometry.kind.depth(), geometry.kind)?;
        debug!(
            "Reprojected {} with {} position(s) from EPSG:{} to EPSG:{}",
            geometry.kind,
            coordinates.position_count(),
            self.source_epsg(),
            self.target_epsg()
        );

        Ok(Geometry {
            kind: geometry.kind,
            coordinates,
        })
    }

    /// Reproject a GeoJSON geometry object
    ///
    /// Members besides `type` and `coordinates` are kept, except `bbox`
    /// which would no longer describe the reprojected geometry.
    pub fn reproject_json(&self, value: &Value) -> VectorResult<Value> {
        let geometry = Geometry::from_json(value)?;
        let reprojected = self.reproject(&geometry)?;

        let mut output = reprojected.to_json();
        if let (Some(source), Some(target)) = (value.as_object(), output.as_object_mut()) {
            for (key, member) in source {
                if !matches!(key.as_str(), "type" | "coordinates" | "bbox") {
                    target.insert(key.clone(), member.clone());
                }
            }
        }
        Ok(output)
    }

    fn reproject_level(&self, coordinates: &Coordinates, depth: usize, kind: GeometryKind) -> VectorResult<Coordinates> {
        match (coordinates, depth) {
            (Coordinates::Position(position), 0) => {
                Ok(Coordinates::Position(self.transform.transform_position(position)?))
            }
            (Coordinates::Sequence(items), depth) if depth > 0 => items
                .iter()
                .map(|item| self.reproject_level(item, depth - 1, kind))
                .collect::<VectorResult<Vec<_>>>()
                .map(Coordinates::Sequence),
            (Coordinates::Position(_), depth) => Err(VectorError::malformed(
                kind.name(),
                format!("found a position where {} more level(s) of nesting were expected", depth),
            )),
            (Coordinates::Sequence(_), _) => Err(VectorError::malformed(
                kind.name(),
                "found a nested sequence where a position was expected",
            )),
        }
    }
}

/// Reproject a geometry between two CRS identifiers on the built-in engine
///
/// Both identifiers are resolved before any coordinate is touched; use a
/// [`Reprojector`] directly to reuse the resolution across geometries.
pub fn reproject_geometry(geometry: &Geometry, source_crs: &str, target_crs: &str) -> VectorResult<Geometry> {
    Reprojector::from_identifiers(source_crs, target_crs, ProjectionEngine::Builtin)?.reproject(geometry)
}
