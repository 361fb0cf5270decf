//! Coordinate transformation functionality

use std::f64::consts::PI;

use log::debug;
use serde::Deserialize;

use super::crs::CoordinateSystem;
use super::point::Position;
use crate::errors::{VectorError, VectorResult};

/// Earth radius in meters used by the spherical Web Mercator
pub const EARTH_RADIUS: f64 = 6378137.0;

/// Latitude limit of the Web Mercator square
const MAX_MERCATOR_LATITUDE: f64 = 85.06;

/// Convert coordinates from WGS84 (EPSG:4326) to Web Mercator (EPSG:3857)
///
/// Latitude is clamped to the valid range of the projection.
pub fn wgs84_to_web_mercator(lon: f64, lat: f64) -> Position {
    let lat = lat.clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE);

    let x = lon * PI * EARTH_RADIUS / 180.0;
    let y = EARTH_RADIUS * f64::ln(f64::tan(PI / 4.0 + lat.to_radians() / 2.0));

    Position::new(x, y)
}

/// Convert coordinates from Web Mercator (EPSG:3857) to WGS84 (EPSG:4326)
pub fn web_mercator_to_wgs84(x: f64, y: f64) -> Position {
    let lon = (x * 180.0) / (EARTH_RADIUS * PI);
    let lat = (2.0 * f64::atan(f64::exp(y / EARTH_RADIUS)) - PI / 2.0).to_degrees();

    Position::new(lon, lat)
}

/// Which projection engine resolves CRS pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionEngine {
    /// Pure-Rust formulas for the built-in CRS table
    #[default]
    Builtin,
    /// The PROJ library, available with the `proj` cargo feature
    Proj,
}

/// A resolved source/target projection pair
///
/// Resolution happens once; `transform` is then called for every
/// coordinate of a run and must not mutate shared state.
pub trait CrsTransform {
    /// Transform one (x, y) pair from source to target
    fn transform(&self, x: f64, y: f64) -> VectorResult<(f64, f64)>;

    /// EPSG code of the source CRS
    fn source_epsg(&self) -> u32;

    /// EPSG code of the target CRS
    fn target_epsg(&self) -> u32;

    /// Transform a position, keeping its trailing ordinates
    fn transform_position(&self, position: &Position) -> VectorResult<Position> {
        let (x, y) = self.transform(position.x, position.y)?;
        Ok(position.with_xy(x, y))
    }
}

/// Transformer for converting between built-in coordinate systems
///
/// Every transform goes through WGS 84 geographic coordinates. There is no
/// shortcut when source and target are equal.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateTransformer {
    source: CoordinateSystem,
    target: CoordinateSystem,
}

impl CoordinateTransformer {
    /// Create a transformer for a resolved pair
    pub fn new(source: CoordinateSystem, target: CoordinateSystem) -> Self {
        CoordinateTransformer { source, target }
    }

    /// Resolve both EPSG codes and create a transformer
    pub fn from_epsg(source: u32, target: u32) -> VectorResult<Self> {
        Ok(Self::new(
            CoordinateSystem::from_epsg(source)?,
            CoordinateSystem::from_epsg(target)?,
        ))
    }

    pub fn source(&self) -> CoordinateSystem {
        self.source
    }

    pub fn target(&self) -> CoordinateSystem {
        self.target
    }
}

impl CrsTransform for CoordinateTransformer {
    fn transform(&self, x: f64, y: f64) -> VectorResult<(f64, f64)> {
        if !x.is_finite() || !y.is_finite() {
            return Err(VectorError::ProjectionError(format!(
                "Non-finite input coordinate ({}, {})",
                x, y
            )));
        }

        let (lon, lat) = self.source.to_wgs84(x, y);
        let (tx, ty) = self.target.from_wgs84(lon, lat);

        if !tx.is_finite() || !ty.is_finite() {
            return Err(VectorError::ProjectionError(format!(
                "({}, {}) has no finite image from {} to {}",
                x,
                y,
                self.source.description(),
                self.target.description()
            )));
        }

        Ok((tx, ty))
    }

    fn source_epsg(&self) -> u32 {
        self.source.epsg_code()
    }

    fn target_epsg(&self) -> u32 {
        self.target.epsg_code()
    }
}

/// Resolve a source/target pair on the chosen engine
pub fn build_transform(
    source_epsg: u32,
    target_epsg: u32,
    engine: ProjectionEngine,
) -> VectorResult<Box<dyn CrsTransform>> {
    debug!(
        "Resolving EPSG:{} -> EPSG:{} on {:?} engine",
        source_epsg, target_epsg, engine
    );

    match engine {
        ProjectionEngine::Builtin => Ok(Box::new(CoordinateTransformer::from_epsg(
            source_epsg,
            target_epsg,
        )?)),
        #[cfg(feature = "proj")]
        ProjectionEngine::Proj => Ok(Box::new(super::proj_backend::ProjTransform::new(
            source_epsg,
            target_epsg,
        )?)),
        #[cfg(not(feature = "proj"))]
        ProjectionEngine::Proj => Err(VectorError::ConfigError(
            "engine \"proj\" requires building with the `proj` feature".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn round_trip(a: u32, b: u32, lon: f64, lat: f64) {
        let there = CoordinateTransformer::from_epsg(a, b).unwrap();
        let back = CoordinateTransformer::from_epsg(b, a).unwrap();

        let (x, y) = there.transform(lon, lat).unwrap();
        let (lon2, lat2) = back.transform(x, y).unwrap();

        assert_abs_diff_eq!(lon2, lon, epsilon = 1e-6);
        assert_abs_diff_eq!(lat2, lat, epsilon = 1e-6);
    }

    #[test]
    fn test_round_trips_through_projected_systems() {
        round_trip(4326, 3857, 8.54, 47.37);
        round_trip(4326, 3857, -122.4194, 37.7749);
        round_trip(4326, 32632, 8.54, 47.37);
        round_trip(4326, 32721, -58.3816, -34.6037);
        round_trip(4326, 25832, 9.99, 53.55);
        round_trip(4326, 2056, 8.54, 47.37);
        round_trip(4326, 2056, 6.14, 46.2);
        round_trip(4326, 21781, 7.44, 46.95);
    }

    #[test]
    fn test_zurich_to_lv95() {
        let t = CoordinateTransformer::from_epsg(4326, 2056).unwrap();
        let (e, n) = t.transform(8.54, 47.37).unwrap();
        assert_abs_diff_eq!(e, 2_683_186.29, epsilon = 1.0);
        assert_abs_diff_eq!(n, 1_247_156.74, epsilon = 1.0);
    }

    #[test]
    fn test_web_mercator_known_value() {
        // Null island and the antimeridian
        let origin = wgs84_to_web_mercator(0.0, 0.0);
        assert_abs_diff_eq!(origin.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(origin.y, 0.0, epsilon = 1e-9);

        let edge = wgs84_to_web_mercator(180.0, 0.0);
        assert_abs_diff_eq!(edge.x, 20_037_508.342789244, epsilon = 1e-6);
    }

    #[test]
    fn test_web_mercator_clamps_latitude() {
        let pole = wgs84_to_web_mercator(0.0, 90.0);
        let limit = wgs84_to_web_mercator(0.0, MAX_MERCATOR_LATITUDE);
        assert_eq!(pole, limit);
    }

    #[test]
    fn test_same_crs_is_identity_within_tolerance() {
        let t = CoordinateTransformer::from_epsg(2056, 2056).unwrap();
        let (e, n) = t.transform(2_683_186.0, 1_247_156.0).unwrap();
        assert_abs_diff_eq!(e, 2_683_186.0, epsilon = 1e-2);
        assert_abs_diff_eq!(n, 1_247_156.0, epsilon = 1e-2);
    }

    #[test]
    fn test_non_finite_input_is_rejected() {
        let t = CoordinateTransformer::from_epsg(4326, 3857).unwrap();
        assert!(matches!(t.transform(f64::NAN, 1.0), Err(VectorError::ProjectionError(_))));
    }

    #[test]
    fn test_transform_position_keeps_z() {
        let t = CoordinateTransformer::from_epsg(4326, 2056).unwrap();
        let p = t.transform_position(&Position::new_3d(8.54, 47.37, 408.5).unwrap()).unwrap();
        assert_eq!(p.z(), Some(408.5));
        assert!(p.x > 2_000_000.0);
    }

    #[cfg(not(feature = "proj"))]
    #[test]
    fn test_proj_engine_requires_feature() {
        assert!(matches!(
            build_transform(4326, 2056, ProjectionEngine::Proj),
            Err(VectorError::ConfigError(_))
        ));
    }
}
