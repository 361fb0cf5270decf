//! Coordinate handling for geospatial data
//!
//! This module resolves coordinate reference systems and transforms
//! positions between them.

mod point;
mod crs;
mod ellipsoid;
mod swiss;
mod transform;
mod utm;
#[cfg(feature = "proj")]
mod proj_backend;

// Re-export key types
pub use self::point::Position;
pub use self::crs::{epsg_urn, parse_epsg, CoordinateSystem};
pub use self::ellipsoid::{Ellipsoid, BESSEL_1841, GRS80, WGS84};
pub use self::transform::{
    build_transform, web_mercator_to_wgs84, wgs84_to_web_mercator, CoordinateTransformer,
    CrsTransform, ProjectionEngine,
};
#[cfg(feature = "proj")]
pub use self::proj_backend::ProjTransform;
