//! Geometry model and reprojection
//!
//! This module holds the closed set of geometry kinds, the untyped
//! coordinate tree they carry, and the reprojector that rewrites every
//! leaf while keeping the tree's shape.

mod coordinates;
mod kind;
mod reproject;
mod types;

pub use coordinates::Coordinates;
pub(crate) use coordinates::json_type_name;
pub use kind::GeometryKind;
pub use reproject::{reproject_geometry, Reprojector};
pub use types::Geometry;
