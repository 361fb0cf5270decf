pub mod errors;
pub mod coordinate;
pub mod geometry;
pub mod feature;
pub mod io;
pub mod config;
pub mod utils;
pub mod commands;
pub mod api;

pub use crate::api::{CollectionSummary, ProjectionReport, VectorKit};
pub use crate::config::ReprojectionConfig;
pub use crate::errors::{VectorError, VectorResult};

pub use coordinate::{CoordinateSystem, CoordinateTransformer, CrsTransform, Position, ProjectionEngine};
pub use feature::{reproject_feature_collection, Feature, FeatureCollection, GeometryPolicy, Schema};
pub use geometry::{reproject_geometry, Coordinates, Geometry, GeometryKind, Reprojector};
