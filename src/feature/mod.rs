//! Features and batch reprojection

mod batch;
mod schema;
mod types;

pub use batch::{
    collect_with_policy, reproject_feature, reproject_feature_collection, reproject_features, BatchOutcome,
    GeometryPolicy,
};
pub use schema::{PropertyType, Schema};
pub use types::{Feature, FeatureCollection};
