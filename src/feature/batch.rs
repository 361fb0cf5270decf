//! Batch reprojection of features

use log::{debug, warn};
use serde::Deserialize;

use super::schema::Schema;
use super::types::Feature;
use crate::coordinate::ProjectionEngine;
use crate::errors::VectorResult;
use crate::geometry::Reprojector;

/// What to do with a feature whose geometry cannot be reprojected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryPolicy {
    /// Abort the run on the first failing feature
    #[default]
    Strict,
    /// Skip the failing feature with a warning
    Lenient,
}

/// Features that made it through a batch, plus the number left out
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchOutcome {
    pub features: Vec<Feature>,
    pub skipped: usize,
}

/// Reproject a single feature
///
/// A feature without geometry passes through. Properties pass through as
/// they are, or are projected onto `schema` when one is given. A `bbox`
/// member is dropped since it is expressed in the source CRS.
pub fn reproject_feature(reprojector: &Reprojector, mut feature: Feature, schema: Option<&Schema>) -> VectorResult<Feature> {
    if let Some(geometry) = &feature.geometry {
        feature.geometry = Some(reprojector.reproject_json(geometry)?);
    }
    feature.foreign_members.remove("bbox");

    match schema {
        Some(schema) => schema.apply(feature),
        None => Ok(feature),
    }
}

/// Reproject every feature, one result per input feature in input order
pub fn reproject_features(
    reprojector: &Reprojector,
    features: &[Feature],
    schema: Option<&Schema>,
) -> Vec<VectorResult<Feature>> {
    features
        .iter()
        .map(|feature| reproject_feature(reprojector, feature.clone(), schema))
        .collect()
}

/// Reproject features between two CRS identifiers on the built-in engine
///
/// # Arguments
/// * `features` - Features to reproject
/// * `source_crs` - CRS identifier of the input coordinates
/// * `target_crs` - CRS identifier of the output coordinates
/// * `target_schema` - Optional schema the output properties are projected onto
///
/// # Returns
/// The outer result fails when either CRS cannot be resolved; otherwise one
/// result per feature, in input order.
pub fn reproject_feature_collection(
    features: &[Feature],
    source_crs: &str,
    target_crs: &str,
    target_schema: Option<&Schema>,
) -> VectorResult<Vec<VectorResult<Feature>>> {
    let reprojector = Reprojector::from_identifiers(source_crs, target_crs, ProjectionEngine::Builtin)?;
    Ok(reproject_features(&reprojector, features, target_schema))
}

/// Apply a geometry policy to per-feature results
///
/// Under [`GeometryPolicy::Strict`] the first failure is returned. Under
/// [`GeometryPolicy::Lenient`] failing features are logged and counted.
/// Non-feature errors such as I/O or CRS failures abort under either policy.
pub fn collect_with_policy<I>(results: I, policy: GeometryPolicy) -> VectorResult<BatchOutcome>
where
    I: IntoIterator<Item = VectorResult<Feature>>,
{
    let mut outcome = BatchOutcome::default();

    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(feature) => outcome.features.push(feature),
            Err(e) if policy == GeometryPolicy::Lenient && e.is_feature_error() => {
                warn!("Skipping feature {}: {}", index, e);
                outcome.skipped += 1;
            }
            Err(e) => {
                debug!("Feature {} failed under {:?} policy", index, policy);
                return Err(e);
            }
        }
    }

    Ok(outcome)
}
