use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use log::{debug, info};
use serde_json::{Map, Value};

use crate::config::ReprojectionConfig;
use crate::coordinate::{build_transform, parse_epsg};
use crate::errors::{VectorError, VectorResult};
use crate::feature::{collect_with_policy, reproject_feature, Feature, FeatureCollection, Schema};
use crate::geometry::{Geometry, Reprojector};
use crate::io::{read_collection, write_collection};
use crate::utils::progress::ProgressTracker;

/// Main interface to the VectorKit library
pub struct VectorKit {
    config: ReprojectionConfig,
    /// Source CRS that takes precedence over the input's own declaration
    source_crs: Option<String>,
}

/// Counts and CRS codes of a finished reprojection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionReport {
    pub source_epsg: u32,
    pub target_epsg: u32,
    pub total: usize,
    pub written: usize,
    pub skipped: usize,
}

impl fmt::Display for ProjectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EPSG:{} -> EPSG:{}: {} of {} feature(s) written, {} skipped",
            self.source_epsg, self.target_epsg, self.written, self.total, self.skipped
        )
    }
}

/// Overview of a vector file
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSummary {
    pub feature_count: usize,
    /// CRS identifier as declared in the file
    pub crs: Option<String>,
    /// Feature count per geometry type name, including unsupported ones
    pub kinds: BTreeMap<String, usize>,
    pub null_geometries: usize,
    pub schema: Schema,
}

impl fmt::Display for CollectionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Features: {}", self.feature_count)?;
        writeln!(f, "CRS: {}", self.crs.as_deref().unwrap_or("not declared"))?;
        for (kind, count) in &self.kinds {
            writeln!(f, "  {}: {}", kind, count)?;
        }
        if self.null_geometries > 0 {
            writeln!(f, "  (no geometry): {}", self.null_geometries)?;
        }
        write!(f, "Schema: {}", self.schema.describe())
    }
}

impl VectorKit {
    /// Create a new VectorKit instance
    ///
    /// # Arguments
    /// * `config` - Settings for every call made through this instance
    pub fn new(config: ReprojectionConfig) -> Self {
        VectorKit {
            config,
            source_crs: None,
        }
    }

    /// Force the source CRS instead of reading it from the input
    pub fn with_source_crs(mut self, source_crs: &str) -> Self {
        self.source_crs = Some(source_crs.to_string());
        self
    }

    pub fn config(&self) -> &ReprojectionConfig {
        &self.config
    }

    /// Reproject a vector file into another CRS
    ///
    /// The source CRS is the forced one, else the file's `crs` member, else
    /// the configured default. Both drivers are picked from the file
    /// extensions.
    ///
    /// # Arguments
    /// * `input_path` - File to read
    /// * `output_path` - File to write, replaced if it exists
    /// * `target_crs` - Optional target CRS, defaults to the configured one
    /// * `target_schema` - Optional schema for the written properties
    ///
    /// # Returns
    /// Counts of written and skipped features, or the first error under the
    /// strict policy
    pub fn project_vector(
        &self,
        input_path: &str,
        output_path: &str,
        target_crs: Option<&str>,
        target_schema: Option<&Schema>,
    ) -> VectorResult<ProjectionReport> {
        let input_driver = self.config.driver_for(Path::new(input_path))?;
        let output_driver = self.config.driver_for(Path::new(output_path))?;

        let collection = read_collection(Path::new(input_path), input_driver)?;
        let (projected, report) = self.project_collection(collection, target_crs, target_schema)?;

        write_collection(Path::new(output_path), &projected, output_driver)?;
        info!("{}", report);
        Ok(report)
    }

    /// Reproject an in-memory collection
    ///
    /// A collection-level `bbox` is dropped along with the features' own.
    ///
    /// # Returns
    /// The reprojected collection, tagged with the target CRS, and its report
    pub fn project_collection(
        &self,
        mut collection: FeatureCollection,
        target_crs: Option<&str>,
        target_schema: Option<&Schema>,
    ) -> VectorResult<(FeatureCollection, ProjectionReport)> {
        let source_crs = self
            .source_crs
            .clone()
            .or_else(|| collection.crs.clone())
            .unwrap_or_else(|| self.config.default_source_crs.clone());
        let target_crs = target_crs.unwrap_or(&self.config.default_target_crs);

        let reprojector = Reprojector::from_identifiers(&source_crs, target_crs, self.config.engine)?;
        info!(
            "Reprojecting {} feature(s) from EPSG:{} to EPSG:{} ({:?} engine, {:?} policy)",
            collection.len(),
            reprojector.source_epsg(),
            reprojector.target_epsg(),
            self.config.engine,
            self.config.geometry_policy
        );

        collection.foreign_members.remove("bbox");
        let total = collection.len();
        let progress = ProgressTracker::new(total as u64, "Reprojecting", self.config.show_progress);
        let results = collection.features.into_iter().map(|feature| {
            let result = reproject_feature(&reprojector, feature, target_schema);
            progress.increment(1);
            result
        });
        let outcome = collect_with_policy(results, self.config.geometry_policy)?;
        progress.finish(outcome.skipped);

        let report = ProjectionReport {
            source_epsg: reprojector.source_epsg(),
            target_epsg: reprojector.target_epsg(),
            total,
            written: outcome.features.len(),
            skipped: outcome.skipped,
        };

        let projected = FeatureCollection {
            crs: None,
            features: outcome.features,
            foreign_members: collection.foreign_members,
        }
        .with_epsg(report.target_epsg);

        Ok((projected, report))
    }

    /// Write geometries of one kind as features sharing a property map
    ///
    /// With a blueprint, the output takes the blueprint file's CRS, and its
    /// driver when the output extension has no driver of its own. An
    /// explicit `crs` still wins over the blueprint's.
    ///
    /// # Arguments
    /// * `geometries` - Geometries to write, all of the same kind
    /// * `output_path` - File to write, driver picked from its extension
    /// * `properties` - Properties copied onto every feature
    /// * `crs` - CRS recorded in the file, defaults to the blueprint's, then the configured target
    /// * `blueprint` - Optional existing vector file to take driver and CRS from
    /// * `schema` - Optional schema every written feature is projected onto
    ///
    /// # Returns
    /// The number of features written
    pub fn write_geometries(
        &self,
        geometries: &[Geometry],
        output_path: &str,
        properties: &Map<String, Value>,
        crs: Option<&str>,
        blueprint: Option<&str>,
        schema: Option<&Schema>,
    ) -> VectorResult<usize> {
        let first = geometries
            .first()
            .ok_or_else(|| VectorError::GenericError("No geometries to write".to_string()))?;

        for geometry in geometries {
            if geometry.kind != first.kind {
                return Err(VectorError::malformed(
                    geometry.kind.name(),
                    format!("cannot be written alongside {} geometries", first.kind),
                ));
            }
            geometry.validate()?;
        }

        let blueprint = match blueprint {
            Some(path) => {
                let driver = self.config.driver_for(Path::new(path))?;
                let collection = read_collection(Path::new(path), driver)?;
                debug!("Blueprint {} is {} with CRS {:?}", path, driver, collection.crs);
                Some((driver, collection.crs))
            }
            None => None,
        };

        let driver = match (self.config.driver_for(Path::new(output_path)), &blueprint) {
            (Ok(driver), _) => driver,
            (Err(VectorError::UnsupportedDriver(_)), Some((driver, _))) => *driver,
            (Err(e), _) => return Err(e),
        };
        let crs = crs
            .map(str::to_string)
            .or_else(|| blueprint.and_then(|(_, crs)| crs))
            .unwrap_or_else(|| self.config.default_target_crs.clone());
        let epsg = parse_epsg(&crs)?;

        let features = geometries
            .iter()
            .map(|geometry| {
                let feature = Feature::new(Some(geometry.to_json()), properties.clone());
                match schema {
                    Some(schema) => schema.apply(feature),
                    None => Ok(feature),
                }
            })
            .collect::<VectorResult<Vec<_>>>()?;
        let collection = FeatureCollection::new(features).with_epsg(epsg);

        write_collection(Path::new(output_path), &collection, driver)?;
        Ok(collection.len())
    }

    /// Transform a single coordinate between two CRS identifiers
    pub fn transform_point(&self, x: f64, y: f64, source_crs: &str, target_crs: &str) -> VectorResult<(f64, f64)> {
        let transform = build_transform(parse_epsg(source_crs)?, parse_epsg(target_crs)?, self.config.engine)?;
        let (tx, ty) = transform.transform(x, y)?;
        debug!("Transformed ({}, {}) to ({}, {})", x, y, tx, ty);
        Ok((tx, ty))
    }

    /// Summarize a vector file
    pub fn inspect(&self, input_path: &str) -> VectorResult<CollectionSummary> {
        let driver = self.config.driver_for(Path::new(input_path))?;
        let collection = read_collection(Path::new(input_path), driver)?;

        let mut kinds = BTreeMap::new();
        let mut null_geometries = 0;
        for feature in &collection.features {
            match feature.geometry_type() {
                Some(kind) => *kinds.entry(kind.to_string()).or_insert(0) += 1,
                None => null_geometries += 1,
            }
        }

        Ok(CollectionSummary {
            feature_count: collection.len(),
            crs: collection.crs.clone(),
            kinds,
            null_geometries,
            schema: Schema::infer(&collection),
        })
    }
}

impl Default for VectorKit {
    fn default() -> Self {
        VectorKit::new(ReprojectionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::GeometryPolicy;
    use crate::feature::PropertyType;
    use crate::geometry::{Coordinates, GeometryKind};
    use crate::io::Driver;
    use serde_json::json;

    fn collection() -> FeatureCollection {
        let features = vec![
            json!({"type": "Feature", "geometry": {"type": "Point", "coordinates": [8.54, 47.37]}, "properties": {"i": 0}}),
            json!({"type": "Feature", "geometry": {"type": "GeometryCollection", "geometries": []}, "properties": {"i": 1}}),
            json!({"type": "Feature", "geometry": {"type": "Point", "coordinates": [7.44, 46.95]}, "properties": {"i": 2}}),
        ];
        FeatureCollection::new(features.into_iter().map(|f| Feature::from_json(f).unwrap()).collect())
    }

    fn kit(policy: GeometryPolicy) -> VectorKit {
        let mut config = ReprojectionConfig::default();
        config.geometry_policy = policy;
        VectorKit::new(config)
    }

    #[test]
    fn test_lenient_collection_skips_unsupported() {
        let (projected, report) = kit(GeometryPolicy::Lenient)
            .project_collection(collection(), None, None)
            .unwrap();

        assert_eq!(report.total, 3);
        assert_eq!(report.written, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.source_epsg, 4326);
        assert_eq!(report.target_epsg, 2056);
        assert_eq!(projected.epsg().unwrap(), Some(2056));
        assert_eq!(projected.features[1].properties.as_ref().unwrap()["i"], 2);
    }

    #[test]
    fn test_strict_collection_aborts() {
        let result = kit(GeometryPolicy::Strict).project_collection(collection(), Some("EPSG:3857"), None);
        assert!(matches!(result, Err(VectorError::UnsupportedGeometryKind(_))));
    }

    #[test]
    fn test_declared_crs_is_used_as_source() {
        let input = FeatureCollection::new(vec![Feature::from_json(json!({
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [2600000.0, 1200000.0]},
            "properties": {}
        }))
        .unwrap()])
        .with_epsg(2056);

        let (projected, report) = VectorKit::default().project_collection(input, Some("EPSG:21781"), None).unwrap();
        let coordinates = &projected.features[0].geometry.as_ref().unwrap()["coordinates"];

        assert_eq!(report.source_epsg, 2056);
        assert!((coordinates[0].as_f64().unwrap() - 600000.0).abs() < 0.5);
        assert!((coordinates[1].as_f64().unwrap() - 200000.0).abs() < 0.5);
    }

    #[test]
    fn test_forced_source_crs_wins() {
        let input = FeatureCollection::new(Vec::new()).with_epsg(2056);
        let (_, report) = VectorKit::default()
            .with_source_crs("EPSG:3857")
            .project_collection(input, Some("EPSG:4326"), None)
            .unwrap();
        assert_eq!(report.source_epsg, 3857);
    }

    fn swiss_point(crs: Value) -> FeatureCollection {
        FeatureCollection::from_json(json!({
            "type": "FeatureCollection",
            "crs": crs,
            "bbox": [2600000.0, 1200000.0, 2600000.0, 1200000.0],
            "name": "origin",
            "features": [{
                "type": "Feature",
                "bbox": [2600000.0, 1200000.0, 2600000.0, 1200000.0],
                "geometry": {"type": "Point", "coordinates": [2600000.0, 1200000.0]},
                "properties": {}
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_epsg_code_crs_member_is_used_as_source() {
        let input = swiss_point(json!({"type": "EPSG", "properties": {"code": 2056}}));

        let (projected, report) = VectorKit::default().project_collection(input, Some("EPSG:21781"), None).unwrap();
        let coordinates = &projected.features[0].geometry.as_ref().unwrap()["coordinates"];

        assert_eq!(report.source_epsg, 2056);
        assert!((coordinates[0].as_f64().unwrap() - 600000.0).abs() < 0.5);
        assert!((coordinates[1].as_f64().unwrap() - 200000.0).abs() < 0.5);
    }

    #[test]
    fn test_unreadable_crs_member_fails_unless_overridden() {
        let link = json!({"type": "link", "properties": {"href": "http://example.com/crs/42", "type": "proj4"}});

        let result = VectorKit::default().project_collection(swiss_point(link.clone()), Some("EPSG:21781"), None);
        assert!(matches!(result, Err(VectorError::UnresolvableCrs(_))));

        let (_, report) = VectorKit::default()
            .with_source_crs("EPSG:2056")
            .project_collection(swiss_point(link), Some("EPSG:21781"), None)
            .unwrap();
        assert_eq!(report.source_epsg, 2056);
    }

    #[test]
    fn test_bbox_dropped_from_collection_and_features() {
        let input = swiss_point(json!("EPSG:2056"));

        let (projected, _) = VectorKit::default().project_collection(input, Some("EPSG:4326"), None).unwrap();
        let written = projected.to_json();

        assert!(projected.foreign_members.get("bbox").is_none());
        assert_eq!(projected.foreign_members["name"], "origin");
        assert!(written.get("bbox").is_none());
        assert!(written["features"][0].get("bbox").is_none());
    }

    #[test]
    fn test_transform_point() {
        let (x, y) = VectorKit::default().transform_point(8.54, 47.37, "EPSG:4326", "EPSG:2056").unwrap();
        assert!((x - 2_683_186.29).abs() < 1.0);
        assert!((y - 1_247_156.74).abs() < 1.0);
    }

    #[test]
    fn test_write_geometries_rejects_mixed_and_empty() {
        let kit = VectorKit::default();
        let point = Geometry::new(GeometryKind::Point, Coordinates::from_json(&json!([0, 0])).unwrap()).unwrap();
        let line = Geometry::new(GeometryKind::LineString, Coordinates::from_json(&json!([[0, 0], [1, 1]])).unwrap()).unwrap();

        assert!(kit.write_geometries(&[], "unused.geojson", &Map::new(), None, None, None).is_err());
        assert!(matches!(
            kit.write_geometries(&[point, line], "unused.geojson", &Map::new(), None, None, None),
            Err(VectorError::MalformedGeometry { .. })
        ));
    }

    fn temp_path(name: &str) -> String {
        std::env::temp_dir()
            .join(format!("vectorkit_api_{}_{}", std::process::id(), name))
            .to_string_lossy()
            .into_owned()
    }

    fn lines() -> Vec<Geometry> {
        [json!([[0, 0], [1, 1]]), json!([[2, 2], [3, 3]])]
            .iter()
            .map(|c| Geometry::new(GeometryKind::LineString, Coordinates::from_json(c).unwrap()).unwrap())
            .collect()
    }

    #[test]
    fn test_write_geometries_takes_crs_and_driver_from_blueprint() {
        let blueprint = temp_path("blueprint.geojson");
        let output = temp_path("from_blueprint.dat");
        write_collection(Path::new(&blueprint), &FeatureCollection::new(Vec::new()).with_epsg(21781), Driver::GeoJson)
            .unwrap();

        let kit = VectorKit::default();
        let count = kit
            .write_geometries(&lines(), &output, &Map::new(), None, Some(&blueprint), None)
            .unwrap();
        assert_eq!(count, 2);

        let written = read_collection(Path::new(&output), Driver::GeoJson).unwrap();
        assert_eq!(written.epsg().unwrap(), Some(21781));
        assert_eq!(written.len(), 2);

        kit.write_geometries(&lines(), &output, &Map::new(), Some("EPSG:2056"), Some(&blueprint), None)
            .unwrap();
        let overridden = read_collection(Path::new(&output), Driver::GeoJson).unwrap();
        assert_eq!(overridden.epsg().unwrap(), Some(2056));

        std::fs::remove_file(&blueprint).unwrap();
        std::fs::remove_file(&output).unwrap();
    }

    #[test]
    fn test_write_geometries_without_blueprint_needs_known_extension() {
        let result = VectorKit::default().write_geometries(&lines(), &temp_path("plain.dat"), &Map::new(), None, None, None);
        assert!(matches!(result, Err(VectorError::UnsupportedDriver(_))));
    }

    #[test]
    fn test_write_geometries_applies_schema() {
        let output = temp_path("schema_lines.geojson");
        let mut properties = Map::new();
        properties.insert("layer".to_string(), json!("roads"));
        properties.insert("lanes".to_string(), json!("2"));
        properties.insert("internal".to_string(), json!(true));
        let schema = Schema::new(Some(GeometryKind::LineString))
            .with_property("layer", PropertyType::Str)
            .with_property("lanes", PropertyType::Int);

        let kit = VectorKit::default();
        kit.write_geometries(&lines(), &output, &properties, None, None, Some(&schema))
            .unwrap();

        let written = read_collection(Path::new(&output), Driver::GeoJson).unwrap();
        for feature in &written.features {
            let properties = feature.properties.as_ref().unwrap();
            assert_eq!(properties.len(), 2);
            assert_eq!(properties["layer"], "roads");
            assert_eq!(properties["lanes"], 2);
        }
        std::fs::remove_file(&output).unwrap();

        let polygons = Schema::new(Some(GeometryKind::Polygon));
        let result = kit.write_geometries(&lines(), &output, &properties, None, None, Some(&polygons));
        assert!(matches!(result, Err(VectorError::MalformedGeometry { .. })));
        assert!(!Path::new(&output).exists());
    }

    #[test]
    fn test_report_display() {
        let report = ProjectionReport {
            source_epsg: 4326,
            target_epsg: 2056,
            total: 3,
            written: 2,
            skipped: 1,
        };
        assert_eq!(report.to_string(), "EPSG:4326 -> EPSG:2056: 2 of 3 feature(s) written, 1 skipped");
    }
}
