//! Reprojection settings
//!
//! Defaults are embedded from `vectorkit.toml` and parsed once. A user file
//! only needs the keys it changes.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use lazy_static::lazy_static;
use log::debug;
use serde::Deserialize;

use crate::coordinate::ProjectionEngine;
use crate::errors::{VectorError, VectorResult};
use crate::feature::GeometryPolicy;
use crate::io::driver::extension_key;
use crate::io::Driver;

lazy_static! {
    static ref DEFAULT_CONFIG: ReprojectionConfig = {
        let content = include_str!("../vectorkit.toml");
        ReprojectionConfig::fallback().merged_from_toml(content).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to parse embedded settings: {}", e);
            ReprojectionConfig::fallback()
        })
    };
}

/// Settings for a reprojection run
#[derive(Debug, Clone, PartialEq)]
pub struct ReprojectionConfig {
    /// CRS of inputs that do not declare one
    pub default_source_crs: String,
    /// CRS used when the caller names none
    pub default_target_crs: String,
    pub geometry_policy: GeometryPolicy,
    pub engine: ProjectionEngine,
    /// Lowercased extension to driver
    pub drivers: BTreeMap<String, Driver>,
    pub show_progress: bool,
}

/// Keys a settings file may set
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    default_source_crs: Option<String>,
    default_target_crs: Option<String>,
    geometry_policy: Option<GeometryPolicy>,
    engine: Option<ProjectionEngine>,
    #[serde(default)]
    drivers: BTreeMap<String, Driver>,
    show_progress: Option<bool>,
}

impl Default for ReprojectionConfig {
    fn default() -> Self {
        DEFAULT_CONFIG.clone()
    }
}

impl ReprojectionConfig {
    /// Settings used if the embedded file cannot be read
    fn fallback() -> Self {
        ReprojectionConfig {
            default_source_crs: "EPSG:4326".to_string(),
            default_target_crs: "EPSG:2056".to_string(),
            geometry_policy: GeometryPolicy::Strict,
            engine: ProjectionEngine::Builtin,
            drivers: BTreeMap::new(),
            show_progress: false,
        }
    }

    /// Defaults overridden by the keys present in `content`
    pub fn from_toml(content: &str) -> VectorResult<Self> {
        Self::default().merged_from_toml(content)
    }

    /// Defaults overridden by a settings file
    pub fn from_file<P: AsRef<Path>>(path: P) -> VectorResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            VectorError::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        debug!("Loaded settings from {}", path.display());
        Self::from_toml(&content)
    }

    fn merged_from_toml(mut self, content: &str) -> VectorResult<Self> {
        let file: ConfigFile = toml::from_str(content)?;

        if let Some(crs) = file.default_source_crs {
            self.default_source_crs = crs;
        }
        if let Some(crs) = file.default_target_crs {
            self.default_target_crs = crs;
        }
        if let Some(policy) = file.geometry_policy {
            self.geometry_policy = policy;
        }
        if let Some(engine) = file.engine {
            self.engine = engine;
        }
        if let Some(show) = file.show_progress {
            self.show_progress = show;
        }
        for (extension, driver) in file.drivers {
            let key = extension.trim_start_matches('.').to_ascii_lowercase();
            self.drivers.insert(key, driver);
        }

        Ok(self)
    }

    /// Driver for a path, looked up case-insensitively by extension
    pub fn driver_for(&self, path: &Path) -> VectorResult<Driver> {
        extension_key(path)
            .and_then(|ext| self.drivers.get(&ext).copied())
            .ok_or_else(|| VectorError::UnsupportedDriver(path.display().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_defaults() {
        let config = ReprojectionConfig::default();
        assert_eq!(config.default_source_crs, "EPSG:4326");
        assert_eq!(config.default_target_crs, "EPSG:2056");
        assert_eq!(config.geometry_policy, GeometryPolicy::Strict);
        assert_eq!(config.engine, ProjectionEngine::Builtin);
        assert!(!config.show_progress);
        assert_eq!(config.drivers.len(), 5);
    }

    #[test]
    fn test_driver_lookup_by_extension() {
        let config = ReprojectionConfig::default();
        assert_eq!(config.driver_for(Path::new("a.geojson")).unwrap(), Driver::GeoJson);
        assert_eq!(config.driver_for(Path::new("A.JSON")).unwrap(), Driver::GeoJson);
        assert_eq!(config.driver_for(Path::new("b.ndjson")).unwrap(), Driver::GeoJsonSeq);
        assert!(matches!(
            config.driver_for(Path::new("c.shp")),
            Err(VectorError::UnsupportedDriver(_))
        ));
        assert!(config.driver_for(Path::new("no_extension")).is_err());
    }

    #[test]
    fn test_partial_file_overrides_defaults() {
        let config = ReprojectionConfig::from_toml(
            r#"
            default_target_crs = "EPSG:21781"
            geometry_policy = "lenient"

            [drivers]
            ".GEOJSONSEQ" = "GeoJSONSeq"
            "#,
        )
        .unwrap();

        assert_eq!(config.default_target_crs, "EPSG:21781");
        assert_eq!(config.geometry_policy, GeometryPolicy::Lenient);
        assert_eq!(config.default_source_crs, "EPSG:4326");
        assert_eq!(config.driver_for(Path::new("x.geojsonseq")).unwrap(), Driver::GeoJsonSeq);
        assert_eq!(config.driver_for(Path::new("x.geojson")).unwrap(), Driver::GeoJson);
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        assert!(matches!(
            ReprojectionConfig::from_toml("geometry_policy = \"sometimes\""),
            Err(VectorError::ConfigError(_))
        ));
        assert!(matches!(
            ReprojectionConfig::from_toml("unknown_key = 1"),
            Err(VectorError::ConfigError(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ReprojectionConfig::from_file("/nonexistent/vectorkit.toml"),
            Err(VectorError::ConfigError(_))
        ));
    }
}
