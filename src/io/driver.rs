//! Output drivers

use std::fmt;
use std::path::Path;

use serde::Deserialize;

/// Vector file formats the crate reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Driver {
    /// A single GeoJSON FeatureCollection document
    #[serde(rename = "GeoJSON")]
    GeoJson,
    /// One GeoJSON Feature per line
    #[serde(rename = "GeoJSONSeq")]
    GeoJsonSeq,
}

impl Driver {
    pub fn name(&self) -> &'static str {
        match self {
            Driver::GeoJson => "GeoJSON",
            Driver::GeoJsonSeq => "GeoJSONSeq",
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lowercased extension of a path without the dot
pub(crate) fn extension_key(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_key_is_lowercased() {
        assert_eq!(extension_key(Path::new("out/Gemeinden.GeoJSON")), Some("geojson".to_string()));
        assert_eq!(extension_key(Path::new("data.ndjson")), Some("ndjson".to_string()));
        assert_eq!(extension_key(Path::new("no_extension")), None);
    }

    #[test]
    fn test_driver_names_deserialize() {
        #[derive(Deserialize)]
        struct Table {
            a: Driver,
            b: Driver,
        }
        let table: Table = toml::from_str("a = \"GeoJSON\"\nb = \"GeoJSONSeq\"").unwrap();
        assert_eq!(table.a, Driver::GeoJson);
        assert_eq!(table.b, Driver::GeoJsonSeq);
        assert_eq!(Driver::GeoJsonSeq.to_string(), "GeoJSONSeq");
    }
}
