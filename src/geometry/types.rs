//! Geometry value: a kind plus its coordinate tree

use serde_json::{Map, Value};

use super::coordinates::{json_type_name, Coordinates};
use super::kind::GeometryKind;
use crate::errors::{VectorError, VectorResult};

/// A tagged geometry
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub kind: GeometryKind,
    pub coordinates: Coordinates,
}

impl Geometry {
    /// Create a geometry, checking that the nesting matches the kind
    pub fn new(kind: GeometryKind, coordinates: Coordinates) -> VectorResult<Self> {
        let geometry = Geometry { kind, coordinates };
        geometry.validate()?;
        Ok(geometry)
    }

    /// Check the coordinate nesting against the declared kind
    pub fn validate(&self) -> VectorResult<()> {
        if self.coordinates.matches_depth(self.kind.depth()) {
            Ok(())
        } else {
            Err(VectorError::malformed(
                self.kind.name(),
                format!("coordinates are not nested {} level(s) deep", self.kind.depth()),
            ))
        }
    }

    /// Decode a GeoJSON geometry object
    ///
    /// The kind is checked first so that e.g. a `GeometryCollection` is
    /// reported as unsupported rather than as missing coordinates. Nesting
    /// is not validated here; the reprojector reports it precisely.
    pub fn from_json(value: &Value) -> VectorResult<Self> {
        let object = value.as_object().ok_or_else(|| {
            VectorError::malformed("unknown", format!("geometry is {}, not an object", json_type_name(value)))
        })?;

        let type_name = object
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| VectorError::malformed("unknown", "geometry has no type member"))?;
        let kind: GeometryKind = type_name.parse()?;

        let raw = object
            .get("coordinates")
            .ok_or_else(|| VectorError::malformed(kind.name(), "geometry has no coordinates member"))?;
        let coordinates = Coordinates::from_json(raw).map_err(|reason| VectorError::malformed(kind.name(), reason))?;

        Ok(Geometry { kind, coordinates })
    }

    /// Encode as a GeoJSON geometry object
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert("type".to_string(), Value::from(self.kind.name()));
        object.insert("coordinates".to_string(), self.coordinates.to_json());
        Value::Object(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_polygon() {
        let geometry = Geometry::from_json(&json!({
            "type": "Polygon",
            "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]
        }))
        .unwrap();

        assert_eq!(geometry.kind, GeometryKind::Polygon);
        assert!(geometry.validate().is_ok());
        assert_eq!(geometry.coordinates.position_count(), 4);
    }

    #[test]
    fn test_geometry_collection_is_unsupported() {
        let err = Geometry::from_json(&json!({
            "type": "GeometryCollection",
            "geometries": []
        }))
        .unwrap_err();
        assert!(matches!(err, VectorError::UnsupportedGeometryKind(ref k) if k == "GeometryCollection"));
    }

    #[test]
    fn test_missing_members_are_malformed() {
        assert!(matches!(
            Geometry::from_json(&json!({"coordinates": [1, 2]})),
            Err(VectorError::MalformedGeometry { .. })
        ));
        assert!(matches!(
            Geometry::from_json(&json!({"type": "Point"})),
            Err(VectorError::MalformedGeometry { .. })
        ));
        assert!(matches!(
            Geometry::from_json(&json!([1, 2])),
            Err(VectorError::MalformedGeometry { .. })
        ));
    }

    #[test]
    fn test_new_rejects_wrong_depth() {
        let coords = Coordinates::from_json(&json!([[1, 2]])).unwrap();
        assert!(Geometry::new(GeometryKind::Point, coords.clone()).is_err());
        assert!(Geometry::new(GeometryKind::MultiPoint, coords).is_ok());
    }
}
