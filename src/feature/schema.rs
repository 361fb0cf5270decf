//! Target schemas for written features

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

use super::types::{Feature, FeatureCollection};
use crate::errors::{VectorError, VectorResult};
use crate::geometry::GeometryKind;

/// Attribute type names, as used by fiona-style schemas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Str,
    Int,
    Float,
    Bool,
}

impl PropertyType {
    /// Type of a JSON value, `None` for null, arrays and objects
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::String(_) => Some(PropertyType::Str),
            Value::Bool(_) => Some(PropertyType::Bool),
            Value::Number(n) if n.is_f64() => Some(PropertyType::Float),
            Value::Number(_) => Some(PropertyType::Int),
            _ => None,
        }
    }

    /// Convert a value to this type
    ///
    /// Null stays null. Numbers and booleans format as strings, numeric
    /// strings parse, integral floats become ints, and ints widen to floats.
    /// Returns `None` when no lossless conversion exists.
    pub fn convert(&self, value: &Value) -> Option<Value> {
        match (self, value) {
            (_, Value::Null) => Some(Value::Null),
            (PropertyType::Str, Value::String(_)) => Some(value.clone()),
            (PropertyType::Str, Value::Number(n)) => Some(Value::String(n.to_string())),
            (PropertyType::Str, Value::Bool(b)) => Some(Value::String(b.to_string())),
            (PropertyType::Int, Value::Number(n)) if !n.is_f64() => Some(value.clone()),
            (PropertyType::Int, Value::Number(n)) => n
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| Value::from(f as i64)),
            (PropertyType::Int, Value::String(s)) => s.trim().parse::<i64>().ok().map(Value::from),
            (PropertyType::Float, Value::Number(n)) => n.as_f64().map(Value::from),
            (PropertyType::Float, Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Value::from),
            (PropertyType::Bool, Value::Bool(_)) => Some(value.clone()),
            (PropertyType::Bool, Value::String(s)) => match s.trim() {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
            _ => None,
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PropertyType::Str => "str",
            PropertyType::Int => "int",
            PropertyType::Float => "float",
            PropertyType::Bool => "bool",
        };
        f.write_str(name)
    }
}

/// Declared geometry kind and attribute layout of an output file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    /// Required geometry kind, `None` accepts any kind
    pub geometry: Option<GeometryKind>,
    /// Attribute names and types in output order
    pub properties: Vec<(String, PropertyType)>,
}

/// On-disk form of a schema, `{ geometry = "Polygon", properties = { name = "str" } }`
#[derive(Debug, Deserialize)]
struct SchemaDefinition {
    geometry: Option<String>,
    #[serde(default)]
    properties: BTreeMap<String, PropertyType>,
}

impl Schema {
    pub fn new(geometry: Option<GeometryKind>) -> Self {
        Schema {
            geometry,
            properties: Vec::new(),
        }
    }

    /// Append an attribute
    pub fn with_property(mut self, name: &str, property_type: PropertyType) -> Self {
        self.properties.push((name.to_string(), property_type));
        self
    }

    /// Parse a schema from TOML; attributes come out in name order
    pub fn from_toml(content: &str) -> VectorResult<Self> {
        let definition: SchemaDefinition = toml::from_str(content)?;
        let geometry = definition.geometry.as_deref().map(str::parse::<GeometryKind>).transpose()?;
        Ok(Schema {
            geometry,
            properties: definition.properties.into_iter().collect(),
        })
    }

    /// Infer a schema from a collection
    ///
    /// The geometry kind is set only when every typed geometry shares it.
    /// Attribute types come from the first non-null value seen; attributes
    /// keep first-seen order.
    pub fn infer(collection: &FeatureCollection) -> Self {
        let mut kinds = collection
            .features
            .iter()
            .filter_map(Feature::geometry_type)
            .filter_map(|name| name.parse::<GeometryKind>().ok());
        let first = kinds.next();
        let geometry = if kinds.all(|k| Some(k) == first) { first } else { None };

        let mut properties: Vec<(String, PropertyType)> = Vec::new();
        for feature in &collection.features {
            for (name, value) in feature.properties.iter().flatten() {
                if properties.iter().any(|(known, _)| known == name) {
                    continue;
                }
                if let Some(property_type) = PropertyType::of(value) {
                    properties.push((name.clone(), property_type));
                }
            }
        }

        Schema { geometry, properties }
    }

    /// Project a feature onto this schema
    ///
    /// Properties are reduced to exactly the schema's attributes, missing
    /// ones written as null, and each value is converted to its declared
    /// type. A value that does not convert, or a geometry of another kind
    /// than the declared one, is rejected.
    pub fn apply(&self, mut feature: Feature) -> VectorResult<Feature> {
        if let (Some(expected), Some(found)) = (self.geometry, feature.geometry_type()) {
            if found != expected.name() {
                return Err(VectorError::malformed(
                    found,
                    format!("schema requires {} geometries", expected),
                ));
            }
        }

        let source = feature.properties.take().unwrap_or_default();
        let mut projected = Map::new();
        for (name, property_type) in &self.properties {
            let value = match source.get(name) {
                Some(value) => property_type
                    .convert(value)
                    .ok_or_else(|| VectorError::PropertyTypeMismatch {
                        name: name.clone(),
                        expected: property_type.to_string(),
                    })?,
                None => Value::Null,
            };
            projected.insert(name.clone(), value);
        }
        feature.properties = Some(projected);

        Ok(feature)
    }

    /// One-line description, e.g. `Polygon {name: str, area: float}`
    pub fn describe(&self) -> String {
        let geometry = self.geometry.map(|k| k.name()).unwrap_or("Any");
        let fields: Vec<String> = self
            .properties
            .iter()
            .map(|(name, property_type)| format!("{}: {}", name, property_type))
            .collect();
        format!("{} {{{}}}", geometry, fields.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feature(geometry: Value, properties: Value) -> Feature {
        Feature::from_json(json!({"type": "Feature", "geometry": geometry, "properties": properties})).unwrap()
    }

    #[test]
    fn test_apply_projects_properties() {
        let schema = Schema::new(None)
            .with_property("name", PropertyType::Str)
            .with_property("area", PropertyType::Float);
        let input = feature(json!(null), json!({"name": "Kreis 1", "extra": true}));

        let output = schema.apply(input).unwrap();
        let properties = output.properties.unwrap();

        assert_eq!(properties.len(), 2);
        assert_eq!(properties["name"], "Kreis 1");
        assert_eq!(properties["area"], Value::Null);
        assert!(properties.get("extra").is_none());
    }

    #[test]
    fn test_apply_converts_to_declared_types() {
        let schema = Schema::new(None)
            .with_property("bfs", PropertyType::Int)
            .with_property("area", PropertyType::Float)
            .with_property("code", PropertyType::Str)
            .with_property("active", PropertyType::Bool)
            .with_property("note", PropertyType::Str);
        let input = feature(
            json!(null),
            json!({"bfs": "261", "area": 88, "code": 8001, "active": "true", "note": null}),
        );

        let properties = schema.apply(input).unwrap().properties.unwrap();

        assert_eq!(properties["bfs"], json!(261));
        assert!(properties["area"].is_f64());
        assert_eq!(properties["area"], 88.0);
        assert_eq!(properties["code"], "8001");
        assert_eq!(properties["active"], true);
        assert_eq!(properties["note"], Value::Null);
    }

    #[test]
    fn test_apply_rejects_unconvertible_value() {
        let schema = Schema::new(None).with_property("bfs", PropertyType::Int);

        let fractional = feature(json!(null), json!({"bfs": 2.5}));
        let text = feature(json!(null), json!({"bfs": "Zürich"}));

        for input in [fractional, text] {
            match schema.apply(input) {
                Err(VectorError::PropertyTypeMismatch { name, expected }) => {
                    assert_eq!(name, "bfs");
                    assert_eq!(expected, "int");
                }
                other => panic!("expected a type mismatch, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_convert_integral_float_to_int() {
        assert_eq!(PropertyType::Int.convert(&json!(12.0)), Some(json!(12)));
        assert_eq!(PropertyType::Bool.convert(&json!(1)), None);
        assert_eq!(PropertyType::Str.convert(&json!([1])), None);
    }

    #[test]
    fn test_apply_rejects_other_geometry_kind() {
        let schema = Schema::new(Some(GeometryKind::Polygon));
        let input = feature(json!({"type": "Point", "coordinates": [0, 0]}), json!({}));
        assert!(matches!(schema.apply(input), Err(VectorError::MalformedGeometry { .. })));
    }

    #[test]
    fn test_infer_from_collection() {
        let collection = FeatureCollection::new(vec![
            feature(json!({"type": "Point", "coordinates": [0, 0]}), json!({"name": null, "n": 1})),
            feature(json!({"type": "Point", "coordinates": [1, 1]}), json!({"name": "b", "w": 0.5})),
        ]);

        let schema = Schema::infer(&collection);
        assert_eq!(schema.geometry, Some(GeometryKind::Point));
        assert_eq!(schema.describe(), "Point {n: int, name: str, w: float}");
    }

    #[test]
    fn test_infer_mixed_kinds_has_no_geometry() {
        let collection = FeatureCollection::new(vec![
            feature(json!({"type": "Point", "coordinates": [0, 0]}), json!({})),
            feature(json!({"type": "LineString", "coordinates": []}), json!({})),
        ]);
        assert_eq!(Schema::infer(&collection).geometry, None);
    }

    #[test]
    fn test_schema_from_toml() {
        let schema = Schema::from_toml(
            r#"
            geometry = "MultiPolygon"

            [properties]
            name = "str"
            bfs_nummer = "int"
            "#,
        )
        .unwrap();

        assert_eq!(schema.geometry, Some(GeometryKind::MultiPolygon));
        assert_eq!(
            schema.properties,
            vec![
                ("bfs_nummer".to_string(), PropertyType::Int),
                ("name".to_string(), PropertyType::Str),
            ]
        );
    }

    #[test]
    fn test_schema_from_toml_rejects_unknown_geometry() {
        assert!(matches!(
            Schema::from_toml("geometry = \"GeometryCollection\""),
            Err(VectorError::UnsupportedGeometryKind(_))
        ));
    }
}
