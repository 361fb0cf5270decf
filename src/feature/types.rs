//! Feature and feature collection values

use serde_json::{json, Map, Value};

use crate::coordinate::{epsg_urn, parse_epsg};
use crate::errors::{VectorError, VectorResult};
use crate::geometry::json_type_name;

/// A geometry paired with pass-through attribute properties
///
/// The geometry is kept as raw JSON so that features with malformed or
/// unsupported geometries can still be read, counted and reported.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Feature {
    pub id: Option<Value>,
    pub geometry: Option<Value>,
    pub properties: Option<Map<String, Value>>,
    /// Members other than type, id, geometry and properties
    pub foreign_members: Map<String, Value>,
}

impl Feature {
    /// Create a feature from a geometry and properties
    pub fn new(geometry: Option<Value>, properties: Map<String, Value>) -> Self {
        Feature {
            id: None,
            geometry,
            properties: Some(properties),
            foreign_members: Map::new(),
        }
    }

    /// Geometry type name, if the feature has a typed geometry
    pub fn geometry_type(&self) -> Option<&str> {
        self.geometry.as_ref()?.get("type")?.as_str()
    }

    /// Decode a GeoJSON Feature object
    pub fn from_json(value: Value) -> VectorResult<Self> {
        let mut object = match value {
            Value::Object(object) => object,
            other => {
                return Err(VectorError::GenericError(format!(
                    "feature is {}, not an object",
                    json_type_name(&other)
                )))
            }
        };

        match object.remove("type") {
            Some(Value::String(t)) if t == "Feature" => {}
            Some(other) => {
                return Err(VectorError::GenericError(format!("expected type \"Feature\", found {}", other)))
            }
            None => return Err(VectorError::GenericError("feature has no type member".to_string())),
        }

        let id = object.remove("id");
        let geometry = match object.remove("geometry") {
            None | Some(Value::Null) => None,
            Some(geometry) => Some(geometry),
        };
        let properties = match object.remove("properties") {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => Some(map),
            Some(other) => {
                return Err(VectorError::GenericError(format!(
                    "feature properties are {}, not an object",
                    json_type_name(&other)
                )))
            }
        };

        Ok(Feature {
            id,
            geometry,
            properties,
            foreign_members: object,
        })
    }

    /// Encode as a GeoJSON Feature object
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert("type".to_string(), Value::from("Feature"));
        if let Some(id) = &self.id {
            object.insert("id".to_string(), id.clone());
        }
        object.insert("geometry".to_string(), self.geometry.clone().unwrap_or(Value::Null));
        object.insert(
            "properties".to_string(),
            self.properties.clone().map(Value::Object).unwrap_or(Value::Null),
        );
        for (key, value) in &self.foreign_members {
            object.insert(key.clone(), value.clone());
        }
        Value::Object(object)
    }
}

/// An ordered list of features with an optional CRS identifier
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureCollection {
    /// CRS identifier as found in the source, e.g. `urn:ogc:def:crs:EPSG::2056`
    pub crs: Option<String>,
    pub features: Vec<Feature>,
    /// Members other than type, crs and features
    pub foreign_members: Map<String, Value>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        FeatureCollection {
            crs: None,
            features,
            foreign_members: Map::new(),
        }
    }

    /// Set the CRS to an EPSG code
    pub fn with_epsg(mut self, code: u32) -> Self {
        self.crs = Some(epsg_urn(code));
        self
    }

    /// EPSG code of the declared CRS, if any
    pub fn epsg(&self) -> VectorResult<Option<u32>> {
        self.crs.as_deref().map(parse_epsg).transpose()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Decode a FeatureCollection object, or a bare Feature as a collection of one
    ///
    /// A `crs` member that names no EPSG code is kept verbatim in `crs`,
    /// where [`FeatureCollection::epsg`] reports it as unresolvable.
    pub fn from_json(value: Value) -> VectorResult<Self> {
        let mut object = match value {
            Value::Object(object) => object,
            other => {
                return Err(VectorError::GenericError(format!(
                    "document is {}, not an object",
                    json_type_name(&other)
                )))
            }
        };

        let type_name = object.get("type").and_then(Value::as_str).map(str::to_string);
        match type_name.as_deref() {
            Some("Feature") => return Ok(FeatureCollection::new(vec![Feature::from_json(Value::Object(object))?])),
            Some("FeatureCollection") => {}
            Some(other) => {
                return Err(VectorError::GenericError(format!(
                    "expected a FeatureCollection, found type \"{}\"",
                    other
                )))
            }
            None => return Err(VectorError::GenericError("document has no type member".to_string())),
        }

        object.remove("type");

        let crs = object.remove("crs").as_ref().and_then(crs_name);
        let features = match object.remove("features") {
            Some(Value::Array(items)) => items
                .into_iter()
                .map(Feature::from_json)
                .collect::<VectorResult<Vec<_>>>()?,
            Some(other) => {
                return Err(VectorError::GenericError(format!(
                    "features member is {}, not an array",
                    json_type_name(&other)
                )))
            }
            None => Vec::new(),
        };

        Ok(FeatureCollection {
            crs,
            features,
            foreign_members: object,
        })
    }

    /// Encode as a GeoJSON FeatureCollection with a named `crs` member
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert("type".to_string(), Value::from("FeatureCollection"));
        if let Some(crs) = &self.crs {
            object.insert("crs".to_string(), crs_member(crs));
        }
        for (key, value) in &self.foreign_members {
            object.insert(key.clone(), value.clone());
        }
        object.insert(
            "features".to_string(),
            Value::Array(self.features.iter().map(Feature::to_json).collect()),
        );
        Value::Object(object)
    }
}

/// Build the legacy named `crs` member
fn crs_member(name: &str) -> Value {
    json!({
        "type": "name",
        "properties": { "name": name }
    })
}

/// CRS identifier of a `crs` member
///
/// Reads the named form, the GeoJSON 2008 `EPSG` form and plain strings.
/// Any other member is kept as its JSON text, so that resolving it fails
/// instead of the collection silently falling back to a default CRS.
fn crs_name(member: &Value) -> Option<String> {
    let properties = member.get("properties");
    match (member, member.get("type").and_then(Value::as_str)) {
        (Value::Null, _) => None,
        (Value::String(name), _) => Some(name.clone()),
        (_, Some("name")) => match properties.and_then(|p| p.get("name")).and_then(Value::as_str) {
            Some(name) => Some(name.to_string()),
            None => Some(member.to_string()),
        },
        (_, Some("EPSG")) => match properties.and_then(|p| p.get("code")) {
            Some(Value::Number(code)) => Some(format!("EPSG:{}", code)),
            Some(Value::String(code)) => Some(format!("EPSG:{}", code)),
            _ => Some(member.to_string()),
        },
        _ => Some(member.to_string()),
    }
}
