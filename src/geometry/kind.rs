//! Geometry kinds and their coordinate nesting depth

use std::fmt;
use std::str::FromStr;

use crate::errors::VectorError;

/// The six geometry kinds that carry a coordinate tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GeometryKind {
    Point,
    LineString,
    MultiPoint,
    Polygon,
    MultiLineString,
    MultiPolygon,
}

impl GeometryKind {
    /// All supported kinds in depth order
    pub const ALL: [GeometryKind; 6] = [
        GeometryKind::Point,
        GeometryKind::LineString,
        GeometryKind::MultiPoint,
        GeometryKind::Polygon,
        GeometryKind::MultiLineString,
        GeometryKind::MultiPolygon,
    ];

    /// Number of sequence levels above the leaf positions
    ///
    /// * 0 for `Point`
    /// * 1 for `LineString`, `MultiPoint`
    /// * 2 for `Polygon`, `MultiLineString`
    /// * 3 for `MultiPolygon`
    pub fn depth(&self) -> usize {
        match self {
            GeometryKind::Point => 0,
            GeometryKind::LineString | GeometryKind::MultiPoint => 1,
            GeometryKind::Polygon | GeometryKind::MultiLineString => 2,
            GeometryKind::MultiPolygon => 3,
        }
    }

    /// GeoJSON type name
    pub fn name(&self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::LineString => "LineString",
            GeometryKind::MultiPoint => "MultiPoint",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiLineString => "MultiLineString",
            GeometryKind::MultiPolygon => "MultiPolygon",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GeometryKind {
    type Err = VectorError;

    /// Parse a GeoJSON type name; matching is exact, as in GeoJSON
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GeometryKind::ALL
            .iter()
            .find(|kind| kind.name() == s)
            .copied()
            .ok_or_else(|| VectorError::UnsupportedGeometryKind(s.to_string()))
    }
}
