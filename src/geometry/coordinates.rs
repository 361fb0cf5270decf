//! Untyped coordinate trees
//!
//! A GeoJSON `coordinates` member is a nested array whose depth depends on
//! the geometry kind. The tree is kept untyped here so that a mismatch
//! between declared kind and actual nesting can be detected and reported
//! instead of failing at decode time.

use serde_json::{Number, Value};

use crate::coordinate::Position;

/// A node of a coordinate tree: a leaf position or a sequence of nodes
#[derive(Debug, Clone, PartialEq)]
pub enum Coordinates {
    Position(Position),
    Sequence(Vec<Coordinates>),
}

impl Coordinates {
    /// Decode a JSON coordinate tree
    ///
    /// An array of numbers is a position, an array of arrays (or an empty
    /// array) is a sequence. Anything else is rejected with a reason.
    pub fn from_json(value: &Value) -> Result<Self, String> {
        let items = match value {
            Value::Array(items) => items,
            other => return Err(format!("expected an array, found {}", json_type_name(other))),
        };

        if items.is_empty() {
            return Ok(Coordinates::Sequence(Vec::new()));
        }

        if items.iter().all(Value::is_number) {
            let ordinates: Vec<Number> = items
                .iter()
                .filter_map(|v| match v {
                    Value::Number(n) => Some(n.clone()),
                    _ => None,
                })
                .collect();
            if ordinates.len() < 2 {
                return Err(format!("position needs at least two ordinates, found {}", ordinates.len()));
            }
            return Position::from_numbers(&ordinates)
                .map(Coordinates::Position)
                .ok_or_else(|| "position holds a number outside the f64 range".to_string());
        }

        if items.iter().all(Value::is_array) {
            return items
                .iter()
                .map(Coordinates::from_json)
                .collect::<Result<Vec<_>, _>>()
                .map(Coordinates::Sequence);
        }

        let offender = items
            .iter()
            .find(|v| !v.is_number() && !v.is_array())
            .map(json_type_name)
            .unwrap_or("a mix of numbers and arrays");
        Err(format!("array holds {}", offender))
    }

    /// Encode back to a JSON array tree
    pub fn to_json(&self) -> Value {
        match self {
            Coordinates::Position(p) => Value::Array(p.to_json_values()),
            Coordinates::Sequence(items) => Value::Array(items.iter().map(Coordinates::to_json).collect()),
        }
    }

    /// Whether every leaf sits exactly `depth` sequence levels down
    ///
    /// Empty sequences satisfy any depth of at least one at their level.
    pub fn matches_depth(&self, depth: usize) -> bool {
        match self {
            Coordinates::Position(_) => depth == 0,
            Coordinates::Sequence(items) => depth > 0 && items.iter().all(|c| c.matches_depth(depth - 1)),
        }
    }

    /// Number of leaf positions in the tree
    pub fn position_count(&self) -> usize {
        match self {
            Coordinates::Position(_) => 1,
            Coordinates::Sequence(items) => items.iter().map(Coordinates::position_count).sum(),
        }
    }

    /// Same nesting and element counts at every level, values ignored
    pub fn has_same_shape(&self, other: &Coordinates) -> bool {
        match (self, other) {
            (Coordinates::Position(a), Coordinates::Position(b)) => a.dimensions() == b.dimensions(),
            (Coordinates::Sequence(a), Coordinates::Sequence(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.has_same_shape(y))
            }
            _ => false,
        }
    }

    /// Leaf positions in document order
    pub fn positions(&self) -> Vec<&Position> {
        let mut out = Vec::new();
        self.collect_positions(&mut out);
        out
    }

    fn collect_positions<'a>(&'a self, out: &mut Vec<&'a Position>) {
        match self {
            Coordinates::Position(p) => out.push(p),
            Coordinates::Sequence(items) => items.iter().for_each(|c| c.collect_positions(out)),
        }
    }
}

/// Short name of a JSON value's type, for error messages
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
