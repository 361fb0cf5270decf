//! Position structure for leaf coordinate tuples

use serde_json::{Number, Value};

/// A leaf coordinate tuple `(x, y, [z, ...])`
///
/// Only `x` and `y` take part in reprojection. Any further ordinates
/// (elevation, measure, ...) are carried along untouched, kept as the JSON
/// numbers they were read as so integers stay integers.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    /// X coordinate (longitude in geographic systems)
    pub x: f64,
    /// Y coordinate (latitude in geographic systems)
    pub y: f64,
    /// Ordinates after x and y, in their original order
    pub extra: Vec<Number>,
}

impl Position {
    /// Create a new 2D position
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y, extra: Vec::new() }
    }

    /// Create a new 3D position, `None` for a non-finite z
    pub fn new_3d(x: f64, y: f64, z: f64) -> Option<Self> {
        Some(Position {
            x,
            y,
            extra: vec![Number::from_f64(z)?],
        })
    }

    /// Build a position from a slice of ordinates
    ///
    /// `None` if there are fewer than two or a trailing one is not finite.
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        match values {
            [x, y, rest @ ..] => Some(Position {
                x: *x,
                y: *y,
                extra: rest.iter().map(|v| Number::from_f64(*v)).collect::<Option<Vec<_>>>()?,
            }),
            _ => None,
        }
    }

    /// Build a position from JSON numbers, keeping trailing ones verbatim
    pub fn from_numbers(values: &[Number]) -> Option<Self> {
        match values {
            [x, y, rest @ ..] => Some(Position {
                x: x.as_f64()?,
                y: y.as_f64()?,
                extra: rest.to_vec(),
            }),
            _ => None,
        }
    }

    /// Check if this position has a Z coordinate
    pub fn has_z(&self) -> bool {
        !self.extra.is_empty()
    }

    /// The Z coordinate, if present
    pub fn z(&self) -> Option<f64> {
        self.extra.first().and_then(Number::as_f64)
    }

    /// Number of ordinates in this position
    pub fn dimensions(&self) -> usize {
        2 + self.extra.len()
    }

    /// Copy of this position with new x/y and the same trailing ordinates
    pub fn with_xy(&self, x: f64, y: f64) -> Self {
        Position {
            x,
            y,
            extra: self.extra.clone(),
        }
    }

    /// All ordinates as a flat vector
    pub fn to_vec(&self) -> Vec<f64> {
        let mut values = Vec::with_capacity(self.dimensions());
        values.push(self.x);
        values.push(self.y);
        values.extend(self.extra.iter().filter_map(Number::as_f64));
        values
    }

    /// All ordinates as JSON values, trailing ones exactly as read
    pub fn to_json_values(&self) -> Vec<Value> {
        let mut values = Vec::with_capacity(self.dimensions());
        values.push(Value::from(self.x));
        values.push(Value::from(self.y));
        values.extend(self.extra.iter().cloned().map(Value::Number));
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_slice_requires_two_ordinates() {
        assert!(Position::from_slice(&[]).is_none());
        assert!(Position::from_slice(&[1.0]).is_none());

        let p = Position::from_slice(&[1.0, 2.0]).unwrap();
        assert_eq!(p, Position::new(1.0, 2.0));
        assert!(!p.has_z());
    }

    #[test]
    fn test_with_xy_keeps_trailing_ordinates() {
        let p = Position::from_slice(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        let moved = p.with_xy(10.0, 20.0);

        assert_eq!(moved.to_vec(), vec![10.0, 20.0, 3.0, 4.0]);
        assert_eq!(moved.z(), Some(3.0));
        assert_eq!(moved.dimensions(), 4);
    }

    #[test]
    fn test_trailing_numbers_are_kept_verbatim() {
        let big: Number = serde_json::from_str("9007199254740993").unwrap();
        let p = Position::from_numbers(&[Number::from_f64(8.5).unwrap(), Number::from(47), Number::from(408), big]).unwrap();
        let moved = p.with_xy(2_683_186.5, 1_247_156.5);

        assert_eq!(moved.y, 1_247_156.5);
        assert_eq!(
            Value::Array(moved.to_json_values()).to_string(),
            "[2683186.5,1247156.5,408,9007199254740993]"
        );
    }

    #[test]
    fn test_non_finite_trailing_ordinate_is_rejected() {
        assert!(Position::from_slice(&[1.0, 2.0, f64::NAN]).is_none());
        assert!(Position::new_3d(1.0, 2.0, f64::INFINITY).is_none());
    }
}
