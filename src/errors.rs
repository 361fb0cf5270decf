//! Custom error types for vector reprojection

use std::fmt;
use std::io;

/// Errors raised while resolving, reprojecting, reading or writing features
#[derive(Debug)]
pub enum VectorError {
    /// I/O error
    IoError(io::Error),
    /// JSON decoding or encoding error
    JsonError(serde_json::Error),
    /// Invalid or unusable configuration
    ConfigError(String),
    /// CRS identifier that cannot be resolved to a projection
    UnresolvableCrs(String),
    /// Coordinate nesting does not match the declared geometry kind
    MalformedGeometry {
        /// Declared geometry type name
        kind: String,
        /// What was wrong with the coordinates
        reason: String,
    },
    /// Geometry type outside the six supported kinds
    UnsupportedGeometryKind(String),
    /// No driver registered for the file extension
    UnsupportedDriver(String),
    /// A coordinate could not be transformed
    ProjectionError(String),
    /// Property value that cannot be converted to its schema type
    PropertyTypeMismatch {
        /// Attribute name
        name: String,
        /// Schema type the value was converted to
        expected: String,
    },
    /// Generic error with message
    GenericError(String),
}

impl VectorError {
    /// Shorthand for a malformed geometry error
    pub fn malformed(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        VectorError::MalformedGeometry {
            kind: kind.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error concerns a single feature rather than the whole run
    pub fn is_feature_error(&self) -> bool {
        matches!(
            self,
            VectorError::MalformedGeometry { .. }
                | VectorError::UnsupportedGeometryKind(_)
                | VectorError::ProjectionError(_)
                | VectorError::PropertyTypeMismatch { .. }
        )
    }
}

impl fmt::Display for VectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VectorError::IoError(e) => write!(f, "I/O error: {}", e),
            VectorError::JsonError(e) => write!(f, "JSON error: {}", e),
            VectorError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            VectorError::UnresolvableCrs(crs) => write!(f, "Cannot resolve CRS: {}", crs),
            VectorError::MalformedGeometry { kind, reason } => {
                write!(f, "Malformed {} geometry: {}", kind, reason)
            }
            VectorError::UnsupportedGeometryKind(kind) => {
                write!(f, "Unsupported geometry kind: {}", kind)
            }
            VectorError::UnsupportedDriver(ext) => {
                write!(f, "No vector driver for file extension: {}", ext)
            }
            VectorError::ProjectionError(msg) => write!(f, "Projection error: {}", msg),
            VectorError::PropertyTypeMismatch { name, expected } => {
                write!(f, "Property {} cannot be converted to {}", name, expected)
            }
            VectorError::GenericError(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for VectorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VectorError::IoError(e) => Some(e),
            VectorError::JsonError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for VectorError {
    fn from(error: io::Error) -> Self {
        VectorError::IoError(error)
    }
}

impl From<serde_json::Error> for VectorError {
    fn from(error: serde_json::Error) -> Self {
        VectorError::JsonError(error)
    }
}

impl From<toml::de::Error> for VectorError {
    fn from(error: toml::de::Error) -> Self {
        VectorError::ConfigError(error.to_string())
    }
}

impl From<String> for VectorError {
    fn from(msg: String) -> Self {
        VectorError::GenericError(msg)
    }
}

/// Result type for vector operations
pub type VectorResult<T> = Result<T, VectorError>;
