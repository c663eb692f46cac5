//! Error types for document encoding and persistence.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while decoding or validating annotation data.
#[derive(Error, Debug)]
pub enum FormatError {
    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid document structure or content
    #[error("Invalid format: {message}")]
    InvalidFormat {
        /// Description of the format error
        message: String,
    },

    /// Required field is missing
    #[error("Missing required field: {field}")]
    MissingField {
        /// Name of the missing field
        field: String,
    },

    /// Invalid coordinate values
    #[error("Invalid coordinates: {message}")]
    InvalidCoordinates {
        /// Description of the coordinate error
        message: String,
    },

    /// A polygon with fewer than three vertices
    #[error("Polygon '{name}' has {count} vertices, at least 3 are required")]
    TooFewVertices {
        /// Name of the offending polygon
        name: String,
        /// Number of vertices found
        count: usize,
    },
}

impl FormatError {
    /// Create an invalid format error with a message.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Create a missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create an invalid coordinates error.
    pub fn invalid_coordinates(message: impl Into<String>) -> Self {
        Self::InvalidCoordinates {
            message: message.into(),
        }
    }
}

/// Errors reported by a persistence service.
///
/// A missing document is not an error; `fetch` returns `Ok(None)`.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// I/O error while reading or writing a document
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored document could not be parsed or written
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Base name that cannot be used as a file name
    #[error("Invalid document name: {name:?}")]
    InvalidName {
        /// The rejected name
        name: String,
    },

    /// Storage directory does not exist or is not a directory
    #[error("Storage directory unavailable: {path:?}")]
    DirectoryUnavailable {
        /// The configured directory
        path: PathBuf,
    },
}
