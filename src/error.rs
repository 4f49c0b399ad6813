//! Custom error types for SK Production Admin
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions. Errors also know how to present themselves
//! as `{success: false, message}` JSON envelopes with an HTTP-style status code.

use thiserror::Error;

/// The main error type for SK Production Admin operations
#[derive(Error, Debug)]
pub enum AdminError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Identifier is not a 24-character hex ObjectId
    #[error("Invalid id: {0}")]
    InvalidId(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Cache backend errors
    #[error("Cache error: {0}")]
    Cache(String),

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl AdminError {
    /// Create a "not found" error for an entity type
    pub fn not_found(entity_type: &'static str, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for a version of a resource
    pub fn version_not_found(resource_id: &str, version: u32) -> Self {
        Self::NotFound {
            entity_type: "Version",
            identifier: format!("{} v{}", resource_id, version),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidId(_))
    }

    /// HTTP-style status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::InvalidId(_) | Self::Duplicate { .. } => 400,
            Self::NotFound { .. } => 404,
            _ => 500,
        }
    }

    /// Render the error as a `{success: false, message}` envelope
    pub fn to_response(&self) -> serde_json::Value {
        serde_json::json!({
            "success": false,
            "message": self.to_string(),
        })
    }
}

impl From<std::io::Error> for AdminError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AdminError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for SK Production Admin operations
pub type AdminResult<T> = Result<T, AdminError>;
