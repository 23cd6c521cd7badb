//! # Error Types
//!
//! Structured error types for cabinet_core. Every failure the engine can
//! report is a value: callers get enough context (which node, which field)
//! to surface an advisory message without parsing strings.
//!
//! ## Example
//!
//! ```rust
//! use cabinet_core::errors::{CabinetError, CabinetResult};
//!
//! fn validate_width(width: f64) -> CabinetResult<()> {
//!     if width <= 0.0 {
//!         return Err(CabinetError::invalid_input(
//!             "width",
//!             width.to_string(),
//!             "Cabinet width must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for cabinet_core operations
pub type CabinetResult<T> = Result<T, CabinetError>;

/// Structured error type for engine operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CabinetError {
    /// A parameter value is invalid (out of range, not finite, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// The layout tree failed structural validation
    #[error("Validation failed at {path}: {reason}")]
    ValidationFailed { path: String, reason: String },

    /// No node, shelf or drawer with this id exists in the tree
    #[error("Node not found: {id}")]
    NodeNotFound { id: String },

    /// The requested edit would break the tree's structure
    #[error("Invalid structure: {reason}")]
    InvalidStructure { reason: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Design document schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CabinetError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CabinetError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a ValidationFailed error
    pub fn validation(path: impl Into<String>, reason: impl Into<String>) -> Self {
        CabinetError::ValidationFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a NodeNotFound error
    pub fn node_not_found(id: impl Into<String>) -> Self {
        CabinetError::NodeNotFound { id: id.into() }
    }

    /// Create an InvalidStructure error
    pub fn invalid_structure(reason: impl Into<String>) -> Self {
        CabinetError::InvalidStructure {
            reason: reason.into(),
        }
    }

    /// Create a SerializationError from anything displayable
    pub fn serialization(reason: impl std::fmt::Display) -> Self {
        CabinetError::SerializationError {
            reason: reason.to_string(),
        }
    }

    /// Structural errors leave the caller's tree unchanged and should be
    /// shown to the user as an advisory.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            CabinetError::ValidationFailed { .. }
                | CabinetError::NodeNotFound { .. }
                | CabinetError::InvalidStructure { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CabinetError::InvalidInput { .. } => "INVALID_INPUT",
            CabinetError::ValidationFailed { .. } => "VALIDATION_FAILED",
            CabinetError::NodeNotFound { .. } => "NODE_NOT_FOUND",
            CabinetError::InvalidStructure { .. } => "INVALID_STRUCTURE",
            CabinetError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CabinetError::VersionMismatch { .. } => "VERSION_MISMATCH",
            CabinetError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CabinetError {
    fn from(e: serde_json::Error) -> Self {
        CabinetError::serialization(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CabinetError::validation("layout[2]", "Trailing divider");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("ValidationFailed"));
        let roundtrip: CabinetError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CabinetError::node_not_found("d1").error_code(), "NODE_NOT_FOUND");
        assert_eq!(CabinetError::invalid_structure("x").error_code(), "INVALID_STRUCTURE");
    }

    #[test]
    fn test_structural_classification() {
        assert!(CabinetError::node_not_found("d1").is_structural());
        assert!(!CabinetError::serialization("bad json").is_structural());
    }
}
