//! # Error Types
//!
//! Structured error types for rc_core. Validation problems, table lookups
//! outside the tabulated range and solver failures are all reported through
//! [`CalcError`], with enough context for a caller to fix the input
//! programmatically.
//!
//! A section that is merely overstressed is **not** an error: verification
//! engines report that through `passes == false` on their result.
//!
//! ## Example
//!
//! ```rust
//! use rc_core::errors::{CalcError, CalcResult};
//!
//! fn validate_height(height_mm: f64) -> CalcResult<()> {
//!     if height_mm <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "height_mm",
//!             height_mm.to_string(),
//!             "Height must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for rc_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (non-positive dimension, admissible above resistance, ...)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Unknown material family, grade or catalogue entry
    #[error("Material not found: {material_name}")]
    MaterialNotFound { material_name: String },

    /// Table lookup outside the tabulated range (no extrapolation)
    #[error("Value {value} for '{table}' outside tabulated range [{min}, {max}]")]
    OutOfTableRange {
        table: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// The geometry cannot carry the requested state (e.g. section fully in tension)
    #[error("Invalid geometry: {reason}")]
    InvalidGeometry { reason: String },

    /// Root finding hit its iteration cap without meeting the tolerance
    #[error("{operation} did not converge after {iterations} iterations (residual {residual:.3e})")]
    NonConvergence {
        operation: String,
        iterations: usize,
        residual: f64,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MaterialNotFound error
    pub fn material_not_found(material_name: impl Into<String>) -> Self {
        CalcError::MaterialNotFound {
            material_name: material_name.into(),
        }
    }

    /// Create an OutOfTableRange error
    pub fn out_of_range(table: impl Into<String>, value: f64, min: f64, max: f64) -> Self {
        CalcError::OutOfTableRange {
            table: table.into(),
            value,
            min,
            max,
        }
    }

    /// Create an InvalidGeometry error
    pub fn invalid_geometry(reason: impl Into<String>) -> Self {
        CalcError::InvalidGeometry {
            reason: reason.into(),
        }
    }

    /// Create a NonConvergence error
    pub fn non_convergence(operation: impl Into<String>, iterations: usize, residual: f64) -> Self {
        CalcError::NonConvergence {
            operation: operation.into(),
            iterations,
            residual,
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        CalcError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Check if this is a recoverable error.
    ///
    /// Non-convergence can be retried with a larger iteration cap or a looser
    /// tolerance; every other variant needs different input.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CalcError::NonConvergence { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MaterialNotFound { .. } => "MATERIAL_NOT_FOUND",
            CalcError::OutOfTableRange { .. } => "OUT_OF_TABLE_RANGE",
            CalcError::InvalidGeometry { .. } => "INVALID_GEOMETRY",
            CalcError::NonConvergence { .. } => "NON_CONVERGENCE",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("height_mm", "-5.0", "Height must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            CalcError::material_not_found("pozzolanic").error_code(),
            "MATERIAL_NOT_FOUND"
        );
        assert_eq!(
            CalcError::out_of_range("water_cement_ratio", 0.9, 0.4, 0.8).error_code(),
            "OUT_OF_TABLE_RANGE"
        );
        assert_eq!(
            CalcError::invalid_geometry("fully tensioned").error_code(),
            "INVALID_GEOMETRY"
        );
    }

    #[test]
    fn test_only_non_convergence_is_recoverable() {
        assert!(CalcError::non_convergence("neutral axis", 200, 1e-3).is_recoverable());
        assert!(!CalcError::invalid_geometry("x").is_recoverable());
        assert!(!CalcError::invalid_input("a", "b", "c").is_recoverable());
    }

    #[test]
    fn test_display_mentions_range() {
        let msg = CalcError::out_of_range("mortar", 4.0, 1.0, 3.7).to_string();
        assert!(msg.contains("mortar"));
        assert!(msg.contains("3.7"));
    }
}
