//! # Error Types
//!
//! Domain-specific error types for emporium-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  emporium-core errors (this file)                                      │
//! │  ├── CoreError        - Payload decoding / encoding failures           │
//! │  └── ValidationError  - Form input validation failures                 │
//! │                                                                         │
//! │  emporium-client errors (separate crate)                               │
//! │  └── ClientError      - Transport, status, config, session I/O         │
//! │                                                                         │
//! │  None of these ever reach a view: the API layer folds every one of     │
//! │  them into a failure ApiResult with a human-readable message.          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → ApiResult.message   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core errors raised while shaping data for or from the backend.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A payload could not be decoded into the expected record shape.
    ///
    /// ## When This Occurs
    /// - Backend renamed or dropped a required field
    /// - A list endpoint returned an object instead of an array
    #[error("Unexpected payload for {expected}: {reason}")]
    Decode { expected: String, reason: String },

    /// A filter or request body could not be serialized.
    #[error("Could not encode {what}: {reason}")]
    Encode { what: String, reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a decode error for the named record type.
    pub fn decode(expected: impl Into<String>, reason: impl ToString) -> Self {
        CoreError::Decode {
            expected: expected.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates an encode error for the named value.
    pub fn encode(what: impl Into<String>, reason: impl ToString) -> Self {
        CoreError::Encode {
            what: what.into(),
            reason: reason.to_string(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before a create/update request is sent, so an obviously bad
/// form never costs a round trip.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g., malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::decode("Vec<Category>", "expected a sequence");
        assert_eq!(
            err.to_string(),
            "Unexpected payload for Vec<Category>: expected a sequence"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "category_name".to_string(),
        };
        assert_eq!(err.to_string(), "category_name is required");

        let err = ValidationError::Negative {
            field: "price".to_string(),
        };
        assert_eq!(err.to_string(), "price must not be negative");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "email".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
