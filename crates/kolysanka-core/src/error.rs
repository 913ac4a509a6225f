//! # Error Types
//!
//! Domain-specific error types for kolysanka-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  kolysanka-core errors (this file)                           │
//! │  ├── CoreError        - Business rule violations             │
//! │  └── ValidationError  - Input validation failures            │
//! │                                                              │
//! │  kolysanka-store errors (separate crate)                     │
//! │  └── StoreError       - Persistence failures, not-found      │
//! │                                                              │
//! │  Flow: ValidationError → CoreError → StoreError → caller     │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::types::OrderStatus;

/// Core business rule errors.
///
/// Caught at the service boundary and translated for the caller.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The order-status transition table forbids this move.
    ///
    /// ## When This Occurs
    /// - Skipping a stage (`pending` straight to `shipped`)
    /// - Leaving a terminal status (`delivered`, `cancelled`)
    #[error("order status cannot change from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// An order was created from an empty item snapshot.
    #[error("order must contain at least one item")]
    EmptyOrder,

    /// Cart has exceeded the maximum number of distinct entries.
    #[error("cart cannot have more than {max} entries")]
    CartTooLarge { max: usize },

    /// Entry quantity exceeds the maximum allowed.
    #[error("quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Input validation errors.
///
/// These occur when caller-supplied fields don't meet requirements,
/// before any business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g. a malformed email address).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in the allowed vocabulary.
    #[error("{field} '{value}' is not one of the allowed values")]
    NotAllowed { field: String, value: String },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidTransition {
            from: OrderStatus::Pending,
            to: OrderStatus::Shipped,
        };
        assert_eq!(
            err.to_string(),
            "order status cannot change from pending to shipped"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::NotAllowed {
            field: "size".to_string(),
            value: "10-11y".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "size '10-11y' is not one of the allowed values"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "phone".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
