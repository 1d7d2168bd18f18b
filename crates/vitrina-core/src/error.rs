//! # Error Types
//!
//! Domain-specific error types for vitrina-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  vitrina-core errors (this file)                                       │
//! │  ├── CoreError        - Cart and checkout rule violations              │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  vitrina-store errors (separate crate)                                 │
//! │  └── StoreError       - Local storage failures                         │
//! │                                                                         │
//! │  vitrina-api errors (separate crate)                                   │
//! │  └── ApiError         - Transport and server failures                  │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── CliError         - What the user sees                             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError ─┐                                  │
//! │        StoreError ──────────────────┼──► CliError → terminal           │
//! │        ApiError ────────────────────┘                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The `(product, size)` pair is not a line in the cart.
    #[error("Product {product_id} (size {size_id}) is not in the cart")]
    ItemNotInCart { product_id: String, size_id: String },

    /// Checkout requires at least one line item.
    #[error("Cart is empty")]
    EmptyCart,

    /// The checkout form failed local validation.
    ///
    /// ## User Workflow
    /// ```text
    /// Submit (name="", email="foo@bar")
    ///      │
    ///      ▼
    /// CheckoutForm::validate() ── collects every failing field
    ///      │
    ///      ▼
    /// InvalidForm { errors: [name is required, email has invalid format] }
    ///      │
    ///      ▼
    /// Shown inline, no request is sent
    /// ```
    #[error("{}", join_messages(.errors))]
    InvalidForm { errors: Vec<ValidationError> },

    /// A checkout step was attempted from a state that does not allow it.
    #[error("Cannot {action} while checkout is {state}")]
    InvalidCheckoutTransition { state: String, action: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before any request is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
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

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid email, invalid subdomain).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Returns the name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
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
        let err = CoreError::ItemNotInCart {
            product_id: "p1".to_string(),
            size_id: "s1".to_string(),
        };
        assert_eq!(err.to_string(), "Product p1 (size s1) is not in the cart");
    }

    #[test]
    fn test_invalid_form_lists_every_error() {
        let err = CoreError::InvalidForm {
            errors: vec![
                ValidationError::Required {
                    field: "name".to_string(),
                },
                ValidationError::InvalidFormat {
                    field: "email".to_string(),
                    reason: "must look like name@domain.com".to_string(),
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "name is required; email has invalid format: must look like name@domain.com"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "phone".to_string(),
        };
        assert_eq!(validation_err.field(), "phone");
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
