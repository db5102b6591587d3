//! # Error Types
//!
//! Domain-specific error types for vitrina-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  vitrina-core errors (this file)                                        │
//! │  ├── CoreError        - Cart and checkout failures                      │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  vitrina-offers errors (separate crate)                                 │
//! │  └── OffersError      - Feed transport / record failures                │
//! │                                                                         │
//! │  CLI errors (in app)                                                    │
//! │  └── CliError         - What the operator sees, with an exit code       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CliError → stderr                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pricing itself never fails: `price_cart` is total over its inputs.
//! These errors only come from parsing stored carts and from the
//! checkout gate.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Cart and checkout errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Checkout was requested with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// A cart line breaks a validation rule.
    ///
    /// ## When This Occurs
    /// - A stored cart was edited by hand (negative price, huge quantity)
    /// - A line was rehydrated with an empty product id
    #[error("Invalid line {product_id}: {source}")]
    InvalidLine {
        product_id: String,
        #[source]
        source: ValidationError,
    },

    /// A stored cart could not be parsed.
    #[error("Malformed cart: {0}")]
    MalformedCart(#[from] serde_json::Error),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when input doesn't meet requirements.
/// Used for early validation before an order is placed.
#[derive(Debug, Error)]
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

    /// Invalid format (e.g., control characters in an id).
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
        assert_eq!(CoreError::EmptyCart.to_string(), "Cart is empty");

        let err = CoreError::InvalidLine {
            product_id: "A".to_string(),
            source: ValidationError::OutOfRange {
                field: "quantity".to_string(),
                min: 1,
                max: 9_999,
            },
        };
        assert_eq!(
            err.to_string(),
            "Invalid line A: quantity must be between 1 and 9999"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "product_id".to_string(),
        };
        assert_eq!(err.to_string(), "product_id is required");

        let err = ValidationError::Negative {
            field: "unit_price".to_string(),
        };
        assert_eq!(err.to_string(), "unit_price must not be negative");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "product_id".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_json_error_converts_to_malformed_cart() {
        let json_err = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let core_err: CoreError = json_err.into();
        assert!(matches!(core_err, CoreError::MalformedCart(_)));
    }
}
