//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  tally-store errors (separate crate)                                   │
//! │  └── StoreError       - Persistence failures (wraps CoreError too)     │
//! │                                                                         │
//! │  HTTP API errors (apps/server)                                         │
//! │  └── ApiError         - What the caller sees (status + JSON body)      │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → ApiError → Client    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product code, amounts, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to one HTTP status at the edge

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations during bill
/// creation. They abort the whole bill: no stock is mutated and
/// nothing is persisted when any of them fires.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Referenced product code does not exist.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Requested quantity exceeds available stock.
    ///
    /// ## User Workflow
    /// ```text
    /// Bill line: LP001 × 15
    ///      │
    ///      ▼
    /// Check stock: available = 10
    ///      │
    ///      ▼
    /// InsufficientStock { code: "LP001", available: 10, requested: 15 }
    /// ```
    #[error("Insufficient stock for {code}: available {available}, requested {requested}")]
    InsufficientStock {
        code: String,
        available: i64,
        requested: i64,
    },

    /// Cash tendered is below the bill's final amount.
    ///
    /// Only raised when the caller supplied a denomination breakdown.
    #[error("Insufficient payment: tendered {tendered_cents}, required {required_cents}")]
    InsufficientPayment {
        tendered_cents: i64,
        required_cents: i64,
    },

    /// Bill has exceeded the maximum allowed line count.
    #[error("Bill cannot have more than {max} lines")]
    TooManyLines { max: usize },

    /// Line or bill arithmetic exceeded the representable money range.
    ///
    /// Only reachable with a catalogue price far beyond
    /// [`crate::MAX_PRICE_CENTS`]; pricing reports it instead of
    /// overflowing.
    #[error("Amount overflow pricing {code}")]
    AmountOverflow { code: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before business logic runs.
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

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., bad product code, bad email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., duplicate product code).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
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
        let err = CoreError::InsufficientStock {
            code: "LP001".to_string(),
            available: 10,
            requested: 15,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for LP001: available 10, requested 15"
        );

        let err = CoreError::InsufficientPayment {
            tendered_cents: 50000,
            required_cents: 53100,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient payment: tendered 50000, required 53100"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "code".to_string(),
        };
        assert_eq!(err.to_string(), "code is required");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "code".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
