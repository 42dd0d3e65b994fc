//! # Error Types
//!
//! Domain-specific error types for sweet-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  sweet-core errors (this file)                                          │
//! │  ├── CoreError        - Business rule violations                        │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  sweet-db errors (separate crate)                                       │
//! │  └── DbError          - Database operation failures                     │
//! │                                                                         │
//! │  apps/api errors                                                        │
//! │  └── ApiError         - What clients see (HTTP status + JSON body)      │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → client                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (id, available stock, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to one HTTP status at the API boundary

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent business rule violations or domain logic failures.
/// The API layer translates them into HTTP status codes.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Sweet cannot be found.
    #[error("Sweet not found")]
    SweetNotFound,

    /// Insufficient stock to complete a purchase.
    ///
    /// ## When This Occurs
    /// - Requested quantity exceeds what is currently on the shelf
    ///
    /// The purchase leaves the stored quantity untouched in this case;
    /// the conditional decrement never fires.
    #[error("Insufficient stock: available {available}, requested {requested}")]
    InsufficientStock { available: i64, requested: i64 },

    /// A user with the same email or username already exists.
    #[error("User with this email or username already exists")]
    DuplicateUser,

    /// Login failed.
    ///
    /// Deliberately a single variant with a single message: unknown email
    /// and wrong password must be indistinguishable to the caller.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Validation error (wraps ValidationError).
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: &'static str },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: &'static str },

    /// Invalid format (e.g., malformed email address).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },

    /// A partial update carried no fields at all.
    #[error("No fields to update")]
    NoFields,
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
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock: available 3, requested 5"
        );

        assert_eq!(
            CoreError::DuplicateUser.to_string(),
            "User with this email or username already exists"
        );
    }

    #[test]
    fn test_invalid_credentials_single_message() {
        // Unknown email and wrong password share this exact message.
        assert_eq!(
            CoreError::InvalidCredentials.to_string(),
            "Invalid email or password"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required { field: "name" };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::TooShort {
            field: "username",
            min: 3,
        };
        assert_eq!(err.to_string(), "username must be at least 3 characters");

        assert_eq!(ValidationError::NoFields.to_string(), "No fields to update");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required { field: "email" };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
