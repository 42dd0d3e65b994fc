//! # Validation Module
//!
//! Input validation rules for the Sweet Shop.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: axum handler (Rust)                                           │
//! │  ├── Type validation (JSON deserialization)                             │
//! │  └── THIS MODULE: business rule validation                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Database                                                      │
//! │  ├── NOT NULL constraints                                               │
//! │  ├── UNIQUE constraints (username, email)                               │
//! │  └── Conditional stock decrement (quantity >= requested)                │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::{NewSweet, SweetPatch};
use crate::{
    MAX_CATEGORY_LEN, MAX_SWEET_NAME_LEN, MAX_USERNAME_LEN, MIN_PASSWORD_LEN, MIN_USERNAME_LEN,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Credential Validators
// =============================================================================

/// Validates a username.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 3 and 50 characters
pub fn validate_username(username: &str) -> ValidationResult<()> {
    let username = username.trim();

    if username.is_empty() {
        return Err(ValidationError::Required { field: "username" });
    }

    if username.len() < MIN_USERNAME_LEN {
        return Err(ValidationError::TooShort {
            field: "username",
            min: MIN_USERNAME_LEN,
        });
    }

    if username.len() > MAX_USERNAME_LEN {
        return Err(ValidationError::TooLong {
            field: "username",
            max: MAX_USERNAME_LEN,
        });
    }

    Ok(())
}

/// Validates an email address shape.
///
/// Not an RFC 5322 parser; rejects the obviously malformed (missing `@`,
/// empty local part, domain without a dot) and leaves delivery problems
/// to the mail server.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required { field: "email" });
    }

    if email.len() > 255 {
        return Err(ValidationError::TooLong {
            field: "email",
            max: 255,
        });
    }

    let invalid = ValidationError::InvalidFormat {
        field: "email",
        reason: "must be a valid email address",
    };

    let Some((local, domain)) = email.split_once('@') else {
        return Err(invalid);
    };

    if local.is_empty() || domain.is_empty() || email.contains(char::is_whitespace) {
        return Err(invalid);
    }

    // Domain needs at least one dot with content on both sides.
    match domain.split_once('.') {
        Some((head, tail)) if !head.is_empty() && !tail.is_empty() => Ok(()),
        _ => Err(invalid),
    }
}

/// Validates a password at registration.
///
/// ## Rules
/// - At least 6 characters
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password",
            min: MIN_PASSWORD_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Sweet Field Validators
// =============================================================================

/// Validates a sweet name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 255 characters
pub fn validate_sweet_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required { field: "name" });
    }

    if name.len() > MAX_SWEET_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name",
            max: MAX_SWEET_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a category label.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 100 characters
pub fn validate_category(category: &str) -> ValidationResult<()> {
    let category = category.trim();

    if category.is_empty() {
        return Err(ValidationError::Required { field: "category" });
    }

    if category.len() > MAX_CATEGORY_LEN {
        return Err(ValidationError::TooLong {
            field: "category",
            max: MAX_CATEGORY_LEN,
        });
    }

    Ok(())
}

/// Validates a unit price.
///
/// ## Rules
/// - Must be strictly positive
/// - NaN and infinities are rejected
pub fn validate_price(price: f64) -> ValidationResult<()> {
    if !price.is_finite() || price <= 0.0 {
        return Err(ValidationError::MustBePositive { field: "price" });
    }

    Ok(())
}

/// Validates a stored stock quantity.
///
/// ## Rules
/// - Must not be negative (zero is a legal shelf state)
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity < 0 {
        return Err(ValidationError::Negative { field: "quantity" });
    }

    Ok(())
}

/// Validates a purchase or restock amount.
///
/// Unlike [`validate_quantity`], zero is rejected here: buying or
/// restocking nothing is a caller mistake, not a no-op.
pub fn validate_stock_adjustment(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive { field: "quantity" });
    }

    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates all fields of a new sweet.
pub fn validate_new_sweet(sweet: &NewSweet) -> ValidationResult<()> {
    validate_sweet_name(&sweet.name)?;
    validate_category(&sweet.category)?;
    validate_price(sweet.price)?;
    validate_quantity(sweet.quantity)?;
    Ok(())
}

/// Validates only the supplied subset of a partial update.
///
/// An entirely empty patch is rejected with [`ValidationError::NoFields`].
pub fn validate_sweet_patch(patch: &SweetPatch) -> ValidationResult<()> {
    if patch.is_empty() {
        return Err(ValidationError::NoFields);
    }

    if let Some(ref name) = patch.name {
        validate_sweet_name(name)?;
    }
    if let Some(ref category) = patch.category {
        validate_category(category)?;
    }
    if let Some(price) = patch.price {
        validate_price(price)?;
    }
    if let Some(quantity) = patch.quantity {
        validate_quantity(quantity)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
