//! # Domain Types
//!
//! Core domain types used throughout the Sweet Shop.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Sweet       │   │      User       │   │      Role       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  User           │       │
//! │  │  name           │   │  username       │   │  Admin          │       │
//! │  │  category       │   │  email          │   └─────────────────┘       │
//! │  │  price          │   │  password_hash  │                             │
//! │  │  quantity       │   │  role           │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! │                                                                         │
//! │  Write-side shapes: NewSweet, SweetPatch, SweetFilter, NewUser          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Role
// =============================================================================

/// Authorization role attached to a user.
///
/// Represented as an enum rather than a raw string so that a typo in a
/// token claim can never silently pass an admin check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Returns the canonical string form stored in the database.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// An identity record.
///
/// Immutable once created except for `role`, which an operator can raise
/// administratively. Owned exclusively by the credential service; the
/// password hash never leaves the server process.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique identifier (database-generated).
    pub id: i64,

    /// Unique display name, 3-50 characters.
    pub username: String,

    /// Unique email address, used as the login key.
    pub email: String,

    /// Salted one-way hash of the password. Never the plaintext.
    pub password_hash: String,

    /// Authorization role.
    pub role: Role,

    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// The user shape safe to hand to clients: everything except the hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        PublicUser {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
        }
    }
}

/// Fields required to insert a user. The hash is computed by the
/// credential service before this struct is built.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

// =============================================================================
// Sweet
// =============================================================================

/// A stocked product record.
///
/// Invariants (enforced by validation and the conditional stock update):
/// - `quantity` never goes negative
/// - `price` is always strictly positive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sweet {
    /// Unique identifier (database-generated).
    pub id: i64,

    /// Display name, non-empty, at most 255 characters.
    pub name: String,

    /// Category label, non-empty, at most 100 characters.
    pub category: String,

    /// Unit price. Strictly positive.
    pub price: f64,

    /// Units currently on the shelf. Never negative.
    pub quantity: i64,

    /// When the record was created.
    pub created_at: DateTime<Utc>,

    /// When the record was last modified.
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a sweet.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSweet {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: i64,
}

/// Partial update for a sweet. Only supplied fields are validated and
/// written; an entirely empty patch is rejected before reaching the store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SweetPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
}

impl SweetPatch {
    /// True when no field is present at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.quantity.is_none()
    }
}

/// Conjunctive search filter. Absent fields impose no constraint.
///
/// - `name` is a case-insensitive substring match
/// - `category` is an exact match
/// - `min_price`/`max_price` are inclusive bounds
#[derive(Debug, Clone, Default)]
pub struct SweetFilter {
    pub name: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("root".parse::<Role>().is_err());
        assert_eq!(Role::Admin.to_string(), "admin");
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let role: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, Role::User);
    }

    #[test]
    fn test_public_user_drops_hash() {
        let user = User {
            id: 1,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$2b$10$secret".to_string(),
            role: Role::User,
            created_at: Utc::now(),
        };
        let public = PublicUser::from(user);
        let json = serde_json::to_string(&public).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains("alice"));
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(SweetPatch::default().is_empty());
        let patch = SweetPatch {
            quantity: Some(3),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
