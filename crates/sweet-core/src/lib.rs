//! # sweet-core: Pure Business Logic for the Sweet Shop
//!
//! This crate is the heart of the inventory system. It contains all business
//! rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sweet Shop Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/api (axum handlers)                     │   │
//! │  │    register, login, list, search, purchase, restock, ...        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ sweet-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐      ┌───────────┐      ┌───────────┐          │   │
//! │  │   │   types   │      │ validation│      │   error   │          │   │
//! │  │   │ Sweet,User│      │   rules   │      │  taxonomy │          │   │
//! │  │   └───────────┘      └───────────┘      └───────────┘          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 sweet-db (SQLite / PostgreSQL)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Sweet, User, Role, filters and patches)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: every function is deterministic
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum username length accepted at registration.
pub const MIN_USERNAME_LEN: usize = 3;

/// Maximum username length accepted at registration.
pub const MAX_USERNAME_LEN: usize = 50;

/// Minimum password length accepted at registration.
///
/// ## Business Reason
/// Anything shorter is trivially brute-forceable. The hash cost factor
/// does the real work; this is a floor, not a policy engine.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Maximum sweet name length.
pub const MAX_SWEET_NAME_LEN: usize = 255;

/// Maximum category length.
pub const MAX_CATEGORY_LEN: usize = 100;
