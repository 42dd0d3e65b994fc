//! # sweet-db: Database Layer for the Sweet Shop
//!
//! This crate provides data access for the Sweet Shop behind a single
//! [`Store`] trait with two concrete adapters.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Sweet Shop Data Flow                             │
//! │                                                                         │
//! │  axum handler (purchase_sweet)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     sweet-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │        ┌───────────────── Store trait ─────────────────┐       │   │
//! │  │        │                                               │       │   │
//! │  │   ┌────▼────────┐                          ┌───────────▼───┐   │   │
//! │  │   │ SqliteStore │                          │    PgStore    │   │   │
//! │  │   │  ?, LIKE    │                          │   $n, ILIKE   │   │   │
//! │  │   └─────────────┘                          └───────────────┘   │   │
//! │  │                                                                 │   │
//! │  │   Each adapter writes its OWN dialect. There is no query        │   │
//! │  │   rewriting layer; the trait's typed results are the uniform    │   │
//! │  │   surface.                                                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - the `Store` trait, backend configuration, connect factory
//! - [`sqlite`] - SQLite adapter (WAL mode, in-memory variant for tests)
//! - [`postgres`] - PostgreSQL adapter
//! - [`error`] - database error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sweet_db::{connect, StoreConfig};
//!
//! let store = connect(&StoreConfig::Sqlite { path: "./sweet_shop.db".into() }).await?;
//! let sweets = store.list_sweets().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod postgres;
pub mod sqlite;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use postgres::PgStore;
pub use sqlite::SqliteStore;
pub use store::{connect, DynStore, Store, StoreConfig};
