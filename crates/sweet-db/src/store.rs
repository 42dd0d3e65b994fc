//! # Store Trait and Backend Selection
//!
//! One uniform data-access contract, two concrete adapters.
//!
//! ## Design
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Backend Selection                                 │
//! │                                                                         │
//! │  ApiConfig (DATABASE_TYPE)                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreConfig::Sqlite { path } ──► SqliteStore::connect                  │
//! │  StoreConfig::Postgres { url } ─► PgStore::connect                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Arc<dyn Store>  ← services only ever see this                          │
//! │                                                                         │
//! │  The handle is injected into service constructors; there is no          │
//! │  ambient/global database state anywhere in the process.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use sweet_core::{NewSweet, NewUser, Role, Sweet, SweetFilter, SweetPatch, User};

use crate::error::DbResult;
use crate::postgres::PgStore;
use crate::sqlite::SqliteStore;

// =============================================================================
// Store Trait
// =============================================================================

/// Uniform data-access contract implemented by both backends.
///
/// Callers write against this trait only; each adapter emits its own SQL
/// dialect internally. Missing rows come back as `Ok(None)`/`Ok(false)`,
/// never as errors - translating absence into a domain error is the
/// services' job.
#[async_trait]
pub trait Store: Send + Sync {
    // -------------------------------------------------------------------------
    // Users
    // -------------------------------------------------------------------------

    /// Inserts a user. Unique violations on username or email surface as
    /// [`crate::DbError::UniqueViolation`].
    async fn create_user(&self, new: &NewUser) -> DbResult<User>;

    /// Looks up a user by email (the login key).
    async fn find_user_by_email(&self, email: &str) -> DbResult<Option<User>>;

    /// True when any user already holds the given email OR username.
    async fn user_exists(&self, email: &str, username: &str) -> DbResult<bool>;

    /// Sets a user's role. Returns false when no such user exists.
    async fn set_user_role(&self, email: &str, role: Role) -> DbResult<bool>;

    // -------------------------------------------------------------------------
    // Sweets
    // -------------------------------------------------------------------------

    /// Inserts a sweet and returns the stored record with its generated
    /// id and timestamps.
    async fn insert_sweet(&self, new: &NewSweet) -> DbResult<Sweet>;

    /// All sweets, ordered by name ascending.
    async fn list_sweets(&self) -> DbResult<Vec<Sweet>>;

    /// Conjunctive filtered search, ordered by name ascending.
    /// An empty filter returns the same rows as [`Store::list_sweets`].
    async fn search_sweets(&self, filter: &SweetFilter) -> DbResult<Vec<Sweet>>;

    /// Single sweet by id.
    async fn get_sweet(&self, id: i64) -> DbResult<Option<Sweet>>;

    /// Applies a partial update and refreshes `updated_at`. Returns the
    /// new record, or `None` when no row matched. Callers must reject
    /// empty patches before getting here.
    async fn update_sweet(&self, id: i64, patch: &SweetPatch) -> DbResult<Option<Sweet>>;

    /// Deletes a sweet. Returns false when no row was affected.
    async fn delete_sweet(&self, id: i64) -> DbResult<bool>;

    /// Atomically decrements stock with a single conditional UPDATE
    /// asserting `quantity >= qty`. Returns the new record, or `None`
    /// when no row qualified (missing id OR insufficient stock - two
    /// concurrent purchases can never both pass the check).
    async fn decrement_stock(&self, id: i64, qty: i64) -> DbResult<Option<Sweet>>;

    /// Atomically increments stock. Returns `None` when the id is absent.
    async fn increment_stock(&self, id: i64, qty: i64) -> DbResult<Option<Sweet>>;

    /// Closes the underlying pool.
    async fn close(&self);
}

/// Shared, object-safe store handle passed to service constructors.
pub type DynStore = Arc<dyn Store>;

// =============================================================================
// Backend Configuration
// =============================================================================

/// Which backend to connect to.
#[derive(Debug, Clone)]
pub enum StoreConfig {
    /// Local SQLite file (created on first use).
    Sqlite { path: PathBuf },

    /// PostgreSQL connection string.
    Postgres { url: String },
}

/// Connects to the configured backend and ensures the schema exists.
///
/// Schema creation is idempotent (`CREATE TABLE IF NOT EXISTS`), so
/// reconnecting against an existing database is safe.
pub async fn connect(config: &StoreConfig) -> DbResult<DynStore> {
    match config {
        StoreConfig::Sqlite { path } => {
            info!(path = %path.display(), "Connecting to SQLite");
            let store = SqliteStore::connect(path).await?;
            Ok(Arc::new(store))
        }
        StoreConfig::Postgres { url } => {
            info!("Connecting to PostgreSQL");
            let store = PgStore::connect(url).await?;
            Ok(Arc::new(store))
        }
    }
}
