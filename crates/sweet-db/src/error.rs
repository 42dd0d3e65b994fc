//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! Driver error (sqlx::Error)
//!      │
//!      ▼
//! DbError (this module)  ← adds categorization, no retry, no rewriting
//!      │
//!      ▼
//! ApiError (apps/api)    ← translated to an HTTP status
//! ```

use thiserror::Error;

/// Database operation errors.
///
/// These wrap sqlx errors and provide categorization for the layers
/// above. The underlying driver message is carried through unchanged.
#[derive(Debug, Error)]
pub enum DbError {
    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Registering a duplicate username or email
    /// - Any UNIQUE index violation
    #[error("Duplicate value: {0}")]
    UniqueViolation(String),

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Schema bootstrap failed.
    #[error("Schema creation failed: {0}")]
    SchemaFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// A stored value could not be mapped into a domain type,
    /// e.g. an unknown role string.
    #[error("Corrupt row: {0}")]
    CorruptRow(String),

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database (unique)  → DbError::UniqueViolation
/// sqlx::Error::Database (other)   → DbError::QueryFailed
/// sqlx::Error::PoolTimedOut       → DbError::PoolExhausted
/// Other                           → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                // Covers SQLite "UNIQUE constraint failed" and
                // PostgreSQL SQLSTATE 23505 in one check.
                if db_err.is_unique_violation() {
                    DbError::UniqueViolation(db_err.message().to_string())
                } else {
                    DbError::QueryFailed(db_err.message().to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            sqlx::Error::ColumnDecode { .. } => DbError::CorruptRow(err.to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
