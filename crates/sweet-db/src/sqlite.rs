//! # SQLite Adapter
//!
//! [`Store`] implementation backed by a local SQLite file.
//!
//! ## Dialect Notes
//! - Positional `?` placeholders
//! - `LIKE` is already case-insensitive for ASCII, so no operator
//!   substitution is needed for substring search
//! - `RETURNING` requires SQLite 3.35+, which the bundled driver provides
//!
//! ## WAL Mode
//! WAL (Write-Ahead Logging) is enabled for better concurrent read
//! performance: readers don't block writers and vice versa.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow, SqliteSynchronous,
};
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::{debug, info};

use sweet_core::{NewSweet, NewUser, Role, Sweet, SweetFilter, SweetPatch, User};

use crate::error::{DbError, DbResult};
use crate::store::Store;

/// SQLite-backed store.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if missing) a SQLite database at the given path
    /// and ensures the schema exists.
    pub async fn connect(path: &Path) -> DbResult<Self> {
        // sqlite://path?mode=rwc creates the file if not exists
        let connect_url = format!("sqlite://{}?mode=rwc", path.display());

        let options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            // WAL mode: readers don't block writers, writers don't block readers
            .journal_mode(SqliteJournalMode::Wal)
            // NORMAL synchronous: safe from corruption, may lose last txn on crash
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(path = %path.display(), "SQLite pool created");

        let store = SqliteStore { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Creates an isolated in-memory database (for testing).
    ///
    /// In-memory SQLite lives and dies with its connection, so the pool
    /// is pinned to a single connection.
    pub async fn in_memory() -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        let store = SqliteStore { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Idempotent schema bootstrap. Timestamps are set by the adapter in
    /// Rust, so the columns carry no SQL defaults.
    async fn ensure_schema(&self) -> DbResult<()> {
        debug!("Ensuring SQLite schema");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                username    TEXT NOT NULL UNIQUE,
                email       TEXT NOT NULL UNIQUE,
                password    TEXT NOT NULL,
                role        TEXT NOT NULL DEFAULT 'user',
                created_at  TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::SchemaFailed(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sweets (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                name        TEXT NOT NULL,
                category    TEXT NOT NULL,
                price       REAL NOT NULL,
                quantity    INTEGER NOT NULL DEFAULT 0,
                created_at  TEXT NOT NULL,
                updated_at  TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::SchemaFailed(e.to_string()))?;

        Ok(())
    }
}

/// Maps a users row, parsing the stored role string into [`Role`].
fn map_user(row: &SqliteRow) -> DbResult<User> {
    let role: String = row.try_get("role")?;
    let role = role
        .parse::<Role>()
        .map_err(|e| DbError::CorruptRow(e.to_string()))?;

    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password")?,
        role,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

#[async_trait]
impl Store for SqliteStore {
    async fn create_user(&self, new: &NewUser) -> DbResult<User> {
        let now = Utc::now();

        let row = sqlx::query(
            r#"
            INSERT INTO users (username, email, password, role, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, username, email, password, role, created_at
            "#,
        )
        .bind(&new.username)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(new.role.as_str())
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        map_user(&row)
    }

    async fn find_user_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, username, email, password, role, created_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_user).transpose()
    }

    async fn user_exists(&self, email: &str, username: &str) -> DbResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ? OR username = ?")
                .bind(email)
                .bind(username)
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }

    async fn set_user_role(&self, email: &str, role: Role) -> DbResult<bool> {
        let result = sqlx::query("UPDATE users SET role = ? WHERE email = ?")
            .bind(role.as_str())
            .bind(email)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_sweet(&self, new: &NewSweet) -> DbResult<Sweet> {
        let now = Utc::now();

        let sweet = sqlx::query_as::<_, Sweet>(
            r#"
            INSERT INTO sweets (name, category, price, quantity, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, name, category, price, quantity, created_at, updated_at
            "#,
        )
        .bind(&new.name)
        .bind(&new.category)
        .bind(new.price)
        .bind(new.quantity)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        debug!(id = sweet.id, name = %sweet.name, "Inserted sweet");
        Ok(sweet)
    }

    async fn list_sweets(&self) -> DbResult<Vec<Sweet>> {
        let sweets = sqlx::query_as::<_, Sweet>(
            "SELECT id, name, category, price, quantity, created_at, updated_at \
             FROM sweets ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(sweets)
    }

    async fn search_sweets(&self, filter: &SweetFilter) -> DbResult<Vec<Sweet>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, name, category, price, quantity, created_at, updated_at \
             FROM sweets WHERE 1=1",
        );

        if let Some(ref name) = filter.name {
            // SQLite LIKE is case-insensitive for ASCII.
            qb.push(" AND name LIKE ");
            qb.push_bind(format!("%{name}%"));
        }
        if let Some(ref category) = filter.category {
            qb.push(" AND category = ");
            qb.push_bind(category.clone());
        }
        if let Some(min_price) = filter.min_price {
            qb.push(" AND price >= ");
            qb.push_bind(min_price);
        }
        if let Some(max_price) = filter.max_price {
            qb.push(" AND price <= ");
            qb.push_bind(max_price);
        }

        qb.push(" ORDER BY name");

        let sweets = qb.build_query_as::<Sweet>().fetch_all(&self.pool).await?;
        Ok(sweets)
    }

    async fn get_sweet(&self, id: i64) -> DbResult<Option<Sweet>> {
        let sweet = sqlx::query_as::<_, Sweet>(
            "SELECT id, name, category, price, quantity, created_at, updated_at \
             FROM sweets WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sweet)
    }

    async fn update_sweet(&self, id: i64, patch: &SweetPatch) -> DbResult<Option<Sweet>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE sweets SET ");
        let mut set = qb.separated(", ");

        if let Some(ref name) = patch.name {
            set.push("name = ");
            set.push_bind_unseparated(name.clone());
        }
        if let Some(ref category) = patch.category {
            set.push("category = ");
            set.push_bind_unseparated(category.clone());
        }
        if let Some(price) = patch.price {
            set.push("price = ");
            set.push_bind_unseparated(price);
        }
        if let Some(quantity) = patch.quantity {
            set.push("quantity = ");
            set.push_bind_unseparated(quantity);
        }
        set.push("updated_at = ");
        set.push_bind_unseparated(Utc::now());

        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(" RETURNING id, name, category, price, quantity, created_at, updated_at");

        let sweet = qb
            .build_query_as::<Sweet>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(sweet)
    }

    async fn delete_sweet(&self, id: i64) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM sweets WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn decrement_stock(&self, id: i64, qty: i64) -> DbResult<Option<Sweet>> {
        // Single conditional UPDATE: the stock check and the write are one
        // statement, so concurrent purchases cannot both pass the check.
        let sweet = sqlx::query_as::<_, Sweet>(
            r#"
            UPDATE sweets
            SET quantity = quantity - ?, updated_at = ?
            WHERE id = ? AND quantity >= ?
            RETURNING id, name, category, price, quantity, created_at, updated_at
            "#,
        )
        .bind(qty)
        .bind(Utc::now())
        .bind(id)
        .bind(qty)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sweet)
    }

    async fn increment_stock(&self, id: i64, qty: i64) -> DbResult<Option<Sweet>> {
        let sweet = sqlx::query_as::<_, Sweet>(
            r#"
            UPDATE sweets
            SET quantity = quantity + ?, updated_at = ?
            WHERE id = ?
            RETURNING id, name, category, price, quantity, created_at, updated_at
            "#,
        )
        .bind(qty)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sweet)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> SqliteStore {
        SqliteStore::in_memory().await.unwrap()
    }

    fn new_sweet(name: &str, category: &str, price: f64, quantity: i64) -> NewSweet {
        NewSweet {
            name: name.to_string(),
            category: category.to_string(),
            price,
            quantity,
        }
    }

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "$2b$10$hash".to_string(),
            role: Role::User,
        }
    }

    #[tokio::test]
    async fn insert_and_get_sweet() {
        let store = store().await;
        let created = store
            .insert_sweet(&new_sweet("Choc", "Bar", 2.50, 100))
            .await
            .unwrap();

        assert_eq!(created.id, 1);
        assert_eq!(created.quantity, 100);

        let fetched = store.get_sweet(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);

        assert!(store.get_sweet(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_orders_by_name() {
        let store = store().await;
        store
            .insert_sweet(&new_sweet("Toffee", "Chew", 1.00, 5))
            .await
            .unwrap();
        store
            .insert_sweet(&new_sweet("Aniseed Twist", "Hard", 0.50, 5))
            .await
            .unwrap();
        store
            .insert_sweet(&new_sweet("Fudge", "Soft", 2.00, 5))
            .await
            .unwrap();

        let names: Vec<_> = store
            .list_sweets()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Aniseed Twist", "Fudge", "Toffee"]);
    }

    #[tokio::test]
    async fn search_without_filters_matches_list() {
        let store = store().await;
        store
            .insert_sweet(&new_sweet("Choc", "Bar", 2.50, 10))
            .await
            .unwrap();
        store
            .insert_sweet(&new_sweet("Bonbon", "Soft", 1.25, 10))
            .await
            .unwrap();

        let all = store.list_sweets().await.unwrap();
        let searched = store.search_sweets(&SweetFilter::default()).await.unwrap();
        assert_eq!(all, searched);
    }

    #[tokio::test]
    async fn search_name_is_case_insensitive_substring() {
        let store = store().await;
        store
            .insert_sweet(&new_sweet("Dark Chocolate", "Bar", 3.00, 10))
            .await
            .unwrap();
        store
            .insert_sweet(&new_sweet("Gummy Bears", "Chew", 1.50, 10))
            .await
            .unwrap();

        let filter = SweetFilter {
            name: Some("choc".to_string()),
            ..Default::default()
        };
        let found = store.search_sweets(&filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Dark Chocolate");
    }

    #[tokio::test]
    async fn search_category_is_exact() {
        let store = store().await;
        store
            .insert_sweet(&new_sweet("Choc", "Bar", 2.50, 10))
            .await
            .unwrap();
        store
            .insert_sweet(&new_sweet("Wafer", "Barred", 2.00, 10))
            .await
            .unwrap();

        let filter = SweetFilter {
            category: Some("Bar".to_string()),
            ..Default::default()
        };
        let found = store.search_sweets(&filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Choc");
    }

    #[tokio::test]
    async fn search_price_bounds_are_inclusive() {
        let store = store().await;
        store
            .insert_sweet(&new_sweet("Cheap", "Misc", 1.00, 10))
            .await
            .unwrap();
        store
            .insert_sweet(&new_sweet("Mid", "Misc", 2.00, 10))
            .await
            .unwrap();
        store
            .insert_sweet(&new_sweet("Dear", "Misc", 3.00, 10))
            .await
            .unwrap();

        let filter = SweetFilter {
            min_price: Some(1.00),
            max_price: Some(2.00),
            ..Default::default()
        };
        let names: Vec<_> = store
            .search_sweets(&filter)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Cheap", "Mid"]);
    }

    #[tokio::test]
    async fn search_filters_are_conjunctive() {
        let store = store().await;
        store
            .insert_sweet(&new_sweet("Choc Bar", "Bar", 2.50, 10))
            .await
            .unwrap();
        store
            .insert_sweet(&new_sweet("Choc Truffle", "Soft", 2.50, 10))
            .await
            .unwrap();

        let filter = SweetFilter {
            name: Some("choc".to_string()),
            category: Some("Bar".to_string()),
            ..Default::default()
        };
        let found = store.search_sweets(&filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Choc Bar");
    }

    #[tokio::test]
    async fn update_applies_only_supplied_fields() {
        let store = store().await;
        let created = store
            .insert_sweet(&new_sweet("Choc", "Bar", 2.50, 100))
            .await
            .unwrap();

        let patch = SweetPatch {
            price: Some(2.75),
            ..Default::default()
        };
        let updated = store
            .update_sweet(created.id, &patch)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.price, 2.75);
        assert_eq!(updated.name, "Choc");
        assert_eq!(updated.quantity, 100);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn update_missing_row_returns_none() {
        let store = store().await;
        let patch = SweetPatch {
            price: Some(1.00),
            ..Default::default()
        };
        assert!(store.update_sweet(42, &patch).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_reports_affected_rows() {
        let store = store().await;
        let created = store
            .insert_sweet(&new_sweet("Choc", "Bar", 2.50, 1))
            .await
            .unwrap();

        assert!(store.delete_sweet(created.id).await.unwrap());
        assert!(!store.delete_sweet(created.id).await.unwrap());
        assert!(store.get_sweet(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn decrement_respects_available_stock() {
        let store = store().await;
        let created = store
            .insert_sweet(&new_sweet("Choc", "Bar", 2.50, 100))
            .await
            .unwrap();

        let after = store
            .decrement_stock(created.id, 10)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after.quantity, 90);

        // Shortfall: the conditional update must not fire, quantity unchanged.
        assert!(store
            .decrement_stock(created.id, 1000)
            .await
            .unwrap()
            .is_none());
        let current = store.get_sweet(created.id).await.unwrap().unwrap();
        assert_eq!(current.quantity, 90);

        // Missing row also comes back as None.
        assert!(store.decrement_stock(999, 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn decrement_allows_draining_to_zero() {
        let store = store().await;
        let created = store
            .insert_sweet(&new_sweet("Choc", "Bar", 2.50, 5))
            .await
            .unwrap();

        let after = store.decrement_stock(created.id, 5).await.unwrap().unwrap();
        assert_eq!(after.quantity, 0);

        assert!(store.decrement_stock(created.id, 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn purchase_then_restock_restores_quantity() {
        let store = store().await;
        let created = store
            .insert_sweet(&new_sweet("Choc", "Bar", 2.50, 100))
            .await
            .unwrap();

        store.decrement_stock(created.id, 37).await.unwrap();
        let after = store
            .increment_stock(created.id, 37)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after.quantity, 100);
    }

    #[tokio::test]
    async fn create_and_find_user() {
        let store = store().await;
        let created = store
            .create_user(&new_user("alice", "alice@example.com"))
            .await
            .unwrap();

        assert_eq!(created.role, Role::User);
        assert_eq!(created.password_hash, "$2b$10$hash");

        let found = store
            .find_user_by_email("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.username, "alice");

        assert!(store
            .find_user_by_email("nobody@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn duplicate_user_is_unique_violation() {
        let store = store().await;
        store
            .create_user(&new_user("alice", "alice@example.com"))
            .await
            .unwrap();

        let err = store
            .create_user(&new_user("alice2", "alice@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation(_)));

        let err = store
            .create_user(&new_user("alice", "other@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation(_)));
    }

    #[tokio::test]
    async fn user_exists_matches_either_key() {
        let store = store().await;
        store
            .create_user(&new_user("alice", "alice@example.com"))
            .await
            .unwrap();

        assert!(store
            .user_exists("alice@example.com", "someone")
            .await
            .unwrap());
        assert!(store
            .user_exists("other@example.com", "alice")
            .await
            .unwrap());
        assert!(!store
            .user_exists("other@example.com", "someone")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn set_user_role_promotes() {
        let store = store().await;
        store
            .create_user(&new_user("alice", "alice@example.com"))
            .await
            .unwrap();

        assert!(store
            .set_user_role("alice@example.com", Role::Admin)
            .await
            .unwrap());
        let user = store
            .find_user_by_email("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.role, Role::Admin);

        assert!(!store
            .set_user_role("nobody@example.com", Role::Admin)
            .await
            .unwrap());
    }
}
