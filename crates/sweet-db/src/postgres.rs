//! # PostgreSQL Adapter
//!
//! [`Store`] implementation backed by PostgreSQL.
//!
//! ## Dialect Notes
//! - Numbered `$n` placeholders
//! - `ILIKE` for case-insensitive substring search
//! - `BIGSERIAL` identifiers, `TIMESTAMPTZ` timestamps
//!
//! Exercised against a live database only; the test suite runs on the
//! in-memory SQLite adapter.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::{debug, info};

use sweet_core::{NewSweet, NewUser, Role, Sweet, SweetFilter, SweetPatch, User};

use crate::error::{DbError, DbResult};
use crate::store::Store;

/// PostgreSQL-backed store.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connects to PostgreSQL and ensures the schema exists.
    pub async fn connect(url: &str) -> DbResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(30))
            .connect(url)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!("PostgreSQL pool created");

        let store = PgStore { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Idempotent schema bootstrap.
    async fn ensure_schema(&self) -> DbResult<()> {
        debug!("Ensuring PostgreSQL schema");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id          BIGSERIAL PRIMARY KEY,
                username    VARCHAR(255) NOT NULL UNIQUE,
                email       VARCHAR(255) NOT NULL UNIQUE,
                password    VARCHAR(255) NOT NULL,
                role        VARCHAR(50) NOT NULL DEFAULT 'user',
                created_at  TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::SchemaFailed(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sweets (
                id          BIGSERIAL PRIMARY KEY,
                name        VARCHAR(255) NOT NULL,
                category    VARCHAR(100) NOT NULL,
                price       DOUBLE PRECISION NOT NULL,
                quantity    BIGINT NOT NULL DEFAULT 0,
                created_at  TIMESTAMPTZ NOT NULL,
                updated_at  TIMESTAMPTZ NOT NULL
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
fn map_user(row: &PgRow) -> DbResult<User> {
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
impl Store for PgStore {
    async fn create_user(&self, new: &NewUser) -> DbResult<User> {
        let now = Utc::now();

        let row = sqlx::query(
            r#"
            INSERT INTO users (username, email, password, role, created_at)
            VALUES ($1, $2, $3, $4, $5)
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
            "SELECT id, username, email, password, role, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_user).transpose()
    }

    async fn user_exists(&self, email: &str, username: &str) -> DbResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1 OR username = $2")
                .bind(email)
                .bind(username)
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }

    async fn set_user_role(&self, email: &str, role: Role) -> DbResult<bool> {
        let result = sqlx::query("UPDATE users SET role = $1 WHERE email = $2")
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
            VALUES ($1, $2, $3, $4, $5, $6)
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
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT id, name, category, price, quantity, created_at, updated_at \
             FROM sweets WHERE 1=1",
        );

        if let Some(ref name) = filter.name {
            qb.push(" AND name ILIKE ");
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
             FROM sweets WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sweet)
    }

    async fn update_sweet(&self, id: i64, patch: &SweetPatch) -> DbResult<Option<Sweet>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE sweets SET ");
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
        let result = sqlx::query("DELETE FROM sweets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn decrement_stock(&self, id: i64, qty: i64) -> DbResult<Option<Sweet>> {
        // Single conditional UPDATE: stock check and write are atomic.
        let sweet = sqlx::query_as::<_, Sweet>(
            r#"
            UPDATE sweets
            SET quantity = quantity - $1, updated_at = $2
            WHERE id = $3 AND quantity >= $4
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
            SET quantity = quantity + $1, updated_at = $2
            WHERE id = $3
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
