//! Inventory service: validation, persistence, and stock mutation.
//!
//! ## The One Real Invariant
//! ```text
//! purchase(id, qty)
//!      │
//!      ▼
//! decrement_stock: UPDATE ... WHERE id = ? AND quantity >= ?   ← one statement
//!      │
//!      ├── row returned      → new state (stock can reach 0, never below)
//!      │
//!      └── no row            → re-read to tell the two causes apart:
//!          ├── sweet exists  → InsufficientStock (quantity untouched)
//!          └── sweet absent  → SweetNotFound
//! ```
//! Because the check and the write are a single statement, concurrent
//! purchases of the same sweet cannot oversell.

use tracing::info;

use sweet_core::validation::{validate_new_sweet, validate_stock_adjustment, validate_sweet_patch};
use sweet_core::{CoreError, NewSweet, Sweet, SweetFilter, SweetPatch};
use sweet_db::DynStore;

use crate::error::ApiResult;

/// Validates and persists sweets; owns all stock mutation paths.
#[derive(Clone)]
pub struct SweetService {
    store: DynStore,
}

impl SweetService {
    /// Create a new inventory service over an injected store handle.
    pub fn new(store: DynStore) -> Self {
        SweetService { store }
    }

    /// Creates a sweet after full validation.
    pub async fn create(&self, new: NewSweet) -> ApiResult<Sweet> {
        validate_new_sweet(&new)?;
        let sweet = self.store.insert_sweet(&new).await?;
        info!(id = sweet.id, name = %sweet.name, "Sweet created");
        Ok(sweet)
    }

    /// All sweets, ordered by name ascending.
    pub async fn list_all(&self) -> ApiResult<Vec<Sweet>> {
        Ok(self.store.list_sweets().await?)
    }

    /// Conjunctive filtered search. With no filters this is `list_all`.
    pub async fn search(&self, filter: SweetFilter) -> ApiResult<Vec<Sweet>> {
        Ok(self.store.search_sweets(&filter).await?)
    }

    /// Single sweet by id.
    pub async fn get_by_id(&self, id: i64) -> ApiResult<Sweet> {
        self.store
            .get_sweet(id)
            .await?
            .ok_or_else(|| CoreError::SweetNotFound.into())
    }

    /// Applies a partial update. Only supplied fields are validated and
    /// written; `updated_at` is refreshed.
    pub async fn update(&self, id: i64, patch: SweetPatch) -> ApiResult<Sweet> {
        validate_sweet_patch(&patch)?;
        self.store
            .update_sweet(id, &patch)
            .await?
            .ok_or_else(|| CoreError::SweetNotFound.into())
    }

    /// Decrements stock by `quantity`, atomically.
    pub async fn purchase(&self, id: i64, quantity: i64) -> ApiResult<Sweet> {
        validate_stock_adjustment(quantity)?;

        if let Some(sweet) = self.store.decrement_stock(id, quantity).await? {
            info!(id, quantity, remaining = sweet.quantity, "Purchase");
            return Ok(sweet);
        }

        // The conditional update didn't fire: either the sweet is gone or
        // the shelf is short. A re-read tells the two apart.
        match self.store.get_sweet(id).await? {
            Some(sweet) => Err(CoreError::InsufficientStock {
                available: sweet.quantity,
                requested: quantity,
            }
            .into()),
            None => Err(CoreError::SweetNotFound.into()),
        }
    }

    /// Increments stock by `quantity`.
    pub async fn restock(&self, id: i64, quantity: i64) -> ApiResult<Sweet> {
        validate_stock_adjustment(quantity)?;

        let sweet = self
            .store
            .increment_stock(id, quantity)
            .await?
            .ok_or(CoreError::SweetNotFound)?;

        info!(id, quantity, total = sweet.quantity, "Restock");
        Ok(sweet)
    }

    /// Deletes a sweet permanently.
    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        if !self.store.delete_sweet(id).await? {
            return Err(CoreError::SweetNotFound.into());
        }
        info!(id, "Sweet deleted");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use std::sync::Arc;
    use sweet_db::SqliteStore;

    async fn service() -> SweetService {
        let store = Arc::new(SqliteStore::in_memory().await.unwrap());
        SweetService::new(store)
    }

    fn choc() -> NewSweet {
        NewSweet {
            name: "Choc".to_string(),
            category: "Bar".to_string(),
            price: 2.50,
            quantity: 100,
        }
    }

    #[tokio::test]
    async fn purchase_and_restock_worked_example() {
        // create {Choc, Bar, 2.50, 100} → id=1, quantity=100
        // purchase(1, 10)   → 90
        // purchase(1, 1000) → error, still 90
        // restock(1, 50)    → 140
        let service = service().await;
        let sweet = service.create(choc()).await.unwrap();
        assert_eq!(sweet.id, 1);
        assert_eq!(sweet.quantity, 100);

        let sweet = service.purchase(1, 10).await.unwrap();
        assert_eq!(sweet.quantity, 90);

        let err = service.purchase(1, 1000).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
        assert_eq!(
            err.to_string(),
            "Insufficient stock: available 90, requested 1000"
        );
        assert_eq!(service.get_by_id(1).await.unwrap().quantity, 90);

        let sweet = service.restock(1, 50).await.unwrap();
        assert_eq!(sweet.quantity, 140);
    }

    #[tokio::test]
    async fn purchase_then_restock_is_inverse() {
        let service = service().await;
        let sweet = service.create(choc()).await.unwrap();

        service.purchase(sweet.id, 25).await.unwrap();
        let restored = service.restock(sweet.id, 25).await.unwrap();
        assert_eq!(restored.quantity, sweet.quantity);
    }

    #[tokio::test]
    async fn stock_adjustments_reject_non_positive_quantities() {
        let service = service().await;
        let sweet = service.create(choc()).await.unwrap();

        assert!(matches!(
            service.purchase(sweet.id, 0).await.unwrap_err(),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            service.restock(sweet.id, -3).await.unwrap_err(),
            ApiError::BadRequest(_)
        ));
    }

    #[tokio::test]
    async fn operations_on_missing_sweet_are_not_found() {
        let service = service().await;

        assert!(matches!(
            service.get_by_id(42).await.unwrap_err(),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            service.purchase(42, 1).await.unwrap_err(),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            service.restock(42, 1).await.unwrap_err(),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            service.delete(42).await.unwrap_err(),
            ApiError::NotFound(_)
        ));

        let patch = SweetPatch {
            price: Some(1.0),
            ..Default::default()
        };
        assert!(matches!(
            service.update(42, patch).await.unwrap_err(),
            ApiError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn update_rejects_empty_patch() {
        let service = service().await;
        let sweet = service.create(choc()).await.unwrap();

        let err = service
            .update(sweet.id, SweetPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
        assert_eq!(err.to_string(), "No fields to update");
    }

    #[tokio::test]
    async fn create_rejects_invalid_fields() {
        let service = service().await;

        let bad_price = NewSweet {
            price: 0.0,
            ..choc()
        };
        assert!(matches!(
            service.create(bad_price).await.unwrap_err(),
            ApiError::BadRequest(_)
        ));

        let bad_quantity = NewSweet {
            quantity: -1,
            ..choc()
        };
        assert!(matches!(
            service.create(bad_quantity).await.unwrap_err(),
            ApiError::BadRequest(_)
        ));
    }

    #[tokio::test]
    async fn search_without_filters_matches_list_all() {
        let service = service().await;
        service.create(choc()).await.unwrap();
        service
            .create(NewSweet {
                name: "Bonbon".to_string(),
                category: "Soft".to_string(),
                price: 1.25,
                quantity: 10,
            })
            .await
            .unwrap();

        let all = service.list_all().await.unwrap();
        let searched = service.search(SweetFilter::default()).await.unwrap();
        assert_eq!(all, searched);
    }
}
