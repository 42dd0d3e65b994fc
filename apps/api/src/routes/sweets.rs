//! Inventory endpoints.
//!
//! Every route here requires a valid bearer token ([`AuthUser`]);
//! delete and restock additionally require [`AdminUser`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;

use sweet_core::{NewSweet, Sweet, SweetFilter, SweetPatch};

use crate::auth::{AdminUser, AuthUser};
use crate::error::ApiResult;
use crate::extract::{Json, Query};
use crate::AppState;

/// Query-string shape for search. The camelCase price keys are part of
/// the public API.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub name: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "minPrice")]
    pub min_price: Option<f64>,
    #[serde(rename = "maxPrice")]
    pub max_price: Option<f64>,
}

impl From<SearchQuery> for SweetFilter {
    fn from(query: SearchQuery) -> Self {
        SweetFilter {
            name: query.name,
            category: query.category,
            min_price: query.min_price,
            max_price: query.max_price,
        }
    }
}

/// Body shape for purchase and restock.
#[derive(Debug, Deserialize)]
pub struct AdjustStockRequest {
    pub quantity: i64,
}

/// `GET /api/sweets`
pub async fn list(State(state): State<AppState>, _user: AuthUser) -> ApiResult<Json<Vec<Sweet>>> {
    Ok(Json(state.sweets.list_all().await?))
}

/// `GET /api/sweets/search`
pub async fn search(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<Sweet>>> {
    Ok(Json(state.sweets.search(query.into()).await?))
}

/// `POST /api/sweets`
pub async fn create(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(body): Json<NewSweet>,
) -> ApiResult<(StatusCode, Json<Sweet>)> {
    let sweet = state.sweets.create(body).await?;
    Ok((StatusCode::CREATED, Json(sweet)))
}

/// `PUT /api/sweets/:id`
pub async fn update(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
    Json(body): Json<SweetPatch>,
) -> ApiResult<Json<Sweet>> {
    Ok(Json(state.sweets.update(id, body).await?))
}

/// `DELETE /api/sweets/:id` (admin only)
pub async fn remove(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.sweets.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/sweets/:id/purchase`
pub async fn purchase(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
    Json(body): Json<AdjustStockRequest>,
) -> ApiResult<Json<Sweet>> {
    Ok(Json(state.sweets.purchase(id, body.quantity).await?))
}

/// `POST /api/sweets/:id/restock` (admin only)
pub async fn restock(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    Json(body): Json<AdjustStockRequest>,
) -> ApiResult<Json<Sweet>> {
    Ok(Json(state.sweets.restock(id, body.quantity).await?))
}
