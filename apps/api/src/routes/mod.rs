//! Route handlers mapping the REST surface onto the services.
//!
//! ## Surface
//! ```text
//! POST   /api/auth/register              → 201 {user, token} | 400 | 409
//! POST   /api/auth/login                 → 200 {user, token} | 401
//! GET    /api/sweets             (auth)  → 200 [Sweet]
//! GET    /api/sweets/search      (auth)  → 200 [Sweet]
//! POST   /api/sweets             (auth)  → 201 Sweet | 400
//! PUT    /api/sweets/:id         (auth)  → 200 Sweet | 400 | 404
//! DELETE /api/sweets/:id         (admin) → 204 | 404
//! POST   /api/sweets/:id/purchase (auth) → 200 Sweet | 400 | 404
//! POST   /api/sweets/:id/restock (admin) → 200 Sweet | 400 | 404
//! GET    /health                 (open)  → 200 {status: "ok"}
//! ```

pub mod auth;
pub mod health;
pub mod sweets;

use axum::routing::{get, post, put};
use axum::Router;

use crate::AppState;

/// Assembles the full route table.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/sweets", get(sweets::list).post(sweets::create))
        .route("/api/sweets/search", get(sweets::search))
        .route("/api/sweets/:id", put(sweets::update).delete(sweets::remove))
        .route("/api/sweets/:id/purchase", post(sweets::purchase))
        .route("/api/sweets/:id/restock", post(sweets::restock))
        .with_state(state)
}
