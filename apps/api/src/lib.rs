//! # Sweet Shop API
//!
//! REST server for the sweet-shop inventory system.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Sweet Shop API Server                           │
//! │                                                                         │
//! │  Browser ───► HTTP/JSON ───► routes ───► services ───► Store trait    │
//! │                                 │                          │            │
//! │                                 ▼                          ▼            │
//! │                            AuthUser /               SQLite or           │
//! │                            AdminUser                PostgreSQL          │
//! │                            extractors                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store handle is created once at startup and injected into the
//! service constructors; nothing in the process holds global state.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use sweet_db::DynStore;

use crate::auth::JwtManager;
use crate::services::{AuthService, SweetService};

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub sweets: SweetService,
    pub jwt: Arc<JwtManager>,
}

/// Builds the application router over an injected store handle.
///
/// Separated from `main` so integration tests can drive the exact
/// production route table against an in-memory store.
pub fn app(store: DynStore, jwt: JwtManager) -> Router {
    let jwt = Arc::new(jwt);

    let state = AppState {
        auth: AuthService::new(store.clone(), jwt.clone()),
        sweets: SweetService::new(store),
        jwt,
    };

    routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
