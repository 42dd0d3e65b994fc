//! Authentication endpoints: register and login.

use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use crate::error::ApiResult;
use crate::extract::Json;
use crate::services::AuthResponse;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /api/auth/register`
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let response = state
        .auth
        .register(&body.username, &body.email, &body.password)
        .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let response = state.auth.login(&body.email, &body.password).await?;
    Ok(Json(response))
}
