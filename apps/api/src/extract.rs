//! Request extractors whose rejections speak the API's error dialect.
//!
//! axum's bare `Json` and `Query` reject malformed input on their own
//! (422 or 400 with a plain-text body) before a handler ever runs. Every
//! failure a client sees must instead be a 400 with an
//! `{"error": message}` body, so these wrappers funnel extractor
//! rejections through [`ApiError::BadRequest`].

use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;

/// JSON body extractor. A missing field, type mismatch, or unparseable
/// body rejects with 400 and the standard error body.
#[derive(Debug, Clone)]
pub struct Json<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(Json(value))
    }
}

// Responses go through the same type so handlers need only one Json.
impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Query-string extractor with the same rejection discipline, for
/// malformed values like `?minPrice=cheap`.
#[derive(Debug, Clone)]
pub struct Query<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Query(value) =
            axum::extract::Query::<T>::from_request_parts(parts, state)
                .await
                .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(Query(value))
    }
}
