//! JWT authentication and password hashing.
//!
//! Handles token generation and validation, bcrypt password hashing, and
//! the axum extractors that gate inventory routes.
//!
//! ## Token Flow
//! ```text
//! register/login ──► JwtManager::issue ──► signed HS256 token (24h)
//!
//! protected route ──► AuthUser extractor
//!                        │  Authorization: Bearer <token>
//!                        ▼
//!                     JwtManager::verify ──► Claims { id, role, ... }
//!
//! admin route ──────► AdminUser extractor (AuthUser + Role::Admin)
//! ```
//!
//! Tokens are stateless: validity is signature + expiry only, there is
//! no server-side revocation list.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sweet_core::{PublicUser, Role};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Fixed bcrypt cost factor.
pub const BCRYPT_COST: u32 = 10;

// =============================================================================
// Passwords
// =============================================================================

/// Hashes a plaintext password with a fresh salt. The plaintext is never
/// persisted.
pub fn hash_password(password: &str) -> ApiResult<String> {
    bcrypt::hash(password, BCRYPT_COST).map_err(|e| ApiError::Internal(e.to_string()))
}

/// Verifies a plaintext password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> ApiResult<bool> {
    bcrypt::verify(password, hash).map_err(|e| ApiError::Internal(e.to_string()))
}

// =============================================================================
// Tokens
// =============================================================================

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub id: i64,

    /// Username at issue time.
    pub username: String,

    /// Email at issue time.
    pub email: String,

    /// Authorization role. Typed, not a raw string.
    pub role: Role,

    /// Issued at (Unix timestamp).
    pub iat: i64,

    /// Expiration (Unix timestamp).
    pub exp: i64,

    /// JWT ID (unique identifier for this token).
    pub jti: String,
}

/// JWT token manager.
#[derive(Clone)]
pub struct JwtManager {
    secret: String,
    lifetime_secs: i64,
}

impl JwtManager {
    /// Create a new JWT manager. The secret's presence is enforced at
    /// startup by configuration loading.
    pub fn new(secret: String, lifetime_secs: i64) -> Self {
        JwtManager {
            secret,
            lifetime_secs,
        }
    }

    /// Issue a token for a user.
    pub fn issue(&self, user: &PublicUser) -> ApiResult<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.lifetime_secs);

        let claims = Claims {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ApiError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Validate and decode a token. Signature and expiry only.
    pub fn verify(&self, token: &str) -> ApiResult<Claims> {
        let validation = Validation::default();

        let token_data: TokenData<Claims> = decode(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(token_data.claims)
    }
}

/// Extract bearer token from an authorization header value.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

// =============================================================================
// Extractors
// =============================================================================

/// Extractor for any authenticated user. Rejects with 401 when the
/// bearer token is missing, malformed, expired, or forged.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Access token required".to_string()))?;

        let token = extract_bearer_token(header)
            .ok_or_else(|| ApiError::Unauthorized("Access token required".to_string()))?;

        let claims = state.jwt.verify(token)?;
        Ok(AuthUser(claims))
    }
}

/// Extractor for administrators. Rejects with 403 for authenticated
/// non-admin users.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Claims);

#[axum::async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;

        if claims.role != Role::Admin {
            return Err(ApiError::Forbidden("Admin access required".to_string()));
        }

        Ok(AdminUser(claims))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
