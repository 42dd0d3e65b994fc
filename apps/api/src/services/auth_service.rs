//! Credential service: registration, login, token issuance.
//!
//! ## Login Error Discipline
//! Unknown email and wrong password both fail with
//! [`CoreError::InvalidCredentials`] - one variant, one message - so a
//! caller can never learn which half was wrong.

use std::sync::Arc;

use tracing::{info, warn};

use sweet_core::validation::{validate_email, validate_password, validate_username};
use sweet_core::{CoreError, NewUser, PublicUser, Role, ValidationError};
use sweet_db::DynStore;

use crate::auth::{hash_password, verify_password, JwtManager};
use crate::error::ApiResult;

use serde::Serialize;

/// Successful registration or login: the public user plus a fresh token.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub user: PublicUser,
    pub token: String,
}

/// Registers and authenticates users.
#[derive(Clone)]
pub struct AuthService {
    store: DynStore,
    jwt: Arc<JwtManager>,
}

impl AuthService {
    /// Create a new credential service over an injected store handle.
    pub fn new(store: DynStore, jwt: Arc<JwtManager>) -> Self {
        AuthService { store, jwt }
    }

    /// Registers a new user.
    ///
    /// Validates shapes, checks identity uniqueness, hashes the password
    /// (bcrypt, fixed cost) and returns the created user with a token.
    /// New accounts always start as [`Role::User`].
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> ApiResult<AuthResponse> {
        validate_username(username)?;
        validate_email(email)?;
        validate_password(password)?;

        if self.store.user_exists(email, username).await? {
            return Err(CoreError::DuplicateUser.into());
        }

        let new_user = NewUser {
            username: username.trim().to_string(),
            email: email.trim().to_string(),
            password_hash: hash_password(password)?,
            role: Role::User,
        };

        // The pre-check races with concurrent registrations; the UNIQUE
        // indexes are the backstop and map to the same Conflict response.
        let user = self.store.create_user(&new_user).await?;

        info!(id = user.id, username = %user.username, "User registered");

        let user = PublicUser::from(user);
        let token = self.jwt.issue(&user)?;
        Ok(AuthResponse { user, token })
    }

    /// Authenticates a user by email and password.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<AuthResponse> {
        validate_email(email)?;
        if password.is_empty() {
            return Err(ValidationError::Required { field: "password" }.into());
        }

        let user = match self.store.find_user_by_email(email).await? {
            Some(user) => user,
            None => {
                warn!(%email, "Login attempt for unknown email");
                return Err(CoreError::InvalidCredentials.into());
            }
        };

        if !verify_password(password, &user.password_hash)? {
            warn!(id = user.id, "Login attempt with wrong password");
            return Err(CoreError::InvalidCredentials.into());
        }

        info!(id = user.id, username = %user.username, "User logged in");

        let user = PublicUser::from(user);
        let token = self.jwt.issue(&user)?;
        Ok(AuthResponse { user, token })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use sweet_db::SqliteStore;

    async fn service() -> AuthService {
        let store = Arc::new(SqliteStore::in_memory().await.unwrap());
        let jwt = Arc::new(JwtManager::new("test-secret".to_string(), 86_400));
        AuthService::new(store, jwt)
    }

    #[tokio::test]
    async fn register_returns_user_and_verifiable_token() {
        let service = service().await;
        let response = service
            .register("alice", "alice@example.com", "hunter22")
            .await
            .unwrap();

        assert_eq!(response.user.username, "alice");
        assert_eq!(response.user.role, Role::User);

        let jwt = JwtManager::new("test-secret".to_string(), 86_400);
        let claims = jwt.verify(&response.token).unwrap();
        assert_eq!(claims.id, response.user.id);
        assert_eq!(claims.role, Role::User);
    }

    #[tokio::test]
    async fn register_rejects_bad_shapes() {
        let service = service().await;

        let err = service
            .register("al", "alice@example.com", "hunter22")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let err = service
            .register("alice", "not-an-email", "hunter22")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let err = service
            .register("alice", "alice@example.com", "12345")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn register_duplicate_email_or_username_conflicts() {
        let service = service().await;
        service
            .register("alice", "alice@example.com", "hunter22")
            .await
            .unwrap();

        let err = service
            .register("bob", "alice@example.com", "hunter22")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));

        let err = service
            .register("alice", "bob@example.com", "hunter22")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn login_succeeds_with_correct_password() {
        let service = service().await;
        service
            .register("alice", "alice@example.com", "hunter22")
            .await
            .unwrap();

        let response = service.login("alice@example.com", "hunter22").await.unwrap();
        assert_eq!(response.user.username, "alice");
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let service = service().await;
        service
            .register("alice", "alice@example.com", "hunter22")
            .await
            .unwrap();

        let wrong_password = service
            .login("alice@example.com", "wrong-password")
            .await
            .unwrap_err();
        let unknown_email = service
            .login("nobody@example.com", "hunter22")
            .await
            .unwrap_err();

        // Byte-identical messages for both failure modes.
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert_eq!(wrong_password.to_string(), "Invalid email or password");
        assert!(matches!(wrong_password, ApiError::Unauthorized(_)));
        assert!(matches!(unknown_email, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn stored_hash_is_not_plaintext() {
        let service = service().await;
        let response = service
            .register("alice", "alice@example.com", "hunter22")
            .await
            .unwrap();

        let user = service
            .store
            .find_user_by_email(&response.user.email)
            .await
            .unwrap()
            .unwrap();
        assert_ne!(user.password_hash, "hunter22");
        assert!(user.password_hash.starts_with("$2"));
    }
}
