//! API server configuration.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. The one deliberate exception: `JWT_SECRET` has no default
//! and its absence aborts startup - a missing signing secret is a
//! deployment misconfiguration, never a per-request error.

use std::env;

use sweet_db::StoreConfig;

/// Default token lifetime: 24 hours.
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 86_400;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// HTTP listen port.
    pub port: u16,

    /// Which database backend to use and how to reach it.
    pub store: StoreConfig,

    /// JWT signing secret. Required.
    pub jwt_secret: String,

    /// Issued token lifetime in seconds.
    pub token_lifetime_secs: i64,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("PORT".to_string()))?;

        let store = match env::var("DATABASE_TYPE")
            .unwrap_or_else(|_| "postgresql".to_string())
            .as_str()
        {
            "sqlite" => StoreConfig::Sqlite {
                path: env::var("DATABASE_PATH")
                    .unwrap_or_else(|_| "./sweet_shop.db".to_string())
                    .into(),
            },
            "postgresql" | "postgres" => StoreConfig::Postgres {
                url: env::var("DATABASE_URL")
                    .map_err(|_| ConfigError::MissingRequired("DATABASE_URL".to_string()))?,
            },
            _ => return Err(ConfigError::InvalidValue("DATABASE_TYPE".to_string())),
        };

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| ConfigError::MissingRequired("JWT_SECRET".to_string()))?;

        let token_lifetime_secs = env::var("TOKEN_LIFETIME_SECS")
            .unwrap_or_else(|_| DEFAULT_TOKEN_LIFETIME_SECS.to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("TOKEN_LIFETIME_SECS".to_string()))?;

        Ok(ApiConfig {
            port,
            store,
            jwt_secret,
            token_lifetime_secs,
        })
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
