//! Application Configuration
//!
//! Configuration for the Auth application layer.

use chrono::Duration;
use platform::config::{self, ConfigError};
use platform::token::{MIN_SECRET_BYTES, TokenCodec, TokenError};
use secrecy::{ExposeSecret, SecretString};

/// Default token lifetime: 7 days
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 7 * 24 * 3600;

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 signing secret (`JWT_SECRET`)
    pub jwt_secret: SecretString,
    /// Token lifetime (`JWT_TTL_SECS`)
    pub token_ttl: Duration,
}

impl AuthConfig {
    pub fn new(jwt_secret: SecretString, token_ttl: Duration) -> Self {
        Self {
            jwt_secret,
            token_ttl,
        }
    }

    /// Load from `JWT_SECRET` and `JWT_TTL_SECS`
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = config::required_secret("JWT_SECRET")?;
        if jwt_secret.expose_secret().len() < MIN_SECRET_BYTES {
            return Err(ConfigError::InvalidValue {
                name: "JWT_SECRET",
                reason: format!("must be at least {MIN_SECRET_BYTES} bytes"),
            });
        }

        let ttl_secs: i64 = config::parse_or("JWT_TTL_SECS", DEFAULT_TOKEN_TTL_SECS)?;
        if ttl_secs <= 0 {
            return Err(ConfigError::InvalidValue {
                name: "JWT_TTL_SECS",
                reason: "must be positive".to_string(),
            });
        }

        Ok(Self::new(jwt_secret, Duration::seconds(ttl_secs)))
    }

    pub fn token_codec(&self) -> Result<TokenCodec, TokenError> {
        TokenCodec::new(&self.jwt_secret, self.token_ttl)
    }
}
