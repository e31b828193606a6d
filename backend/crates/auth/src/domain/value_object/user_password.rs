//! User Password Value Object
//!
//! Domain wrapper around `platform::password`. Hashing and verification
//! run on the blocking thread pool.

use kernel::error::app_error::{AppError, AppResult};
use platform::password::{self, ClearTextPassword, HashedPassword, PasswordPolicyError};
use std::fmt;

use crate::error::{AuthError, AuthResult};

/// Password as typed by the user; zeroized on drop
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Validate a new password (registration, password change)
    pub fn new(raw: String) -> AppResult<Self> {
        let clear_text = ClearTextPassword::new(raw).map_err(|e| match e {
            PasswordPolicyError::TooShort { min, .. } => {
                AppError::bad_request(format!("Password must be at least {min} characters"))
                    .with_action("Please choose a longer password")
            }
            PasswordPolicyError::TooLong { max, .. } => {
                AppError::bad_request(format!("Password must be at most {max} characters"))
                    .with_action("Please choose a shorter password")
            }
            PasswordPolicyError::EmptyOrWhitespace => {
                AppError::bad_request("Password cannot be empty")
            }
            PasswordPolicyError::InvalidCharacter => {
                AppError::bad_request("Password contains invalid characters")
            }
        })?;

        Ok(Self(clear_text))
    }

    /// Password submitted at login; compared against the stored hash as-is
    pub fn for_login(raw: String) -> Self {
        Self(ClearTextPassword::unchecked(raw))
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

/// Stored Argon2id hash
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    pub async fn hash(raw: RawPassword) -> AuthResult<Self> {
        password::hash_blocking(raw.0)
            .await
            .map(Self)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    pub async fn matches(&self, raw: RawPassword) -> bool {
        password::verify_blocking(self.0.clone(), raw.0).await
    }

    pub fn from_phc_string(phc: impl Into<String>) -> AuthResult<Self> {
        HashedPassword::from_phc_string(phc)
            .map(Self)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UserPassword").field(&"[HASH]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_and_match() {
        let hashed = UserPassword::hash(RawPassword::new("secret-pass-1".into()).unwrap())
            .await
            .unwrap();

        assert_ne!(hashed.as_phc_string(), "secret-pass-1");
        assert!(hashed.matches(RawPassword::for_login("secret-pass-1".into())).await);
        assert!(!hashed.matches(RawPassword::for_login("secret-pass-2".into())).await);
    }

    #[test]
    fn test_policy_messages() {
        let err = RawPassword::new("short".into()).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.message().contains("at least 8"));
    }
}
