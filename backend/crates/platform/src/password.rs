//! Password Hashing and Verification
//!
//! - Argon2id hashing with a random salt per password (PHC string output)
//! - Unicode NFKC normalization before validation and hashing
//! - Zeroization of clear text on drop
//! - Constant-time verification (delegated to `argon2`)

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Minimum password length in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length in characters
pub const MAX_PASSWORD_LENGTH: usize = 128;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    #[error("Password contains invalid control characters")]
    InvalidCharacter,
}

/// Password hashing errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Not `Clone`, and `Debug` output is redacted.
///
/// ```rust
/// use platform::password::ClearTextPassword;
///
/// let password = ClearTextPassword::new("correct horse battery".to_string()).unwrap();
/// let hashed = password.hash().unwrap();
/// assert!(hashed.verify(&password));
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Normalize (NFKC) and validate a raw password
    ///
    /// Rules: not blank, 8 to 128 characters (code points), no control
    /// characters other than space, tab and newline.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let mut raw = raw;
        let normalized: String = raw.nfkc().collect();
        raw.zeroize();

        if normalized.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        let char_count = normalized.chars().count();
        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }
        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if normalized
            .chars()
            .any(|ch| ch.is_control() && ch != '\t' && ch != '\n')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        Ok(Self(normalized))
    }

    /// Wrap a password without policy checks
    ///
    /// Login uses this: stored hashes are compared as-is, so a password that
    /// predates a policy change can still sign in.
    pub fn unchecked(raw: String) -> Self {
        let mut raw = raw;
        let normalized = raw.nfkc().collect();
        raw.zeroize();
        Self(normalized)
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Hash with Argon2id (default OWASP parameters: m=19456, t=2, p=1)
    pub fn hash(&self) -> Result<HashedPassword, PasswordHashError> {
        let salt = SaltString::generate(OsRng);
        let hash = Argon2::default()
            .hash_password(self.as_bytes(), &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            hash: hash.to_string(),
        })
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Hashed password in PHC string format
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Create from PHC string (e.g., from database)
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();
        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self { hash })
    }

    /// Get the PHC string for storage
    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    /// Verify a password against this hash
    pub fn verify(&self, password: &ClearTextPassword) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(&self.hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

/// Hash on the blocking pool; Argon2id is deliberately slow
pub async fn hash_blocking(password: ClearTextPassword) -> Result<HashedPassword, PasswordHashError> {
    tokio::task::spawn_blocking(move || password.hash())
        .await
        .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?
}

/// Verify on the blocking pool
pub async fn verify_blocking(hashed: HashedPassword, password: ClearTextPassword) -> bool {
    tokio::task::spawn_blocking(move || hashed.verify(&password))
        .await
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_too_short() {
        let result = ClearTextPassword::new("short".to_string());
        assert!(matches!(
            result,
            Err(PasswordPolicyError::TooShort { min: 8, actual: 5 })
        ));
    }

    #[test]
    fn test_password_too_long() {
        let result = ClearTextPassword::new("a".repeat(129));
        assert!(matches!(result, Err(PasswordPolicyError::TooLong { .. })));
    }

    #[test]
    fn test_password_whitespace_only() {
        assert!(matches!(
            ClearTextPassword::new("          ".to_string()),
            Err(PasswordPolicyError::EmptyOrWhitespace)
        ));
        assert!(matches!(
            ClearTextPassword::new(String::new()),
            Err(PasswordPolicyError::EmptyOrWhitespace)
        ));
    }

    #[test]
    fn test_password_control_character() {
        let result = ClearTextPassword::new("pass\u{0007}word".to_string());
        assert!(matches!(result, Err(PasswordPolicyError::InvalidCharacter)));
    }

    #[test]
    fn test_unicode_password_counts_code_points() {
        // 8 code points, 24 bytes
        assert!(ClearTextPassword::new("パスワードです。".to_string()).is_ok());
    }

    #[test]
    fn test_hash_is_not_plaintext_and_verifies() {
        let password = ClearTextPassword::new("correct horse battery".to_string()).unwrap();
        let hashed = password.hash().unwrap();

        assert_ne!(hashed.as_phc_string(), "correct horse battery");
        assert!(hashed.as_phc_string().starts_with("$argon2id$"));
        assert!(hashed.verify(&password));

        let wrong = ClearTextPassword::new("wrong horse battery".to_string()).unwrap();
        assert!(!hashed.verify(&wrong));
    }

    #[test]
    fn test_same_password_hashes_differ() {
        let password = ClearTextPassword::new("correct horse battery".to_string()).unwrap();
        let a = password.hash().unwrap();
        let b = password.hash().unwrap();
        assert_ne!(a.as_phc_string(), b.as_phc_string());
    }

    #[test]
    fn test_phc_string_roundtrip() {
        let password = ClearTextPassword::new("correct horse battery".to_string()).unwrap();
        let hashed = password.hash().unwrap();
        let restored = HashedPassword::from_phc_string(hashed.as_phc_string()).unwrap();
        assert!(restored.verify(&password));
    }

    #[test]
    fn test_invalid_phc_string() {
        assert!(HashedPassword::from_phc_string("not-a-hash").is_err());
    }

    #[test]
    fn test_debug_redaction() {
        let password = ClearTextPassword::new("correct horse battery".to_string()).unwrap();
        assert!(!format!("{:?}", password).contains("horse"));
    }

    #[tokio::test]
    async fn test_blocking_helpers() {
        let hashed = hash_blocking(ClearTextPassword::unchecked("abc12345".into()))
            .await
            .unwrap();
        assert!(verify_blocking(hashed.clone(), ClearTextPassword::unchecked("abc12345".into())).await);
        assert!(!verify_blocking(hashed, ClearTextPassword::unchecked("abc12346".into())).await);
    }
}
