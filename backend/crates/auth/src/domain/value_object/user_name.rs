//! User Name Value Object
//!
//! Public handle used for login and display.
//!
//! ## Invariants
//! - 3 to 30 characters after NFKC normalization and trimming
//! - ASCII letters, digits, `_`, `.`, `-` only
//! - At least one letter or digit

use kernel::error::app_error::{AppError, AppResult};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

pub const USER_NAME_MIN_LENGTH: usize = 3;
pub const USER_NAME_MAX_LENGTH: usize = 30;

const ALLOWED_SPECIAL_CHARS: &[char] = &['_', '.', '-'];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserName(String);

impl UserName {
    pub fn new(input: impl AsRef<str>) -> AppResult<Self> {
        let normalized: String = input.as_ref().nfkc().collect();
        let name = normalized.trim();

        if name.is_empty() {
            return Err(AppError::bad_request("Username cannot be empty"));
        }

        let length = name.chars().count();
        if length < USER_NAME_MIN_LENGTH {
            return Err(AppError::bad_request(format!(
                "Username must be at least {} characters",
                USER_NAME_MIN_LENGTH
            )));
        }
        if length > USER_NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Username must be at most {} characters",
                USER_NAME_MAX_LENGTH
            )));
        }

        if let Some(ch) = name
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && !ALLOWED_SPECIAL_CHARS.contains(c))
        {
            return Err(AppError::bad_request(format!(
                "Username contains invalid character '{ch}'"
            ))
            .with_action("Use letters, digits, '_', '.' or '-'"));
        }

        if !name.chars().any(|c| c.is_ascii_alphanumeric()) {
            return Err(AppError::bad_request(
                "Username must contain at least one letter or digit",
            ));
        }

        Ok(Self(name.to_owned()))
    }

    /// Wrap a value read from the database
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        for name in ["alice", "Bob_99", "a.b-c", "abc"] {
            assert_eq!(UserName::new(name).unwrap().as_str(), name);
        }
    }

    #[test]
    fn test_name_is_trimmed_and_normalized() {
        // Fullwidth letters normalize to ASCII under NFKC
        assert_eq!(UserName::new("  ａｌｉｃｅ ").unwrap().as_str(), "alice");
    }

    #[test]
    fn test_invalid_names() {
        for name in ["", "  ", "ab", "a b c", "___", "name!", &"x".repeat(31)] {
            assert!(UserName::new(name).is_err(), "accepted {name:?}");
        }
    }
}
