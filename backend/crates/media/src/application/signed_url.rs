//! Signed URL Use Case

use std::sync::Arc;

use serde::Serialize;

use crate::domain::object_key::ObjectKey;
use crate::domain::storage::ObjectStorage;
use crate::error::{MediaError, MediaResult};
use crate::infra::sigv4::MAX_EXPIRES_SECS;

/// One hour
pub const DEFAULT_EXPIRES_SECS: u32 = 3600;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUrl {
    pub url: String,
    pub expires_in: u32,
}

pub struct SignedUrlUseCase<S: ObjectStorage> {
    storage: Arc<S>,
}

impl<S: ObjectStorage> SignedUrlUseCase<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    pub fn execute(&self, key: Option<&str>, expires_in: Option<u32>) -> MediaResult<SignedUrl> {
        let key = ObjectKey::parse(key.unwrap_or_default())?;
        let expires_in = expires_in.unwrap_or(DEFAULT_EXPIRES_SECS);
        if expires_in == 0 || expires_in > MAX_EXPIRES_SECS {
            return Err(MediaError::validation(format!(
                "expiresIn must be between 1 and {MAX_EXPIRES_SECS} seconds"
            )));
        }

        Ok(SignedUrl {
            url: self.storage.presigned_get_url(&key, expires_in),
            expires_in,
        })
    }
}
