//! Object Storage Trait

use axum::body::Bytes;

use crate::domain::object_key::ObjectKey;
use crate::error::MediaResult;

#[trait_variant::make(ObjectStorage: Send)]
pub trait LocalObjectStorage {
    async fn put_object(&self, key: &ObjectKey, content_type: &str, body: Bytes) -> MediaResult<()>;

    /// Deleting a missing key succeeds
    async fn delete_object(&self, key: &ObjectKey) -> MediaResult<()>;

    /// Time-limited read URL; signing is local and never touches the network
    fn presigned_get_url(&self, key: &ObjectKey, expires_in_secs: u32) -> String;
}
