//! Delete Image Use Case

use std::sync::Arc;

use crate::domain::object_key::ObjectKey;
use crate::domain::storage::ObjectStorage;
use crate::error::MediaResult;

pub struct DeleteImageUseCase<S: ObjectStorage> {
    storage: Arc<S>,
}

impl<S: ObjectStorage> DeleteImageUseCase<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    pub async fn execute(&self, key: Option<&str>) -> MediaResult<()> {
        let key = ObjectKey::parse(key.unwrap_or_default())?;
        self.storage.delete_object(&key).await
    }
}
