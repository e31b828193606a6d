//! Upload Image Use Case

use std::sync::Arc;

use axum::body::Bytes;
use serde::Serialize;

use crate::application::signed_url::DEFAULT_EXPIRES_SECS;
use crate::domain::object_key::{ObjectKey, image_extension};
use crate::domain::storage::ObjectStorage;
use crate::error::{MediaError, MediaResult};

/// Per-file limit: 5 MiB
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
/// Files accepted by one multi-upload request
pub const MAX_FILES: usize = 10;

/// One file read from a multipart body
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadedImage {
    pub key: String,
    /// Presigned read URL
    pub url: String,
}

pub struct UploadImageUseCase<S: ObjectStorage> {
    storage: Arc<S>,
}

impl<S: ObjectStorage> UploadImageUseCase<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    pub async fn upload(&self, file: ImageUpload) -> MediaResult<UploadedImage> {
        let content_type = check_image(&file)?;
        let key = ObjectKey::new_image(&image_extension(&content_type, file.file_name.as_deref()));

        self.storage.put_object(&key, &content_type, file.data).await?;
        let url = self.storage.presigned_get_url(&key, DEFAULT_EXPIRES_SECS);

        Ok(UploadedImage {
            key: key.to_string(),
            url,
        })
    }

    /// Files are validated up front, then stored one by one. Files stored
    /// before a storage failure are kept.
    pub async fn upload_many(&self, files: Vec<ImageUpload>) -> MediaResult<Vec<UploadedImage>> {
        if files.is_empty() {
            return Err(MediaError::validation("No files uploaded"));
        }
        if files.len() > MAX_FILES {
            return Err(MediaError::validation(format!(
                "At most {MAX_FILES} files can be uploaded at once"
            )));
        }
        for file in &files {
            check_image(file)?;
        }

        let mut uploaded = Vec::with_capacity(files.len());
        for file in files {
            uploaded.push(self.upload(file).await?);
        }
        Ok(uploaded)
    }
}

/// Content type of a valid image upload
fn check_image(file: &ImageUpload) -> MediaResult<String> {
    let content_type = file
        .content_type
        .as_deref()
        .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase())
        .unwrap_or_default();

    if !content_type.starts_with("image/") {
        return Err(MediaError::UnsupportedMediaType(
            "Only image files are allowed".to_owned(),
        ));
    }
    if file.data.is_empty() {
        return Err(MediaError::validation("File is empty"));
    }
    if file.data.len() > MAX_IMAGE_BYTES {
        return Err(MediaError::PayloadTooLarge(format!(
            "File exceeds the {} MiB limit",
            MAX_IMAGE_BYTES / (1024 * 1024)
        )));
    }
    Ok(content_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(content_type: Option<&str>, len: usize) -> ImageUpload {
        ImageUpload {
            file_name: Some("photo.png".into()),
            content_type: content_type.map(str::to_owned),
            data: Bytes::from(vec![0u8; len]),
        }
    }

    #[test]
    fn test_check_image() {
        assert_eq!(
            check_image(&file(Some("Image/PNG; charset=binary"), 10)).unwrap(),
            "image/png"
        );
        assert!(matches!(
            check_image(&file(Some("application/pdf"), 10)),
            Err(MediaError::UnsupportedMediaType(_))
        ));
        assert!(matches!(
            check_image(&file(None, 10)),
            Err(MediaError::UnsupportedMediaType(_))
        ));
        assert!(matches!(
            check_image(&file(Some("image/png"), 0)),
            Err(MediaError::Validation(_))
        ));
        assert!(matches!(
            check_image(&file(Some("image/png"), MAX_IMAGE_BYTES + 1)),
            Err(MediaError::PayloadTooLarge(_))
        ));
        assert!(check_image(&file(Some("image/png"), MAX_IMAGE_BYTES)).is_ok());
    }
}
