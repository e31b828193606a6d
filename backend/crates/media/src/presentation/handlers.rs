//! HTTP Handlers

use std::sync::Arc;

use auth::CurrentUser;
use axum::Json;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use kernel::extract::AppQuery;

use crate::application::{
    DeleteImageUseCase, ImageUpload, MAX_FILES, SignedUrl, SignedUrlUseCase, UploadImageUseCase,
    UploadedImage,
};
use crate::domain::storage::ObjectStorage;
use crate::error::{MediaError, MediaResult};
use crate::presentation::dto::{KeyQuery, MessageResponse, SignedUrlQuery};

pub struct MediaAppState<S> {
    pub storage: Arc<S>,
}

impl<S> Clone for MediaAppState<S> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
        }
    }
}

impl From<MultipartRejection> for MediaError {
    fn from(rejection: MultipartRejection) -> Self {
        MediaError::validation(rejection.body_text())
    }
}

impl From<MultipartError> for MediaError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return MediaError::PayloadTooLarge("Request body is too large".to_owned());
        }
        MediaError::validation(err.body_text())
    }
}

/// Collect up to `max` files sent under `field`; other fields are skipped
async fn read_files(
    multipart: &mut Multipart,
    field: &str,
    max: usize,
) -> MediaResult<Vec<ImageUpload>> {
    let mut files = Vec::new();
    while let Some(part) = multipart.next_field().await? {
        if part.name() != Some(field) {
            continue;
        }
        if files.len() == max {
            return Err(MediaError::validation(format!(
                "At most {max} files can be uploaded at once"
            )));
        }

        let file_name = part.file_name().map(str::to_owned);
        let content_type = part.content_type().map(str::to_owned);
        let data = part.bytes().await?;
        files.push(ImageUpload {
            file_name,
            content_type,
            data,
        });
    }
    Ok(files)
}

/// POST /api/images/upload
pub async fn upload<S>(
    State(state): State<MediaAppState<S>>,
    user: CurrentUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> MediaResult<(StatusCode, Json<UploadedImage>)>
where
    S: ObjectStorage + Send + Sync + 'static,
{
    let mut multipart = multipart?;
    let file = read_files(&mut multipart, "file", 1)
        .await?
        .pop()
        .ok_or_else(|| MediaError::validation("No file uploaded"))?;

    let image = UploadImageUseCase::new(state.storage.clone())
        .upload(file)
        .await?;
    tracing::debug!(user_id = %user.id, key = %image.key, "Image uploaded");
    Ok((StatusCode::CREATED, Json(image)))
}

/// POST /api/images/upload-multiple
pub async fn upload_many<S>(
    State(state): State<MediaAppState<S>>,
    user: CurrentUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> MediaResult<(StatusCode, Json<Vec<UploadedImage>>)>
where
    S: ObjectStorage + Send + Sync + 'static,
{
    let mut multipart = multipart?;
    let files = read_files(&mut multipart, "files", MAX_FILES).await?;

    let images = UploadImageUseCase::new(state.storage.clone())
        .upload_many(files)
        .await?;
    tracing::debug!(user_id = %user.id, count = images.len(), "Images uploaded");
    Ok((StatusCode::CREATED, Json(images)))
}

/// GET /api/images/signed-url
pub async fn signed_url<S>(
    State(state): State<MediaAppState<S>>,
    AppQuery(query): AppQuery<SignedUrlQuery>,
) -> MediaResult<Json<SignedUrl>>
where
    S: ObjectStorage + Send + Sync + 'static,
{
    let signed = SignedUrlUseCase::new(state.storage.clone())
        .execute(query.key.as_deref(), query.expires_in)?;
    Ok(Json(signed))
}

/// DELETE /api/images
pub async fn delete_image<S>(
    State(state): State<MediaAppState<S>>,
    _user: CurrentUser,
    AppQuery(query): AppQuery<KeyQuery>,
) -> MediaResult<Json<MessageResponse>>
where
    S: ObjectStorage + Send + Sync + 'static,
{
    DeleteImageUseCase::new(state.storage.clone())
        .execute(query.key.as_deref())
        .await?;
    Ok(Json(MessageResponse {
        message: "Image deleted successfully".to_owned(),
    }))
}
