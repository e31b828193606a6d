use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::{Body, Bytes, to_bytes};
use axum::http::{Request, StatusCode, header};
use chrono::Duration;
use platform::token::TokenCodec;
use secrecy::SecretString;
use tower::ServiceExt;

use auth::AuthGate;

use crate::application::{
    DeleteImageUseCase, ImageUpload, MAX_FILES, SignedUrlUseCase, UploadImageUseCase,
};
use crate::domain::object_key::ObjectKey;
use crate::domain::storage::ObjectStorage;
use crate::error::{MediaError, MediaResult};
use crate::presentation::router::media_router;

// ============================================================================
// In-memory storage
// ============================================================================

#[derive(Clone, Default)]
struct InMemoryStorage {
    objects: Arc<Mutex<HashMap<String, (String, Bytes)>>>,
    fail_after: Option<usize>,
}

impl InMemoryStorage {
    fn failing_after(puts: usize) -> Self {
        Self {
            fail_after: Some(puts),
            ..Self::default()
        }
    }

    fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

impl ObjectStorage for InMemoryStorage {
    async fn put_object(&self, key: &ObjectKey, content_type: &str, body: Bytes) -> MediaResult<()> {
        let mut objects = self.objects.lock().unwrap();
        if self.fail_after.is_some_and(|n| objects.len() >= n) {
            return Err(MediaError::Storage {
                operation: "upload",
                status: 500,
            });
        }
        objects.insert(key.to_string(), (content_type.to_owned(), body));
        Ok(())
    }

    async fn delete_object(&self, key: &ObjectKey) -> MediaResult<()> {
        self.objects.lock().unwrap().remove(key.as_str());
        Ok(())
    }

    fn presigned_get_url(&self, key: &ObjectKey, expires_in_secs: u32) -> String {
        format!("https://storage.test/{key}?X-Amz-Expires={expires_in_secs}")
    }
}

fn png(len: usize) -> ImageUpload {
    ImageUpload {
        file_name: Some("cat.png".into()),
        content_type: Some("image/png".into()),
        data: Bytes::from(vec![7u8; len]),
    }
}

// ============================================================================
// Use cases
// ============================================================================

#[tokio::test]
async fn upload_stores_under_fresh_image_key() {
    let storage = InMemoryStorage::default();
    let image = UploadImageUseCase::new(Arc::new(storage.clone()))
        .upload(png(16))
        .await
        .unwrap();

    assert!(image.key.starts_with("images/"));
    assert!(image.key.ends_with(".png"));
    assert!(image.url.contains(&image.key));
    assert!(image.url.ends_with("X-Amz-Expires=3600"));

    let objects = storage.objects.lock().unwrap();
    let (content_type, body) = &objects[&image.key];
    assert_eq!(content_type, "image/png");
    assert_eq!(body.len(), 16);
}

#[tokio::test]
async fn upload_many_rejects_before_storing_anything() {
    let storage = InMemoryStorage::default();
    let use_case = UploadImageUseCase::new(Arc::new(storage.clone()));

    let mut files = vec![png(4), png(4)];
    files.push(ImageUpload {
        content_type: Some("text/plain".into()),
        ..png(4)
    });
    let err = use_case.upload_many(files).await.unwrap_err();
    assert!(matches!(err, MediaError::UnsupportedMediaType(_)));
    assert_eq!(storage.len(), 0);

    let too_many = (0..=MAX_FILES).map(|_| png(1)).collect();
    let err = use_case.upload_many(too_many).await.unwrap_err();
    assert!(matches!(err, MediaError::Validation(_)));

    let err = use_case.upload_many(Vec::new()).await.unwrap_err();
    assert!(matches!(err, MediaError::Validation(_)));
}

#[tokio::test]
async fn upload_many_keeps_files_stored_before_a_failure() {
    let storage = InMemoryStorage::failing_after(2);
    let err = UploadImageUseCase::new(Arc::new(storage.clone()))
        .upload_many(vec![png(1), png(1), png(1)])
        .await
        .unwrap_err();

    assert!(matches!(err, MediaError::Storage { .. }));
    assert_eq!(storage.len(), 2);
}

#[test]
fn signed_url_validates_key_and_expiry() {
    let use_case = SignedUrlUseCase::new(Arc::new(InMemoryStorage::default()));

    let signed = use_case.execute(Some("images/a.png"), None).unwrap();
    assert_eq!(signed.expires_in, 3600);
    assert_eq!(
        signed.url,
        "https://storage.test/images/a.png?X-Amz-Expires=3600"
    );

    assert_eq!(use_case.execute(Some("images/a.png"), Some(60)).unwrap().expires_in, 60);
    assert!(use_case.execute(None, None).is_err());
    assert!(use_case.execute(Some("../secret"), None).is_err());
    assert!(use_case.execute(Some("images/a.png"), Some(0)).is_err());
    assert!(use_case.execute(Some("images/a.png"), Some(604_801)).is_err());
}

#[tokio::test]
async fn delete_removes_object_and_tolerates_missing_keys() {
    let storage = InMemoryStorage::default();
    let image = UploadImageUseCase::new(Arc::new(storage.clone()))
        .upload(png(2))
        .await
        .unwrap();

    let use_case = DeleteImageUseCase::new(Arc::new(storage.clone()));
    use_case.execute(Some(&image.key)).await.unwrap();
    assert_eq!(storage.len(), 0);
    use_case.execute(Some(&image.key)).await.unwrap();

    let err = use_case.execute(Some("")).await.unwrap_err();
    assert!(matches!(err, MediaError::Validation(_)));
}

// ============================================================================
// HTTP
// ============================================================================

const SECRET: &str = "media-test-secret-media-test-secret";
const BOUNDARY: &str = "XBOUNDARYX";

fn tokens() -> Arc<TokenCodec> {
    Arc::new(TokenCodec::new(&SecretString::from(SECRET.to_owned()), Duration::days(1)).unwrap())
}

fn app(storage: InMemoryStorage) -> axum::Router {
    axum::Router::new().nest("/api", media_router(storage, AuthGate::new(tokens())))
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn multipart_body(field: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"cat.png\"\r\nContent-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(token: Option<&str>, body: Vec<u8>) -> Request<Body> {
    let mut builder = Request::post("/api/images/upload").header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body)).unwrap()
}

#[tokio::test]
async fn upload_without_token_is_unauthorized() {
    let storage = InMemoryStorage::default();
    let response = app(storage.clone())
        .oneshot(upload_request(None, multipart_body("file", "image/png", b"png")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(storage.len(), 0);
}

#[tokio::test]
async fn upload_with_token_creates_object() {
    let storage = InMemoryStorage::default();
    let token = tokens().issue(3, "dana@example.com").unwrap();
    let response = app(storage.clone())
        .oneshot(upload_request(
            Some(&token),
            multipart_body("file", "image/png", b"\x89PNG"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert!(body["key"].as_str().unwrap().starts_with("images/"));
    assert!(body["url"].as_str().unwrap().contains("X-Amz-Expires=3600"));
    assert_eq!(storage.len(), 1);
}

#[tokio::test]
async fn upload_of_non_image_is_unsupported() {
    let token = tokens().issue(3, "dana@example.com").unwrap();
    let response = app(InMemoryStorage::default())
        .oneshot(upload_request(
            Some(&token),
            multipart_body("file", "application/pdf", b"%PDF"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn signed_url_is_public_and_defaults_to_one_hour() {
    let response = app(InMemoryStorage::default())
        .oneshot(
            Request::get("/api/images/signed-url?key=images/a.png")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["expiresIn"], 3600);

    let response = app(InMemoryStorage::default())
        .oneshot(
            Request::get("/api/images/signed-url?key=../etc/passwd")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
