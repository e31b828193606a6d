//! Media Router

use std::sync::Arc;

use auth::{AuthGate, require_auth};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
};

use crate::application::{MAX_FILES, MAX_IMAGE_BYTES};
use crate::domain::storage::ObjectStorage;
use crate::presentation::handlers::{self, MediaAppState};

/// Room for multipart boundaries and headers on top of the file bytes
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create the `/images` routes. Signed URLs are public; uploads and deletes
/// need a token.
pub fn media_router<S>(storage: S, gate: AuthGate) -> Router
where
    S: ObjectStorage + Send + Sync + 'static,
{
    let state = MediaAppState {
        storage: Arc::new(storage),
    };

    let protected = Router::new()
        .route("/images/upload", post(handlers::upload::<S>))
        .route("/images/upload-multiple", post(handlers::upload_many::<S>))
        .route("/images", delete(handlers::delete_image::<S>))
        .layer(DefaultBodyLimit::max(
            MAX_FILES * MAX_IMAGE_BYTES + MULTIPART_OVERHEAD,
        ))
        .route_layer(middleware::from_fn_with_state(gate, require_auth));

    Router::new()
        .route("/images/signed-url", get(handlers::signed_url::<S>))
        .merge(protected)
        .with_state(state)
}
