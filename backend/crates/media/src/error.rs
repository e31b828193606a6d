//! Media Error Types

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

pub type MediaResult<T> = Result<T, MediaError>;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{0}")]
    UnsupportedMediaType(String),

    /// The object store answered with a non-success status
    #[error("Storage {operation} failed with status {status}")]
    Storage { operation: &'static str, status: u16 },

    #[error("Storage unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid storage configuration: {0}")]
    Config(String),
}

impl MediaError {
    pub fn validation(message: impl Into<String>) -> Self {
        MediaError::Validation(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            MediaError::Validation(_) => ErrorKind::BadRequest,
            MediaError::PayloadTooLarge(_) => ErrorKind::PayloadTooLarge,
            MediaError::UnsupportedMediaType(_) => ErrorKind::UnsupportedMediaType,
            MediaError::Storage { .. } | MediaError::Config(_) => ErrorKind::InternalServerError,
            MediaError::Transport(_) => ErrorKind::ServiceUnavailable,
        }
    }

    /// Storage details stay in the logs
    pub fn to_app_error(&self) -> AppError {
        match self {
            MediaError::Storage { .. } | MediaError::Config(_) => {
                AppError::internal("Storage request failed")
            }
            MediaError::Transport(_) => AppError::service_unavailable("Storage service unavailable")
                .with_action("Try again later"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            MediaError::Storage { .. } | MediaError::Config(_) => {
                tracing::error!(error = %self, "Media storage error");
            }
            MediaError::Transport(e) => {
                tracing::error!(error = %e, "Object store unreachable");
            }
            _ => {
                tracing::debug!(error = %self, "Media request rejected");
            }
        }
    }
}

impl IntoResponse for MediaError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
