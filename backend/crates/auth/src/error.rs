//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` envelope.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::token::TokenError;
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("User not found")]
    UserNotFound,

    /// Username or email already taken by another live user
    #[error("{0}")]
    DuplicateUser(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token missing!")]
    TokenMissing,

    #[error("Token invalid!")]
    TokenInvalid,

    #[error("{0}")]
    Validation(AppError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn duplicate() -> Self {
        AuthError::DuplicateUser("Username or email already exists".to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::UserNotFound => ErrorKind::NotFound,
            // Conflicts are a 400, not a 409
            AuthError::DuplicateUser(_) => ErrorKind::BadRequest,
            AuthError::InvalidCredentials | AuthError::TokenMissing => ErrorKind::Unauthorized,
            AuthError::TokenInvalid => ErrorKind::Forbidden,
            AuthError::Validation(e) => e.kind(),
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError. Server-side detail stays in the logs.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::Validation(e) => {
                let err = AppError::new(e.kind(), e.message().to_owned());
                match e.action() {
                    Some(action) => err.with_action(action.to_owned()),
                    None => err,
                }
            }
            AuthError::Database(_) | AuthError::Internal(_) => {
                AppError::internal("Internal server error")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::TokenInvalid => {
                tracing::warn!("Rejected invalid bearer token");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        if err.kind().is_client_error() {
            AuthError::Validation(err)
        } else {
            AuthError::Internal(err.to_string())
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid | TokenError::Expired => AuthError::TokenInvalid,
            TokenError::MissingSecret | TokenError::Signing(_) => {
                AuthError::Internal(err.to_string())
            }
        }
    }
}

/// Map a write failure, turning unique violations into `DuplicateUser`
pub(crate) fn map_write_error(err: sqlx::Error) -> AuthError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => AuthError::duplicate(),
        _ => AuthError::Database(err),
    }
}
