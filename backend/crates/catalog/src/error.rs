//! Catalog Error Types

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Entity name, e.g. "Product"
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Caller does not own the shop
    #[error("{0}")]
    Forbidden(&'static str),

    #[error("{0}")]
    Duplicate(String),

    /// A referenced shop, category, brand or product does not exist
    #[error("{0}")]
    InvalidReference(String),

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CatalogError {
    pub fn validation(message: impl Into<String>) -> Self {
        CatalogError::Validation(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::NotFound(_) => ErrorKind::NotFound,
            CatalogError::Forbidden(_) => ErrorKind::Forbidden,
            // Duplicate names are a 400, not a 409
            CatalogError::Duplicate(_)
            | CatalogError::InvalidReference(_)
            | CatalogError::Validation(_) => ErrorKind::BadRequest,
            CatalogError::Database(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            CatalogError::Database(_) => AppError::internal("Internal server error"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            CatalogError::Database(e) => {
                tracing::error!(error = %e, "Catalog database error");
            }
            CatalogError::Forbidden(_) => {
                tracing::warn!(error = %self, "Catalog ownership check failed");
            }
            _ => {
                tracing::debug!(error = %self, "Catalog error");
            }
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

/// Map a write failure, turning constraint violations into client errors
pub(crate) fn map_write_error(err: sqlx::Error, duplicate_message: &str) -> CatalogError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return CatalogError::Duplicate(duplicate_message.to_string());
        }
        if db_err.is_foreign_key_violation() {
            return CatalogError::InvalidReference(
                "Referenced record does not exist".to_string(),
            );
        }
        if db_err.is_check_violation() {
            return CatalogError::validation("Value out of range");
        }
    }
    CatalogError::Database(err)
}
