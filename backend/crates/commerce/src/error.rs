//! Commerce Error Types

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use kernel::id::VariantId;
use thiserror::Error;

pub type CommerceResult<T> = Result<T, CommerceError>;

#[derive(Debug, Error)]
pub enum CommerceError {
    /// Entity name, e.g. "Order"
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("Insufficient stock for variant {variant_id}: {available} available")]
    InsufficientStock { variant_id: VariantId, available: i32 },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CommerceError {
    pub fn validation(message: impl Into<String>) -> Self {
        CommerceError::Validation(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CommerceError::NotFound(_) => ErrorKind::NotFound,
            CommerceError::Validation(_) => ErrorKind::BadRequest,
            CommerceError::InsufficientStock { .. } => ErrorKind::Conflict,
            CommerceError::Database(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            CommerceError::Database(_) => AppError::internal("Internal server error"),
            CommerceError::InsufficientStock { .. } => AppError::new(self.kind(), self.to_string())
                .with_action("Reduce the quantity or remove the item"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            CommerceError::Database(e) => {
                tracing::error!(error = %e, "Commerce database error");
            }
            CommerceError::InsufficientStock {
                variant_id,
                available,
            } => {
                tracing::info!(variant_id = %variant_id, available, "Order rejected for stock");
            }
            _ => {
                tracing::debug!(error = %self, "Commerce error");
            }
        }
    }
}

impl IntoResponse for CommerceError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

/// Map a write failure; check and foreign key violations are client errors
pub(crate) fn map_write_error(err: sqlx::Error) -> CommerceError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_foreign_key_violation() {
            return CommerceError::NotFound("Variant");
        }
        if db_err.is_check_violation() {
            return CommerceError::validation("Value out of range");
        }
    }
    CommerceError::Database(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let stock = CommerceError::InsufficientStock {
            variant_id: VariantId::new(4),
            available: 1,
        };
        assert_eq!(stock.to_app_error().status_code(), 409);
        assert_eq!(
            stock.to_string(),
            "Insufficient stock for variant 4: 1 available"
        );

        assert_eq!(
            CommerceError::NotFound("Order").into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CommerceError::validation("quantity must be at least 1")
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_database_detail_is_hidden() {
        let err = CommerceError::Database(sqlx::Error::PoolTimedOut);
        assert_eq!(err.to_app_error().message(), "Internal server error");
    }
}
