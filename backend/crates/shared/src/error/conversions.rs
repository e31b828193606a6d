//! Error conversions
//!
//! Database errors that reach the kernel directly, and the single HTTP
//! envelope every route responds with.

use super::app_error::AppError;

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AppError::not_found("Record not found").with_source(err),
            sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
                AppError::service_unavailable("Database unavailable").with_source(err)
            }
            sqlx::Error::Database(db_err) => {
                // https://www.postgresql.org/docs/current/errcodes-appendix.html
                let app_err = match db_err.code().as_deref() {
                    Some("23505") => AppError::bad_request("Duplicate value"),
                    Some("23503") => AppError::bad_request("Referenced record does not exist"),
                    Some("23514") => AppError::bad_request("Check constraint violation"),
                    Some("53300" | "57P01" | "57P03") => {
                        AppError::service_unavailable("Database unavailable")
                    }
                    _ => AppError::internal("Database error"),
                };
                app_err.with_source(err)
            }
            _ => AppError::internal("Database error").with_source(err),
        }
    }
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // One envelope for every route. `message` is the field clients read.
        let body = serde_json::json!({
            "type": format!("https://httpstatuses.io/{}", self.status_code()),
            "title": self.kind().as_str(),
            "status": self.status_code(),
            "message": self.message(),
            "action": self.action(),
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    #[allow(unused_imports)]
    use super::*;

    #[cfg(feature = "sqlx")]
    #[test]
    fn test_sqlx_error_conversion() {
        use crate::error::kind::ErrorKind;

        let app_err: AppError = sqlx::Error::RowNotFound.into();
        assert_eq!(app_err.kind(), ErrorKind::NotFound);

        let app_err: AppError = sqlx::Error::PoolTimedOut.into();
        assert_eq!(app_err.status_code(), 503);
        assert_eq!(app_err.message(), "Database unavailable");
    }

    #[cfg(feature = "axum")]
    #[tokio::test]
    async fn test_into_response_envelope() {
        use axum::response::IntoResponse;

        let response = AppError::unauthorized("Token missing!")
            .with_action("Log in again")
            .into_response();
        assert_eq!(response.status().as_u16(), 401);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Token missing!");
        assert_eq!(body["status"], 401);
        assert_eq!(body["title"], "Unauthorized");
        assert_eq!(body["action"], "Log in again");
        assert_eq!(body["type"], "https://httpstatuses.io/401");
    }
}
