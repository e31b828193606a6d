//! Request extractors
//!
//! Drop-in replacements for `axum::Json`, `axum::extract::Query` and
//! `axum::extract::Path` whose rejections are rendered as [`AppError`]
//! instead of plain text.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts};

use crate::error::app_error::AppError;

#[derive(Debug, Clone, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(Debug, Clone, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

#[derive(Debug, Clone, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let context = match &rejection {
            JsonRejection::MissingJsonContentType(_) => {
                return AppError::unsupported_media_type("Expected `Content-Type: application/json`")
                    .with_source(rejection);
            }
            JsonRejection::JsonSyntaxError(_) => "Malformed JSON body",
            JsonRejection::JsonDataError(_) => "Invalid request body",
            _ => "Invalid request body",
        };
        AppError::bad_request(format!("{}: {}", context, rejection.body_text()))
            .with_source(rejection)
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::bad_request(format!("Invalid query string: {}", rejection.body_text()))
            .with_source(rejection)
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::bad_request(format!("Invalid path parameter: {}", rejection.body_text()))
            .with_source(rejection)
    }
}
