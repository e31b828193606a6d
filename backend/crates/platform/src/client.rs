//! Request header helpers

use axum::http::{HeaderMap, header};

/// Extract the token from an `Authorization: Bearer <token>` header
///
/// Returns `None` when the header is absent, not UTF-8, uses another
/// scheme, or carries a blank token.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
