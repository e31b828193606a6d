//! Auth Middleware
//!
//! Bearer-token gate for protected routes. Stateless: the token alone
//! identifies the caller.

use axum::body::Body;
use axum::extract::{FromRequestParts, State};
use axum::http::{HeaderMap, Request, request::Parts};
use axum::middleware::Next;
use axum::response::Response;
use kernel::id::UserId;
use platform::client::extract_bearer_token;
use platform::token::TokenCodec;
use std::sync::Arc;

use crate::error::{AuthError, AuthResult};

/// Authenticated caller, inserted into request extensions by [`require_auth`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: String,
}

/// Middleware state
#[derive(Clone)]
pub struct AuthGate {
    tokens: Arc<TokenCodec>,
}

impl AuthGate {
    pub fn new(tokens: Arc<TokenCodec>) -> Self {
        Self { tokens }
    }

    /// Missing token: 401. Present but bad or expired: 403.
    pub fn authenticate(&self, headers: &HeaderMap) -> AuthResult<CurrentUser> {
        let token = extract_bearer_token(headers).ok_or(AuthError::TokenMissing)?;
        let claims = self.tokens.verify(token)?;

        Ok(CurrentUser {
            id: UserId::new(claims.sub),
            email: claims.email,
        })
    }
}

/// Middleware that requires a valid bearer token
pub async fn require_auth(
    State(gate): State<AuthGate>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let user = gate.authenticate(req.headers())?;
    tracing::debug!(user_id = %user.id, "Authenticated request");

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AuthError::TokenMissing)
    }
}
