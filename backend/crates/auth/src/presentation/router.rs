//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post},
};
use platform::token::TokenCodec;
use std::sync::Arc;

use crate::domain::repository::UserRepository;
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AuthGate, require_auth};

/// Create the `/users` router with the PostgreSQL repository
pub fn auth_router(repo: PgAuthRepository, tokens: Arc<TokenCodec>) -> Router {
    auth_router_generic(repo, tokens)
}

/// Create the `/users` router for any repository implementation
pub fn auth_router_generic<R>(repo: R, tokens: Arc<TokenCodec>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let gate = AuthGate::new(tokens.clone());
    let state = AuthAppState {
        repo: Arc::new(repo),
        tokens,
    };

    let protected = Router::new()
        .route(
            "/",
            get(handlers::list_users::<R>)
                .put(handlers::update_profile::<R>)
                .delete(handlers::delete_account::<R>),
        )
        .route("/profile", get(handlers::profile::<R>))
        .route_layer(middleware::from_fn_with_state(gate, require_auth));

    Router::new()
        .route("/register", post(handlers::register::<R>))
        .route("/login", post(handlers::login::<R>))
        .merge(protected)
        .with_state(state)
}
