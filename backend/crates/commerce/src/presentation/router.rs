//! Commerce Router

use std::sync::Arc;

use auth::{AuthGate, require_auth};
use axum::{
    Router, middleware,
    routing::{get, patch},
};

use crate::domain::repository::CommerceRepository;
use crate::infra::postgres::PgCommerceRepository;
use crate::presentation::handlers::{self, CommerceAppState};

/// Create the `/carts` and `/orders` routes with the PostgreSQL repository
pub fn commerce_router(repo: PgCommerceRepository, gate: AuthGate) -> Router {
    commerce_router_generic(repo, gate)
}

/// Create the `/carts` and `/orders` routes for any repository
pub fn commerce_router_generic<R: CommerceRepository>(repo: R, gate: AuthGate) -> Router {
    let state = CommerceAppState {
        repo: Arc::new(repo),
    };

    Router::new()
        .route(
            "/carts",
            get(handlers::list_cart::<R>).post(handlers::add_to_cart::<R>),
        )
        .route(
            "/carts/{id}",
            patch(handlers::set_cart_quantity::<R>).delete(handlers::remove_cart_item::<R>),
        )
        .route(
            "/orders",
            get(handlers::list_orders::<R>).post(handlers::place_order::<R>),
        )
        .route(
            "/orders/{id}",
            get(handlers::get_order::<R>).delete(handlers::delete_order::<R>),
        )
        .route_layer(middleware::from_fn_with_state(gate, require_auth))
        .with_state(state)
}
