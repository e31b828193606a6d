//! Catalog Router
//!
//! Reads are public. Writes sit behind [`require_auth`].

use std::sync::Arc;

use auth::{AuthGate, require_auth};
use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::domain::repository::CatalogRepository;
use crate::infra::postgres::PgCatalogRepository;
use crate::presentation::handlers::{self, CatalogAppState};

/// Create the catalog routes with the PostgreSQL repository
pub fn catalog_router(repo: PgCatalogRepository, gate: AuthGate) -> Router {
    catalog_router_generic(repo, gate)
}

/// Create the catalog routes for any repository implementation
pub fn catalog_router_generic<R: CatalogRepository>(repo: R, gate: AuthGate) -> Router {
    let state = CatalogAppState {
        repo: Arc::new(repo),
    };

    let public = Router::new()
        .route("/products", get(handlers::list_products::<R>))
        .route("/products/search", post(handlers::search_products::<R>))
        .route("/products/{id}", get(handlers::get_product::<R>))
        .route("/shops", get(handlers::list_shops::<R>))
        .route("/shops/{id}", get(handlers::get_shop::<R>))
        .route("/categories", get(handlers::list_categories::<R>))
        .route("/categories/{id}", get(handlers::get_category::<R>))
        .route("/brands", get(handlers::list_brands::<R>))
        .route("/brands/{id}", get(handlers::get_brand::<R>))
        .route("/banners", get(handlers::list_banners::<R>))
        .route("/banners/{id}", get(handlers::get_banner::<R>));

    let protected = Router::new()
        .route("/products", post(handlers::create_product::<R>))
        .route(
            "/products/{id}",
            put(handlers::update_product::<R>).delete(handlers::delete_product::<R>),
        )
        .route("/products/{id}/ratings", post(handlers::rate_product::<R>))
        .route("/shops", post(handlers::create_shop::<R>))
        .route(
            "/shops/{id}",
            put(handlers::update_shop::<R>).delete(handlers::delete_shop::<R>),
        )
        .route("/categories", post(handlers::create_category::<R>))
        .route(
            "/categories/{id}",
            put(handlers::update_category::<R>).delete(handlers::delete_category::<R>),
        )
        .route("/brands", post(handlers::create_brand::<R>))
        .route(
            "/brands/{id}",
            put(handlers::update_brand::<R>).delete(handlers::delete_brand::<R>),
        )
        .route("/banners", post(handlers::create_banner::<R>))
        .route(
            "/banners/{id}",
            put(handlers::update_banner::<R>).delete(handlers::delete_banner::<R>),
        )
        .route_layer(middleware::from_fn_with_state(gate, require_auth));

    Router::new()
        .merge(public)
        .merge(protected)
        .with_state(state)
}
