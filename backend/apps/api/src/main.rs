//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use auth::{AuthConfig, AuthGate, PgAuthRepository, auth_router};
use axum::{
    Json, Router,
    extract::State,
    http::{Method, header},
    routing::get,
};
use catalog::{PgCatalogRepository, catalog_router};
use commerce::{PgCommerceRepository, commerce_router};
use media::{MediaConfig, S3Storage, media_router};
use serde_json::{Value, json};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kernel::error::app_error::{AppError, AppResult};

use crate::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,auth=info,catalog=info,commerce=info,media=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let api_config = ApiConfig::from_env()?;
    let auth_config = AuthConfig::from_env()?;
    let media_config = MediaConfig::from_env()?;

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(api_config.max_connections)
        .connect(&api_config.database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let tokens = Arc::new(auth_config.token_codec()?);
    let gate = AuthGate::new(tokens.clone());
    let storage = S3Storage::new(&media_config)?;

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(api_config.frontend_origins.clone())
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    let resources = Router::new()
        .merge(catalog_router(PgCatalogRepository::new(pool.clone()), gate.clone()))
        .merge(commerce_router(PgCommerceRepository::new(pool.clone()), gate.clone()))
        .merge(media_router(storage, gate));

    // Build router
    let app = Router::new()
        .route("/api/health", get(health).with_state(pool.clone()))
        .nest("/api/users", auth_router(PgAuthRepository::new(pool), tokens))
        .nest("/api", resources)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        );

    // Start server
    let addr = api_config.addr;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// GET /api/health
async fn health(State(pool): State<PgPool>) -> AppResult<Json<Value>> {
    if let Err(e) = sqlx::query("SELECT 1").execute(&pool).await {
        tracing::error!(error = %e, "Health check failed");
        return Err(AppError::from(e));
    }
    Ok(Json(json!({ "status": "ok" })))
}
