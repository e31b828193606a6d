//! Catalog Backend Module
//!
//! Shops, categories, brands, products (images, variants, ratings) and
//! banners.
//!
//! - `domain/` - Entities, product search filter, repository traits
//! - `application/` - Use cases (validation and ownership rules)
//! - `infra/` - PostgreSQL repository and the product search query builder
//! - `presentation/` - HTTP handlers, DTOs, router

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

pub use error::{CatalogError, CatalogResult};
pub use infra::postgres::PgCatalogRepository;
pub use presentation::router::catalog_router;
