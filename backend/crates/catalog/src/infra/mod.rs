//! Infrastructure Layer
//!
//! PostgreSQL repository and the product search query builder.

pub mod postgres;
pub mod product_query;

pub use postgres::PgCatalogRepository;
