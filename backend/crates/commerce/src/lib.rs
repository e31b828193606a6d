//! Commerce Backend Module
//!
//! Shopping carts and orders.
//!
//! - `domain/` - Cart and order entities, order pricing, repository traits
//! - `application/` - Cart and order use cases
//! - `infra/` - PostgreSQL repository (order placement is one transaction)
//! - `presentation/` - HTTP handlers, DTOs, router

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


pub use error::{CommerceError, CommerceResult};
pub use infra::postgres::PgCommerceRepository;
pub use presentation::router::commerce_router;
