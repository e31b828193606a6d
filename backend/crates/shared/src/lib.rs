//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of domain vocabulary:
//! - Common error types and result aliases
//! - Typed integer IDs for marketplace entities
//! - Pagination parameters shared by list endpoints
//! - JSON/query extractors whose rejections use the `AppError` envelope
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all domains.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
#[cfg(feature = "axum")]
pub mod extract;
pub mod id;
pub mod page;
