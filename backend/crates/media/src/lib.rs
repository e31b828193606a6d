//! Media Backend Module
//!
//! Image upload to S3-compatible object storage and presigned read URLs.
//!
//! - `domain/` - Object keys and the storage trait
//! - `application/` - Configuration and upload / signing / delete use cases
//! - `infra/` - SigV4 query presigning and the S3 adapter
//! - `presentation/` - HTTP handlers, DTOs, router

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

pub use application::config::MediaConfig;
pub use error::{MediaError, MediaResult};
pub use infra::s3::S3Storage;
pub use presentation::router::media_router;
