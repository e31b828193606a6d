//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases and configuration
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router, bearer-token middleware
//!
//! ## Features
//! - Registration and username/password login returning an HS256 bearer token
//! - Profile read, update and soft delete for the current user
//! - `require_auth` middleware and `CurrentUser` extractor shared by the
//!   other API crates
//!
//! ## Security Model
//! - Passwords hashed with Argon2id
//! - Tokens are stateless; the signing secret is injected at startup
//! - Password hashes never leave the domain layer (`UserView`)

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthRepository;
pub use presentation::middleware::{AuthGate, CurrentUser, require_auth};
pub use presentation::router::auth_router;
