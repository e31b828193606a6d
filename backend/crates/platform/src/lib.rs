//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Digests for request signing (SHA-256, HMAC-SHA256)
//! - Password hashing (Argon2id)
//! - Signed bearer tokens (HS256 JWT)
//! - Bearer token header parsing
//! - Environment configuration helpers

pub mod client;
pub mod config;
pub mod crypto;
pub mod password;
pub mod token;
