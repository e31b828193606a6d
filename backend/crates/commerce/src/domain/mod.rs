//! Domain Layer

pub mod entity;
pub mod repository;

pub use repository::{CartRepository, CommerceRepository, OrderRepository};
