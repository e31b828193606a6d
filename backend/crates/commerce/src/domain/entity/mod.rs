//! Entities

pub mod cart;
pub mod order;
pub mod variant;
