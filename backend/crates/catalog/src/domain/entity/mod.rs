//! Entities

pub mod banner;
pub mod brand;
pub mod category;
pub mod product;
pub mod shop;
