//! Domain Layer
//!
//! Contains entities, the product search filter, and repository traits.

pub mod entity;
pub mod filter;
pub mod repository;

pub use filter::{IdList, ProductFilter, ProductQuery};
pub use repository::{
    BannerRepository, BrandRepository, CatalogRepository, CategoryRepository, ProductRepository,
    ShopRepository,
};
