//! Repository Traits
//!
//! Soft-deleted rows are invisible to every method here.

use kernel::id::{BannerId, BrandId, CategoryId, ProductId, ShopId, UserId};
use kernel::page::Page;

use crate::domain::entity::{
    banner::{Banner, BannerChanges, NewBanner},
    brand::{Brand, BrandFields},
    category::{Category, CategoryFields},
    product::{NewProduct, NewRating, ProductChanges, ProductRating, ProductView},
    shop::{NewShop, Shop, ShopChanges},
};
use crate::domain::filter::ProductFilter;
use crate::error::CatalogResult;

#[trait_variant::make(ShopRepository: Send)]
pub trait LocalShopRepository {
    async fn list_shops(&self) -> CatalogResult<Vec<Shop>>;

    async fn find_shop(&self, id: ShopId) -> CatalogResult<Option<Shop>>;

    async fn create_shop(&self, shop: &NewShop) -> CatalogResult<Shop>;

    /// `NotFound` when no live row matches
    async fn update_shop(&self, id: ShopId, changes: &ShopChanges) -> CatalogResult<Shop>;

    /// Also hides the shop's products from search
    async fn delete_shop(&self, id: ShopId) -> CatalogResult<()>;
}

#[trait_variant::make(CategoryRepository: Send)]
pub trait LocalCategoryRepository {
    async fn list_categories(&self) -> CatalogResult<Vec<Category>>;

    async fn find_category(&self, id: CategoryId) -> CatalogResult<Option<Category>>;

    /// `Duplicate` when the name is taken
    async fn create_category(&self, fields: &CategoryFields) -> CatalogResult<Category>;

    async fn update_category(
        &self,
        id: CategoryId,
        fields: &CategoryFields,
    ) -> CatalogResult<Category>;

    async fn delete_category(&self, id: CategoryId) -> CatalogResult<()>;
}

#[trait_variant::make(BrandRepository: Send)]
pub trait LocalBrandRepository {
    async fn list_brands(&self) -> CatalogResult<Vec<Brand>>;

    async fn find_brand(&self, id: BrandId) -> CatalogResult<Option<Brand>>;

    async fn create_brand(&self, fields: &BrandFields) -> CatalogResult<Brand>;

    async fn update_brand(&self, id: BrandId, fields: &BrandFields) -> CatalogResult<Brand>;

    async fn delete_brand(&self, id: BrandId) -> CatalogResult<()>;
}

#[trait_variant::make(ProductRepository: Send)]
pub trait LocalProductRepository {
    /// Filtered page ordered by `updated_at DESC, id DESC`
    async fn search_products(&self, filter: &ProductFilter) -> CatalogResult<Page<ProductView>>;

    async fn find_product(&self, id: ProductId) -> CatalogResult<Option<ProductView>>;

    /// Owner of the product's shop
    async fn find_product_owner(&self, id: ProductId) -> CatalogResult<Option<UserId>>;

    /// Inserts the product with its images and variants atomically
    async fn create_product(&self, product: &NewProduct) -> CatalogResult<ProductId>;

    async fn update_product(&self, id: ProductId, changes: &ProductChanges) -> CatalogResult<()>;

    async fn delete_product(&self, id: ProductId) -> CatalogResult<()>;

    /// Insert or replace the user's rating
    async fn upsert_rating(&self, rating: &NewRating) -> CatalogResult<ProductRating>;
}

#[trait_variant::make(BannerRepository: Send)]
pub trait LocalBannerRepository {
    async fn list_active_banners(&self) -> CatalogResult<Vec<Banner>>;

    async fn find_banner(&self, id: BannerId) -> CatalogResult<Option<Banner>>;

    async fn create_banner(&self, banner: &NewBanner) -> CatalogResult<Banner>;

    async fn update_banner(&self, id: BannerId, changes: &BannerChanges) -> CatalogResult<Banner>;

    async fn delete_banner(&self, id: BannerId) -> CatalogResult<()>;
}

/// Everything the catalog router needs from one storage backend
pub trait CatalogRepository:
    ShopRepository
    + CategoryRepository
    + BrandRepository
    + ProductRepository
    + BannerRepository
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> CatalogRepository for T where
    T: ShopRepository
        + CategoryRepository
        + BrandRepository
        + ProductRepository
        + BannerRepository
        + Clone
        + Send
        + Sync
        + 'static
{
}
