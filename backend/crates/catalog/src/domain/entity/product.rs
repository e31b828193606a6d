//! Product Entity
//!
//! Products are read as denormalized [`ProductView`]s and written through
//! [`NewProduct`] / [`ProductChanges`].

use chrono::{DateTime, Utc};
use kernel::id::{
    BrandId, CategoryId, ProductId, ProductImageId, RatingId, ShopId, UserId, VariantId,
};
use rust_decimal::Decimal;
use serde::Serialize;

/// Product with names of its shop, category and brand, and its child rows
///
/// The `images`, `variants` and `ratings` arrays are always present.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: ProductId,
    pub shop_id: ShopId,
    pub shop_name: String,
    pub category_id: CategoryId,
    pub category_name: String,
    pub brand_id: Option<BrandId>,
    pub brand_name: Option<String>,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: i32,
    pub average_rating: f64,
    pub rating_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub images: Vec<ProductImage>,
    pub variants: Vec<ProductVariant>,
    pub ratings: Vec<ProductRating>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub id: ProductImageId,
    pub url: String,
    pub sort_order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: VariantId,
    pub color: Option<String>,
    pub size: Option<String>,
    pub sku: Option<String>,
    pub stock: i32,
    /// Effective price: the variant override, else the product price
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRating {
    pub id: RatingId,
    pub user_id: UserId,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub username: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub shop_id: ShopId,
    pub category_id: CategoryId,
    pub brand_id: Option<BrandId>,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub images: Vec<NewProductImage>,
    pub variants: Vec<NewVariant>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProductImage {
    pub url: String,
    pub sort_order: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewVariant {
    pub color: Option<String>,
    pub size: Option<String>,
    pub sku: Option<String>,
    pub stock: i32,
    /// `None` falls back to the product price
    pub price: Option<Decimal>,
}

/// Partial update. Supplied `images` / `variants` replace the existing sets.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub category_id: Option<CategoryId>,
    pub brand_id: Option<BrandId>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub images: Option<Vec<NewProductImage>>,
    pub variants: Option<Vec<NewVariant>>,
}

/// One user's rating of a product; re-rating replaces the previous value
#[derive(Debug, Clone)]
pub struct NewRating {
    pub product_id: ProductId,
    pub user_id: UserId,
    pub rating: i16,
    pub comment: Option<String>,
}
