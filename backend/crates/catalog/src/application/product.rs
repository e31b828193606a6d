//! Product Use Cases
//!
//! Search is public. Writes require the caller to own the product's shop.

use std::sync::Arc;

use kernel::id::{BrandId, CategoryId, ProductId, ShopId, UserId};
use kernel::page::Page;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::application::{NAME_MAX_LENGTH, TEXT_MAX_LENGTH, optional_text, required_text};
use crate::domain::entity::product::{
    NewProduct, NewProductImage, NewVariant, ProductChanges, ProductView,
};
use crate::domain::filter::{ProductFilter, ProductQuery};
use crate::domain::repository::{ProductRepository, ShopRepository};
use crate::error::{CatalogError, CatalogResult};

const MAX_IMAGES: usize = 20;
const MAX_VARIANTS: usize = 100;

/// Create and update body. `shopId` is only read on create.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub shop_id: Option<i32>,
    pub category_id: Option<i32>,
    pub brand_id: Option<i32>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub images: Option<Vec<ImageInput>>,
    pub variants: Option<Vec<VariantInput>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInput {
    pub url: String,
    /// Defaults to the position in the list
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantInput {
    pub color: Option<String>,
    pub size: Option<String>,
    pub sku: Option<String>,
    pub stock: Option<i32>,
    pub price: Option<Decimal>,
}

pub struct ProductUseCase<R>
where
    R: ProductRepository + ShopRepository,
{
    repo: Arc<R>,
}

impl<R> ProductUseCase<R>
where
    R: ProductRepository + ShopRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn search(&self, query: ProductQuery) -> CatalogResult<Page<ProductView>> {
        let filter = ProductFilter::from_query(query)?;
        self.repo.search_products(&filter).await
    }

    pub async fn get(&self, id: ProductId) -> CatalogResult<ProductView> {
        self.repo
            .find_product(id)
            .await?
            .ok_or(CatalogError::NotFound("Product"))
    }

    pub async fn create(&self, user_id: UserId, input: ProductInput) -> CatalogResult<ProductView> {
        let shop_id = ShopId::new(
            input
                .shop_id
                .ok_or_else(|| CatalogError::validation("shopId is required"))?,
        );
        let category_id = CategoryId::new(
            input
                .category_id
                .ok_or_else(|| CatalogError::validation("categoryId is required"))?,
        );
        let price = input
            .price
            .ok_or_else(|| CatalogError::validation("price is required"))?;

        let product = NewProduct {
            shop_id,
            category_id,
            brand_id: input.brand_id.map(BrandId::new),
            name: required_text("name", input.name, NAME_MAX_LENGTH)?,
            description: optional_text("description", input.description, TEXT_MAX_LENGTH)?,
            price: non_negative_price(price)?,
            stock: non_negative_stock(input.stock.unwrap_or(0))?,
            images: images_of(input.images.unwrap_or_default())?,
            variants: variants_of(input.variants.unwrap_or_default())?,
        };

        let shop = self
            .repo
            .find_shop(shop_id)
            .await?
            .ok_or(CatalogError::NotFound("Shop"))?;
        if !shop.is_owned_by(user_id) {
            return Err(CatalogError::Forbidden("You do not own this shop"));
        }

        let id = self.repo.create_product(&product).await?;
        tracing::info!(product_id = %id, shop_id = %shop_id, "Product created");
        self.get(id).await
    }

    pub async fn update(
        &self,
        user_id: UserId,
        id: ProductId,
        input: ProductInput,
    ) -> CatalogResult<ProductView> {
        let changes = ProductChanges {
            category_id: input.category_id.map(CategoryId::new),
            brand_id: input.brand_id.map(BrandId::new),
            name: optional_text("name", input.name, NAME_MAX_LENGTH)?,
            description: optional_text("description", input.description, TEXT_MAX_LENGTH)?,
            price: input.price.map(non_negative_price).transpose()?,
            stock: input.stock.map(non_negative_stock).transpose()?,
            images: input.images.map(images_of).transpose()?,
            variants: input.variants.map(variants_of).transpose()?,
        };

        self.check_owner(user_id, id).await?;
        self.repo.update_product(id, &changes).await?;
        self.get(id).await
    }

    pub async fn delete(&self, user_id: UserId, id: ProductId) -> CatalogResult<()> {
        self.check_owner(user_id, id).await?;
        self.repo.delete_product(id).await?;
        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }

    async fn check_owner(&self, user_id: UserId, id: ProductId) -> CatalogResult<()> {
        let owner = self
            .repo
            .find_product_owner(id)
            .await?
            .ok_or(CatalogError::NotFound("Product"))?;
        if owner != user_id {
            return Err(CatalogError::Forbidden("You do not own this product"));
        }
        Ok(())
    }
}

fn non_negative_price(price: Decimal) -> CatalogResult<Decimal> {
    if price.is_sign_negative() {
        return Err(CatalogError::validation("price must be non-negative"));
    }
    Ok(price)
}

fn non_negative_stock(stock: i32) -> CatalogResult<i32> {
    if stock < 0 {
        return Err(CatalogError::validation("stock must be non-negative"));
    }
    Ok(stock)
}

pub(crate) fn images_of(images: Vec<ImageInput>) -> CatalogResult<Vec<NewProductImage>> {
    if images.len() > MAX_IMAGES {
        return Err(CatalogError::validation(format!(
            "A product can have at most {MAX_IMAGES} images"
        )));
    }

    images
        .into_iter()
        .enumerate()
        .map(|(index, image)| {
            let url = required_text("image url", Some(image.url), TEXT_MAX_LENGTH)?;
            Ok(NewProductImage {
                url,
                sort_order: image.sort_order.unwrap_or(index as i32),
            })
        })
        .collect()
}

pub(crate) fn variants_of(variants: Vec<VariantInput>) -> CatalogResult<Vec<NewVariant>> {
    if variants.len() > MAX_VARIANTS {
        return Err(CatalogError::validation(format!(
            "A product can have at most {MAX_VARIANTS} variants"
        )));
    }

    variants
        .into_iter()
        .map(|v| {
            Ok(NewVariant {
                color: optional_text("color", v.color, 50)?,
                size: optional_text("size", v.size, 50)?,
                sku: optional_text("sku", v.sku, 100)?,
                stock: non_negative_stock(v.stock.unwrap_or(0))?,
                price: v.price.map(non_negative_price).transpose()?,
            })
        })
        .collect()
}
