//! Shop Use Cases
//!
//! Any authenticated user may open a shop; only its owner may change or
//! close it.

use std::sync::Arc;

use kernel::id::{ShopId, UserId};
use serde::Deserialize;

use crate::application::{NAME_MAX_LENGTH, TEXT_MAX_LENGTH, optional_text, required_text};
use crate::domain::entity::shop::{NewShop, Shop, ShopChanges};
use crate::domain::repository::ShopRepository;
use crate::error::{CatalogError, CatalogResult};

/// Create and update body; on update, absent fields are kept
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

pub struct ShopUseCase<R: ShopRepository> {
    repo: Arc<R>,
}

impl<R: ShopRepository> ShopUseCase<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> CatalogResult<Vec<Shop>> {
        self.repo.list_shops().await
    }

    pub async fn get(&self, id: ShopId) -> CatalogResult<Shop> {
        self.repo
            .find_shop(id)
            .await?
            .ok_or(CatalogError::NotFound("Shop"))
    }

    pub async fn create(&self, owner_id: UserId, input: ShopInput) -> CatalogResult<Shop> {
        let shop = NewShop {
            owner_id,
            name: required_text("name", input.name, NAME_MAX_LENGTH)?,
            description: optional_text("description", input.description, TEXT_MAX_LENGTH)?,
            logo: optional_text("logo", input.logo, TEXT_MAX_LENGTH)?,
            address: optional_text("address", input.address, TEXT_MAX_LENGTH)?,
            phone: optional_text("phone", input.phone, 32)?,
        };

        let shop = self.repo.create_shop(&shop).await?;
        tracing::info!(shop_id = %shop.id, owner_id = %owner_id, "Shop created");
        Ok(shop)
    }

    pub async fn update(&self, user_id: UserId, id: ShopId, input: ShopInput) -> CatalogResult<Shop> {
        self.owned(user_id, id).await?;

        let changes = ShopChanges {
            name: optional_text("name", input.name, NAME_MAX_LENGTH)?,
            description: optional_text("description", input.description, TEXT_MAX_LENGTH)?,
            logo: optional_text("logo", input.logo, TEXT_MAX_LENGTH)?,
            address: optional_text("address", input.address, TEXT_MAX_LENGTH)?,
            phone: optional_text("phone", input.phone, 32)?,
        };
        self.repo.update_shop(id, &changes).await
    }

    pub async fn delete(&self, user_id: UserId, id: ShopId) -> CatalogResult<()> {
        self.owned(user_id, id).await?;
        self.repo.delete_shop(id).await?;
        tracing::info!(shop_id = %id, "Shop deleted");
        Ok(())
    }

    async fn owned(&self, user_id: UserId, id: ShopId) -> CatalogResult<Shop> {
        let shop = self.get(id).await?;
        if !shop.is_owned_by(user_id) {
            return Err(CatalogError::Forbidden("You do not own this shop"));
        }
        Ok(shop)
    }
}
