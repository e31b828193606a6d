//! Banner Use Cases

use std::sync::Arc;

use kernel::id::{BannerId, ProductId};
use serde::Deserialize;

use crate::application::{NAME_MAX_LENGTH, TEXT_MAX_LENGTH, optional_text, required_text};
use crate::domain::entity::banner::{Banner, BannerChanges, NewBanner};
use crate::domain::filter::IdList;
use crate::domain::repository::BannerRepository;
use crate::error::{CatalogError, CatalogResult};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerInput {
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
    /// Display order; duplicates are dropped
    pub product_ids: Option<IdList>,
}

pub struct BannerUseCase<R: BannerRepository> {
    repo: Arc<R>,
}

impl<R: BannerRepository> BannerUseCase<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list_active(&self) -> CatalogResult<Vec<Banner>> {
        self.repo.list_active_banners().await
    }

    pub async fn get(&self, id: BannerId) -> CatalogResult<Banner> {
        self.repo
            .find_banner(id)
            .await?
            .ok_or(CatalogError::NotFound("Banner"))
    }

    pub async fn create(&self, input: BannerInput) -> CatalogResult<Banner> {
        let banner = NewBanner {
            title: required_text("title", input.title, NAME_MAX_LENGTH)?,
            image_url: optional_text("imageUrl", input.image_url, TEXT_MAX_LENGTH)?,
            is_active: input.is_active.unwrap_or(true),
            product_ids: product_ids_of(input.product_ids.unwrap_or_default()),
        };
        self.repo.create_banner(&banner).await
    }

    pub async fn update(&self, id: BannerId, input: BannerInput) -> CatalogResult<Banner> {
        let changes = BannerChanges {
            title: optional_text("title", input.title, NAME_MAX_LENGTH)?,
            image_url: optional_text("imageUrl", input.image_url, TEXT_MAX_LENGTH)?,
            is_active: input.is_active,
            product_ids: input.product_ids.map(product_ids_of),
        };
        self.repo.update_banner(id, &changes).await
    }

    pub async fn delete(&self, id: BannerId) -> CatalogResult<()> {
        self.repo.delete_banner(id).await
    }
}

fn product_ids_of(ids: IdList) -> Vec<ProductId> {
    ids.as_slice().iter().copied().map(ProductId::new).collect()
}
