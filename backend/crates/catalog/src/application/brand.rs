//! Brand Use Cases

use std::sync::Arc;

use kernel::id::BrandId;
use serde::Deserialize;

use crate::application::{NAME_MAX_LENGTH, TEXT_MAX_LENGTH, optional_text, required_text};
use crate::domain::entity::brand::{Brand, BrandFields};
use crate::domain::repository::BrandRepository;
use crate::error::{CatalogError, CatalogResult};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub logo: Option<String>,
}

pub struct BrandUseCase<R: BrandRepository> {
    repo: Arc<R>,
}

impl<R: BrandRepository> BrandUseCase<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> CatalogResult<Vec<Brand>> {
        self.repo.list_brands().await
    }

    pub async fn get(&self, id: BrandId) -> CatalogResult<Brand> {
        self.repo
            .find_brand(id)
            .await?
            .ok_or(CatalogError::NotFound("Brand"))
    }

    pub async fn create(&self, input: BrandInput) -> CatalogResult<Brand> {
        let fields = BrandFields {
            name: Some(required_text("name", input.name, NAME_MAX_LENGTH)?),
            description: optional_text("description", input.description, TEXT_MAX_LENGTH)?,
            logo: optional_text("logo", input.logo, TEXT_MAX_LENGTH)?,
        };
        self.repo.create_brand(&fields).await
    }

    pub async fn update(&self, id: BrandId, input: BrandInput) -> CatalogResult<Brand> {
        let fields = BrandFields {
            name: optional_text("name", input.name, NAME_MAX_LENGTH)?,
            description: optional_text("description", input.description, TEXT_MAX_LENGTH)?,
            logo: optional_text("logo", input.logo, TEXT_MAX_LENGTH)?,
        };
        self.repo.update_brand(id, &fields).await
    }

    pub async fn delete(&self, id: BrandId) -> CatalogResult<()> {
        self.repo.delete_brand(id).await
    }
}
