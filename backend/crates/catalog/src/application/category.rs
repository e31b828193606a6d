//! Category Use Cases

use std::sync::Arc;

use kernel::id::CategoryId;
use serde::Deserialize;

use crate::application::{NAME_MAX_LENGTH, TEXT_MAX_LENGTH, optional_text, required_text};
use crate::domain::entity::category::{Category, CategoryFields};
use crate::domain::repository::CategoryRepository;
use crate::error::{CatalogError, CatalogResult};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

pub struct CategoryUseCase<R: CategoryRepository> {
    repo: Arc<R>,
}

impl<R: CategoryRepository> CategoryUseCase<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> CatalogResult<Vec<Category>> {
        self.repo.list_categories().await
    }

    pub async fn get(&self, id: CategoryId) -> CatalogResult<Category> {
        self.repo
            .find_category(id)
            .await?
            .ok_or(CatalogError::NotFound("Category"))
    }

    pub async fn create(&self, input: CategoryInput) -> CatalogResult<Category> {
        let fields = CategoryFields {
            name: Some(required_text("name", input.name, NAME_MAX_LENGTH)?),
            description: optional_text("description", input.description, TEXT_MAX_LENGTH)?,
            image: optional_text("image", input.image, TEXT_MAX_LENGTH)?,
        };
        self.repo.create_category(&fields).await
    }

    pub async fn update(&self, id: CategoryId, input: CategoryInput) -> CatalogResult<Category> {
        let fields = CategoryFields {
            name: optional_text("name", input.name, NAME_MAX_LENGTH)?,
            description: optional_text("description", input.description, TEXT_MAX_LENGTH)?,
            image: optional_text("image", input.image, TEXT_MAX_LENGTH)?,
        };
        self.repo.update_category(id, &fields).await
    }

    pub async fn delete(&self, id: CategoryId) -> CatalogResult<()> {
        self.repo.delete_category(id).await
    }
}
