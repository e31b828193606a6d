//! Rate Product Use Case

use std::sync::Arc;

use kernel::id::{ProductId, UserId};
use serde::Deserialize;

use crate::application::{TEXT_MAX_LENGTH, optional_text};
use crate::domain::entity::product::{NewRating, ProductRating};
use crate::domain::repository::ProductRepository;
use crate::error::{CatalogError, CatalogResult};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingInput {
    pub rating: i16,
    pub comment: Option<String>,
}

pub struct RateProductUseCase<R: ProductRepository> {
    repo: Arc<R>,
}

impl<R: ProductRepository> RateProductUseCase<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        user_id: UserId,
        product_id: ProductId,
        input: RatingInput,
    ) -> CatalogResult<ProductRating> {
        if !(1..=5).contains(&input.rating) {
            return Err(CatalogError::validation("rating must be between 1 and 5"));
        }

        if self.repo.find_product_owner(product_id).await?.is_none() {
            return Err(CatalogError::NotFound("Product"));
        }

        let rating = NewRating {
            product_id,
            user_id,
            rating: input.rating,
            comment: optional_text("comment", input.comment, TEXT_MAX_LENGTH)?,
        };

        let saved = self.repo.upsert_rating(&rating).await?;
        tracing::info!(product_id = %product_id, user_id = %user_id, rating = saved.rating, "Product rated");
        Ok(saved)
    }
}
