//! Cart Use Cases
//!
//! A user has at most one live row per variant. Quantities are checked
//! against the variant's current stock; the order transaction re-checks.

use std::sync::Arc;

use kernel::id::{CartItemId, UserId, VariantId};
use serde::Deserialize;

use crate::application::valid_quantity;
use crate::domain::entity::cart::CartLine;
use crate::domain::repository::CartRepository;
use crate::error::{CommerceError, CommerceResult};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartInput {
    pub variant_id: i32,
    /// Defaults to 1
    pub quantity: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetQuantityInput {
    pub quantity: i32,
}

pub struct CartUseCase<R: CartRepository> {
    repo: Arc<R>,
}

impl<R: CartRepository> CartUseCase<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, user_id: UserId) -> CommerceResult<Vec<CartLine>> {
        self.repo.list_cart(user_id).await
    }

    pub async fn add(&self, user_id: UserId, input: AddToCartInput) -> CommerceResult<CartLine> {
        let quantity = valid_quantity(input.quantity.unwrap_or(1))?;
        let variant_id = VariantId::new(input.variant_id);

        let variant = self
            .repo
            .find_variant(variant_id)
            .await?
            .ok_or(CommerceError::NotFound("Variant"))?;

        let in_cart = self
            .repo
            .find_cart_item_by_variant(user_id, variant_id)
            .await?
            .map_or(0, |item| item.quantity);
        let wanted = valid_quantity(in_cart.saturating_add(quantity))?;
        if wanted > variant.stock {
            return Err(CommerceError::InsufficientStock {
                variant_id,
                available: variant.stock,
            });
        }

        let id = self.repo.add_to_cart(user_id, variant_id, quantity).await?;
        tracing::debug!(user_id = %user_id, variant_id = %variant_id, quantity = wanted, "Cart updated");
        self.line(user_id, id).await
    }

    pub async fn set_quantity(
        &self,
        user_id: UserId,
        id: CartItemId,
        input: SetQuantityInput,
    ) -> CommerceResult<CartLine> {
        let quantity = valid_quantity(input.quantity)?;
        let line = self.line(user_id, id).await?;
        if quantity > line.stock {
            return Err(CommerceError::InsufficientStock {
                variant_id: line.variant_id,
                available: line.stock,
            });
        }

        self.repo.set_cart_quantity(user_id, id, quantity).await?;
        self.line(user_id, id).await
    }

    pub async fn remove(&self, user_id: UserId, id: CartItemId) -> CommerceResult<()> {
        self.repo.remove_cart_item(user_id, id).await
    }

    async fn line(&self, user_id: UserId, id: CartItemId) -> CommerceResult<CartLine> {
        self.repo
            .find_cart_line(user_id, id)
            .await?
            .ok_or(CommerceError::NotFound("Cart item"))
    }
}
