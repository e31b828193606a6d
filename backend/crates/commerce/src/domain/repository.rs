//! Repository Traits
//!
//! Every method is scoped to the calling user; rows of other users behave as
//! missing.

use kernel::id::{CartItemId, OrderId, UserId, VariantId};

use crate::domain::entity::{
    cart::{CartItem, CartLine},
    order::{NewOrder, Order},
    variant::VariantStock,
};
use crate::error::CommerceResult;

#[trait_variant::make(CartRepository: Send)]
pub trait LocalCartRepository {
    async fn find_variant(&self, id: VariantId) -> CommerceResult<Option<VariantStock>>;

    /// Newest first
    async fn list_cart(&self, user_id: UserId) -> CommerceResult<Vec<CartLine>>;

    async fn find_cart_line(
        &self,
        user_id: UserId,
        id: CartItemId,
    ) -> CommerceResult<Option<CartLine>>;

    async fn find_cart_item_by_variant(
        &self,
        user_id: UserId,
        variant_id: VariantId,
    ) -> CommerceResult<Option<CartItem>>;

    /// Insert a row, or add `quantity` to the live row for the same variant
    async fn add_to_cart(
        &self,
        user_id: UserId,
        variant_id: VariantId,
        quantity: i32,
    ) -> CommerceResult<CartItemId>;

    /// `NotFound` when no live row matches
    async fn set_cart_quantity(
        &self,
        user_id: UserId,
        id: CartItemId,
        quantity: i32,
    ) -> CommerceResult<()>;

    async fn remove_cart_item(&self, user_id: UserId, id: CartItemId) -> CommerceResult<()>;
}

#[trait_variant::make(OrderRepository: Send)]
pub trait LocalOrderRepository {
    /// Atomically lock the variants, check and decrement stock, snapshot
    /// prices, insert the order with its details, and retire the matching
    /// cart rows. Nothing is written on error.
    async fn place_order(&self, order: &NewOrder) -> CommerceResult<OrderId>;

    /// Newest first
    async fn list_orders(&self, user_id: UserId) -> CommerceResult<Vec<Order>>;

    async fn find_order(&self, user_id: UserId, id: OrderId) -> CommerceResult<Option<Order>>;

    async fn delete_order(&self, user_id: UserId, id: OrderId) -> CommerceResult<()>;
}

/// Everything the commerce router needs from one storage backend
pub trait CommerceRepository: CartRepository + OrderRepository + Clone + Send + Sync + 'static {}

impl<T> CommerceRepository for T where
    T: CartRepository + OrderRepository + Clone + Send + Sync + 'static
{
}
