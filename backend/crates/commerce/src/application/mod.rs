//! Application Layer

pub mod cart;
pub mod order;

pub use cart::{AddToCartInput, CartUseCase, SetQuantityInput};
pub use order::{OrderItemInput, OrderUseCase, PlaceOrderInput};

use crate::error::{CommerceError, CommerceResult};

/// Largest quantity accepted for one line
pub(crate) const MAX_QUANTITY: i32 = 10_000;

pub(crate) fn valid_quantity(quantity: i32) -> CommerceResult<i32> {
    if quantity < 1 {
        return Err(CommerceError::validation("quantity must be at least 1"));
    }
    if quantity > MAX_QUANTITY {
        return Err(CommerceError::validation(format!(
            "quantity must be at most {MAX_QUANTITY}"
        )));
    }
    Ok(quantity)
}
