//! Purchasable variant as seen by carts and orders

use kernel::id::{ProductId, ShopId, VariantId};
use rust_decimal::Decimal;

/// Live variant of a live product
#[derive(Debug, Clone, PartialEq)]
pub struct VariantStock {
    pub variant_id: VariantId,
    pub product_id: ProductId,
    pub shop_id: ShopId,
    pub stock: i32,
    /// Variant override or the product price
    pub unit_price: Decimal,
}
