//! Cart Entities

use chrono::{DateTime, Utc};
use kernel::id::{CartItemId, ProductId, ShopId, UserId, VariantId};
use rust_decimal::Decimal;
use serde::Serialize;

/// Stored cart row
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub id: CartItemId,
    pub user_id: UserId,
    pub variant_id: VariantId,
    pub quantity: i32,
}

/// Cart row joined with its variant and product
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: CartItemId,
    pub variant_id: VariantId,
    pub product_id: ProductId,
    pub shop_id: ShopId,
    pub product_name: String,
    pub color: Option<String>,
    pub size: Option<String>,
    pub sku: Option<String>,
    pub image_url: Option<String>,
    pub quantity: i32,
    /// Units currently available
    pub stock: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
