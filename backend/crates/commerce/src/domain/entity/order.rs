//! Order Entities
//!
//! Order lines carry the unit price at purchase time; later price changes
//! never touch them.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use kernel::id::{OrderDetailId, OrderId, ProductId, ShopId, UserId, VariantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::entity::variant::VariantStock;
use crate::error::{CommerceError, CommerceResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "paid" => Ok(OrderStatus::Paid),
            "shipped" => Ok(OrderStatus::Shipped),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub status: OrderStatus,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub shipping_address: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub details: Vec<OrderDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    pub id: OrderDetailId,
    pub variant_id: VariantId,
    pub product_id: ProductId,
    pub shop_id: ShopId,
    pub product_name: String,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
}

/// Requested quantity of one variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLine {
    pub variant_id: VariantId,
    pub quantity: i32,
}

/// Validated order request; lines have distinct variants
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub lines: Vec<OrderLine>,
    pub shipping_address: Option<String>,
    pub note: Option<String>,
}

/// Line priced against locked stock
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub variant_id: VariantId,
    pub product_id: ProductId,
    pub shop_id: ShopId,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// Check every line against `stock` and snapshot unit prices
///
/// `NotFound` when a variant is missing from `stock`, `InsufficientStock`
/// when a quantity exceeds what is available.
pub fn price_lines(
    lines: &[OrderLine],
    stock: &[VariantStock],
) -> CommerceResult<(Vec<PricedLine>, Decimal)> {
    let by_id: HashMap<VariantId, &VariantStock> =
        stock.iter().map(|v| (v.variant_id, v)).collect();

    let mut priced = Vec::with_capacity(lines.len());
    let mut total = Decimal::ZERO;

    for line in lines {
        let variant = by_id
            .get(&line.variant_id)
            .ok_or(CommerceError::NotFound("Variant"))?;
        if line.quantity > variant.stock {
            return Err(CommerceError::InsufficientStock {
                variant_id: line.variant_id,
                available: variant.stock,
            });
        }

        total += variant.unit_price * Decimal::from(line.quantity);
        priced.push(PricedLine {
            variant_id: line.variant_id,
            product_id: variant.product_id,
            shop_id: variant.shop_id,
            quantity: line.quantity,
            unit_price: variant.unit_price,
        });
    }

    Ok((priced, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(id: i32, stock: i32, price: Decimal) -> VariantStock {
        VariantStock {
            variant_id: VariantId::new(id),
            product_id: ProductId::new(100 + id),
            shop_id: ShopId::new(1),
            stock,
            unit_price: price,
        }
    }

    fn line(id: i32, quantity: i32) -> OrderLine {
        OrderLine {
            variant_id: VariantId::new(id),
            quantity,
        }
    }

    #[test]
    fn test_total_is_sum_of_snapshots() {
        let stock = [
            variant(1, 5, Decimal::new(1050, 2)),
            variant(2, 1, Decimal::new(300, 2)),
        ];
        let (priced, total) = price_lines(&[line(1, 2), line(2, 1)], &stock).unwrap();

        assert_eq!(total, Decimal::new(2400, 2));
        assert_eq!(priced[0].unit_price, Decimal::new(1050, 2));
        assert_eq!(priced[1].product_id, ProductId::new(102));
    }

    #[test]
    fn test_quantity_above_stock() {
        let stock = [variant(1, 2, Decimal::ONE)];
        let err = price_lines(&[line(1, 3)], &stock).unwrap_err();
        assert!(matches!(
            err,
            CommerceError::InsufficientStock { available: 2, .. }
        ));

        assert!(price_lines(&[line(1, 2)], &stock).is_ok());
    }

    #[test]
    fn test_unknown_variant() {
        let err = price_lines(&[line(9, 1)], &[]).unwrap_err();
        assert!(matches!(err, CommerceError::NotFound("Variant")));
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Paid,
            OrderStatus::Shipped,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
        assert!("refunded".parse::<OrderStatus>().is_err());
    }
}
