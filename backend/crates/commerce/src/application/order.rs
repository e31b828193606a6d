//! Order Use Cases

use std::sync::Arc;

use kernel::id::{OrderId, UserId, VariantId};
use serde::Deserialize;

use crate::application::valid_quantity;
use crate::domain::entity::order::{NewOrder, Order, OrderLine};
use crate::domain::repository::OrderRepository;
use crate::error::{CommerceError, CommerceResult};

const MAX_LINES: usize = 100;
const ADDRESS_MAX_LENGTH: usize = 500;
const NOTE_MAX_LENGTH: usize = 1000;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderInput {
    pub items: Vec<OrderItemInput>,
    pub shipping_address: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    pub variant_id: i32,
    pub quantity: i32,
}

pub struct OrderUseCase<R: OrderRepository> {
    repo: Arc<R>,
}

impl<R: OrderRepository> OrderUseCase<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn place(&self, user_id: UserId, input: PlaceOrderInput) -> CommerceResult<Order> {
        let order = NewOrder {
            user_id,
            lines: merge_lines(&input.items)?,
            shipping_address: trimmed("shippingAddress", input.shipping_address, ADDRESS_MAX_LENGTH)?,
            note: trimmed("note", input.note, NOTE_MAX_LENGTH)?,
        };

        let id = self.repo.place_order(&order).await?;
        tracing::info!(order_id = %id, user_id = %user_id, lines = order.lines.len(), "Order placed");
        self.get(user_id, id).await
    }

    pub async fn list(&self, user_id: UserId) -> CommerceResult<Vec<Order>> {
        self.repo.list_orders(user_id).await
    }

    pub async fn get(&self, user_id: UserId, id: OrderId) -> CommerceResult<Order> {
        self.repo
            .find_order(user_id, id)
            .await?
            .ok_or(CommerceError::NotFound("Order"))
    }

    pub async fn delete(&self, user_id: UserId, id: OrderId) -> CommerceResult<()> {
        self.repo.delete_order(user_id, id).await?;
        tracing::info!(order_id = %id, user_id = %user_id, "Order deleted");
        Ok(())
    }
}

/// Validate quantities and fold repeated variants into one line, keeping
/// first-seen order
fn merge_lines(items: &[OrderItemInput]) -> CommerceResult<Vec<OrderLine>> {
    if items.is_empty() {
        return Err(CommerceError::validation("An order needs at least one item"));
    }
    if items.len() > MAX_LINES {
        return Err(CommerceError::validation(format!(
            "An order can have at most {MAX_LINES} items"
        )));
    }

    let mut lines: Vec<OrderLine> = Vec::with_capacity(items.len());
    for item in items {
        let quantity = valid_quantity(item.quantity)?;
        let variant_id = VariantId::new(item.variant_id);
        match lines.iter_mut().find(|l| l.variant_id == variant_id) {
            Some(line) => line.quantity = valid_quantity(line.quantity.saturating_add(quantity))?,
            None => lines.push(OrderLine {
                variant_id,
                quantity,
            }),
        }
    }
    Ok(lines)
}

fn trimmed(field: &str, value: Option<String>, max: usize) -> CommerceResult<Option<String>> {
    let Some(text) = value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if text.chars().count() > max {
        return Err(CommerceError::validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(Some(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(variant_id: i32, quantity: i32) -> OrderItemInput {
        OrderItemInput {
            variant_id,
            quantity,
        }
    }

    #[test]
    fn test_merge_repeated_variants() {
        let lines = merge_lines(&[item(3, 1), item(1, 2), item(3, 4)]).unwrap();
        assert_eq!(
            lines,
            vec![
                OrderLine {
                    variant_id: VariantId::new(3),
                    quantity: 5
                },
                OrderLine {
                    variant_id: VariantId::new(1),
                    quantity: 2
                },
            ]
        );
    }

    #[test]
    fn test_rejects_empty_and_non_positive() {
        assert!(merge_lines(&[]).is_err());
        assert!(merge_lines(&[item(1, 0)]).is_err());
        assert!(merge_lines(&[item(1, -2)]).is_err());
    }

    #[test]
    fn test_trimmed() {
        assert_eq!(trimmed("note", Some("  ".into()), 10).unwrap(), None);
        assert_eq!(
            trimmed("note", Some(" leave at door ".into()), 20).unwrap(),
            Some("leave at door".into())
        );
        assert!(trimmed("note", Some("x".repeat(11)), 10).is_err());
    }
}
