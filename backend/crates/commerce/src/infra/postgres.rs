//! PostgreSQL Repository Implementation

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use kernel::id::{CartItemId, OrderDetailId, OrderId, ProductId, ShopId, UserId, VariantId};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::domain::entity::{
    cart::{CartItem, CartLine},
    order::{NewOrder, Order, OrderDetail, OrderStatus, price_lines},
    variant::VariantStock,
};
use crate::domain::repository::{CartRepository, OrderRepository};
use crate::error::{CommerceError, CommerceResult, map_write_error};

const CART_LINE_SELECT: &str = r#"
SELECT
    ci.id,
    ci.variant_id,
    v.product_id,
    p.shop_id,
    p.name AS product_name,
    v.color,
    v.size,
    v.sku,
    (
        SELECT pi.url FROM product_images pi
        WHERE pi.product_id = p.id AND pi.is_deleted = FALSE
        ORDER BY pi.sort_order, pi.id
        LIMIT 1
    ) AS image_url,
    ci.quantity,
    v.stock,
    COALESCE(v.price, p.price) AS unit_price,
    ci.created_at,
    ci.updated_at
FROM cart_items ci
JOIN product_variants v ON v.id = ci.variant_id AND v.is_deleted = FALSE
JOIN products p ON p.id = v.product_id AND p.is_deleted = FALSE
WHERE ci.user_id = $1 AND ci.is_deleted = FALSE"#;

const VARIANT_STOCK_SELECT: &str = r#"
SELECT v.id AS variant_id, v.product_id, p.shop_id, v.stock,
       COALESCE(v.price, p.price) AS unit_price
FROM product_variants v
JOIN products p ON p.id = v.product_id AND p.is_deleted = FALSE
JOIN shops s ON s.id = p.shop_id AND s.is_deleted = FALSE
WHERE v.is_deleted = FALSE"#;

const ORDER_COLUMNS: &str =
    "id, user_id, status, total_amount, shipping_address, note, created_at, updated_at";

/// PostgreSQL-backed carts and orders
#[derive(Clone)]
pub struct PgCommerceRepository {
    pool: PgPool,
}

impl PgCommerceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Carts
// ============================================================================

impl CartRepository for PgCommerceRepository {
    async fn find_variant(&self, id: VariantId) -> CommerceResult<Option<VariantStock>> {
        let sql = format!("{VARIANT_STOCK_SELECT} AND v.id = $1");
        let row = sqlx::query_as::<_, VariantStockRow>(&sql)
            .bind(id.as_i32())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(VariantStockRow::into_variant))
    }

    async fn list_cart(&self, user_id: UserId) -> CommerceResult<Vec<CartLine>> {
        let sql = format!("{CART_LINE_SELECT} ORDER BY ci.created_at DESC, ci.id DESC");
        let rows = sqlx::query_as::<_, CartLineRow>(&sql)
            .bind(user_id.as_i32())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(CartLineRow::into_line).collect())
    }

    async fn find_cart_line(
        &self,
        user_id: UserId,
        id: CartItemId,
    ) -> CommerceResult<Option<CartLine>> {
        let sql = format!("{CART_LINE_SELECT} AND ci.id = $2");
        let row = sqlx::query_as::<_, CartLineRow>(&sql)
            .bind(user_id.as_i32())
            .bind(id.as_i32())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(CartLineRow::into_line))
    }

    async fn find_cart_item_by_variant(
        &self,
        user_id: UserId,
        variant_id: VariantId,
    ) -> CommerceResult<Option<CartItem>> {
        let row: Option<(i32, i32)> = sqlx::query_as(
            r#"
            SELECT id, quantity FROM cart_items
            WHERE user_id = $1 AND variant_id = $2 AND is_deleted = FALSE
            "#,
        )
        .bind(user_id.as_i32())
        .bind(variant_id.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, quantity)| CartItem {
            id: CartItemId::new(id),
            user_id,
            variant_id,
            quantity,
        }))
    }

    async fn add_to_cart(
        &self,
        user_id: UserId,
        variant_id: VariantId,
        quantity: i32,
    ) -> CommerceResult<CartItemId> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO cart_items (user_id, variant_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, variant_id) WHERE is_deleted = FALSE
            DO UPDATE SET
                quantity = cart_items.quantity + EXCLUDED.quantity,
                updated_at = NOW()
            RETURNING id
            "#,
        )
        .bind(user_id.as_i32())
        .bind(variant_id.as_i32())
        .bind(quantity)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(CartItemId::new(id))
    }

    async fn set_cart_quantity(
        &self,
        user_id: UserId,
        id: CartItemId,
        quantity: i32,
    ) -> CommerceResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE cart_items SET quantity = $3, updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND is_deleted = FALSE
            "#,
        )
        .bind(id.as_i32())
        .bind(user_id.as_i32())
        .bind(quantity)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(CommerceError::NotFound("Cart item"));
        }
        Ok(())
    }

    async fn remove_cart_item(&self, user_id: UserId, id: CartItemId) -> CommerceResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE cart_items SET is_deleted = TRUE, updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND is_deleted = FALSE
            "#,
        )
        .bind(id.as_i32())
        .bind(user_id.as_i32())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CommerceError::NotFound("Cart item"));
        }
        Ok(())
    }
}

// ============================================================================
// Orders
// ============================================================================

impl OrderRepository for PgCommerceRepository {
    async fn place_order(&self, order: &NewOrder) -> CommerceResult<OrderId> {
        let variant_ids: Vec<i32> = order.lines.iter().map(|l| l.variant_id.as_i32()).collect();

        let mut tx = self.pool.begin().await?;

        // Locked in id order so concurrent orders cannot deadlock
        let sql = format!("{VARIANT_STOCK_SELECT} AND v.id = ANY($1) ORDER BY v.id FOR UPDATE OF v");
        let locked: Vec<VariantStock> = sqlx::query_as::<_, VariantStockRow>(&sql)
            .bind(&variant_ids)
            .fetch_all(&mut *tx)
            .await?
            .into_iter()
            .map(VariantStockRow::into_variant)
            .collect();

        let (priced, total) = price_lines(&order.lines, &locked)?;

        for line in &priced {
            sqlx::query(
                "UPDATE product_variants SET stock = stock - $2, updated_at = NOW() WHERE id = $1",
            )
            .bind(line.variant_id.as_i32())
            .bind(line.quantity)
            .execute(&mut *tx)
            .await
            .map_err(map_write_error)?;
        }

        let order_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO orders (user_id, status, total_amount, shipping_address, note)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(order.user_id.as_i32())
        .bind(OrderStatus::Pending.as_str())
        .bind(total)
        .bind(&order.shipping_address)
        .bind(&order.note)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        let mut details = QueryBuilder::<Postgres>::new(
            "INSERT INTO order_details (order_id, variant_id, product_id, shop_id, quantity, unit_price) ",
        );
        details.push_values(&priced, |mut b, line| {
            b.push_bind(order_id)
                .push_bind(line.variant_id.as_i32())
                .push_bind(line.product_id.as_i32())
                .push_bind(line.shop_id.as_i32())
                .push_bind(line.quantity)
                .push_bind(line.unit_price);
        });
        details
            .build()
            .execute(&mut *tx)
            .await
            .map_err(map_write_error)?;

        sqlx::query(
            r#"
            UPDATE cart_items SET is_deleted = TRUE, updated_at = NOW()
            WHERE user_id = $1 AND variant_id = ANY($2) AND is_deleted = FALSE
            "#,
        )
        .bind(order.user_id.as_i32())
        .bind(&variant_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(OrderId::new(order_id))
    }

    async fn list_orders(&self, user_id: UserId) -> CommerceResult<Vec<Order>> {
        let sql = format!(
            r#"
            SELECT {ORDER_COLUMNS} FROM orders
            WHERE user_id = $1 AND is_deleted = FALSE
            ORDER BY created_at DESC, id DESC
            "#
        );
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(user_id.as_i32())
            .fetch_all(&self.pool)
            .await?;

        self.attach_details(rows).await
    }

    async fn find_order(&self, user_id: UserId, id: OrderId) -> CommerceResult<Option<Order>> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 AND user_id = $2 AND is_deleted = FALSE"
        );
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(id.as_i32())
            .bind(user_id.as_i32())
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(self.attach_details(vec![row]).await?.pop())
    }

    async fn delete_order(&self, user_id: UserId, id: OrderId) -> CommerceResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE orders SET is_deleted = TRUE, updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND is_deleted = FALSE
            "#,
        )
        .bind(id.as_i32())
        .bind(user_id.as_i32())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CommerceError::NotFound("Order"));
        }
        Ok(())
    }
}

impl PgCommerceRepository {
    async fn attach_details(&self, rows: Vec<OrderRow>) -> CommerceResult<Vec<Order>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();

        let details = sqlx::query_as::<_, OrderDetailRow>(
            r#"
            SELECT d.id, d.order_id, d.variant_id, d.product_id, d.shop_id,
                   p.name AS product_name, d.quantity, d.unit_price
            FROM order_details d
            JOIN products p ON p.id = d.product_id
            WHERE d.order_id = ANY($1) AND d.is_deleted = FALSE
            ORDER BY d.order_id, d.id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_order: HashMap<i32, Vec<OrderDetail>> = HashMap::new();
        for detail in details {
            by_order
                .entry(detail.order_id)
                .or_default()
                .push(detail.into_detail());
        }

        rows.into_iter()
            .map(|row| {
                let details = by_order.remove(&row.id).unwrap_or_default();
                row.into_order(details)
            })
            .collect()
    }
}

// ============================================================================
// Rows
// ============================================================================

#[derive(sqlx::FromRow)]
struct VariantStockRow {
    variant_id: i32,
    product_id: i32,
    shop_id: i32,
    stock: i32,
    unit_price: Decimal,
}

impl VariantStockRow {
    fn into_variant(self) -> VariantStock {
        VariantStock {
            variant_id: VariantId::new(self.variant_id),
            product_id: ProductId::new(self.product_id),
            shop_id: ShopId::new(self.shop_id),
            stock: self.stock,
            unit_price: self.unit_price,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CartLineRow {
    id: i32,
    variant_id: i32,
    product_id: i32,
    shop_id: i32,
    product_name: String,
    color: Option<String>,
    size: Option<String>,
    sku: Option<String>,
    image_url: Option<String>,
    quantity: i32,
    stock: i32,
    unit_price: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CartLineRow {
    fn into_line(self) -> CartLine {
        CartLine {
            id: CartItemId::new(self.id),
            variant_id: VariantId::new(self.variant_id),
            product_id: ProductId::new(self.product_id),
            shop_id: ShopId::new(self.shop_id),
            product_name: self.product_name,
            color: self.color,
            size: self.size,
            sku: self.sku,
            image_url: self.image_url,
            quantity: self.quantity,
            stock: self.stock,
            unit_price: self.unit_price,
            subtotal: self.unit_price * Decimal::from(self.quantity),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    status: String,
    total_amount: Decimal,
    shipping_address: Option<String>,
    note: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, details: Vec<OrderDetail>) -> CommerceResult<Order> {
        let status = self
            .status
            .parse::<OrderStatus>()
            .map_err(|e| CommerceError::Database(sqlx::Error::Decode(e.into())))?;

        Ok(Order {
            id: OrderId::new(self.id),
            user_id: UserId::new(self.user_id),
            status,
            total_amount: self.total_amount,
            shipping_address: self.shipping_address,
            note: self.note,
            created_at: self.created_at,
            updated_at: self.updated_at,
            details,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OrderDetailRow {
    id: i32,
    order_id: i32,
    variant_id: i32,
    product_id: i32,
    shop_id: i32,
    product_name: String,
    quantity: i32,
    unit_price: Decimal,
}

impl OrderDetailRow {
    fn into_detail(self) -> OrderDetail {
        OrderDetail {
            id: OrderDetailId::new(self.id),
            variant_id: VariantId::new(self.variant_id),
            product_id: ProductId::new(self.product_id),
            shop_id: ShopId::new(self.shop_id),
            product_name: self.product_name,
            quantity: self.quantity,
            unit_price: self.unit_price,
        }
    }
}
