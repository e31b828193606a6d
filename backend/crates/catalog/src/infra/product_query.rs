//! Product search query builder
//!
//! Composes the filtered, joined, paginated product query and shapes the
//! result rows into nested [`ProductView`]s. SQL composition is pure so it
//! can be inspected without a database.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use kernel::id::{
    BrandId, CategoryId, Id, ProductId, ProductImageId, RatingId, ShopId, UserId, VariantId,
};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::domain::entity::product::{ProductImage, ProductRating, ProductVariant, ProductView};
use crate::domain::filter::ProductFilter;

const SELECT_COLUMNS: &str = r#"
SELECT
    p.id,
    p.shop_id,
    s.name AS shop_name,
    p.category_id,
    c.name AS category_name,
    p.brand_id,
    b.name AS brand_name,
    p.name,
    p.description,
    p.price,
    p.stock,
    COALESCE(r.average_rating, 0)::FLOAT8 AS average_rating,
    COALESCE(r.rating_count, 0) AS rating_count,
    p.created_at,
    p.updated_at"#;

// Products of deleted shops are hidden. The rating aggregate is joined so
// `minRating` can be filtered in WHERE.
const FROM_CLAUSE: &str = r#"
FROM products p
JOIN shops s ON s.id = p.shop_id AND s.is_deleted = FALSE
JOIN categories c ON c.id = p.category_id
LEFT JOIN brands b ON b.id = p.brand_id
LEFT JOIN (
    SELECT product_id, AVG(rating)::FLOAT8 AS average_rating, COUNT(*) AS rating_count
    FROM product_ratings
    WHERE is_deleted = FALSE
    GROUP BY product_id
) r ON r.product_id = p.id
WHERE p.is_deleted = FALSE"#;

const ORDER_BY: &str = " ORDER BY p.updated_at DESC, p.id DESC";

/// Page of products matching `filter`
pub fn build_search(filter: &ProductFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(SELECT_COLUMNS);
    qb.push(FROM_CLAUSE);
    push_predicates(&mut qb, filter);
    qb.push(ORDER_BY);
    qb.push(" LIMIT ")
        .push_bind(i64::from(filter.page.limit()))
        .push(" OFFSET ")
        .push_bind(filter.page.offset());
    qb
}

/// Total number of products matching `filter`
pub fn build_count(filter: &ProductFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*)");
    qb.push(FROM_CLAUSE);
    push_predicates(&mut qb, filter);
    qb
}

/// One live product by id
pub fn build_find(id: ProductId) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(SELECT_COLUMNS);
    qb.push(FROM_CLAUSE);
    qb.push(" AND p.id = ").push_bind(id.as_i32());
    qb
}

/// Each present field ANDs one predicate
fn push_predicates(qb: &mut QueryBuilder<'static, Postgres>, filter: &ProductFilter) {
    if let Some(shop_id) = filter.shop_id {
        qb.push(" AND p.shop_id = ").push_bind(shop_id.as_i32());
    }

    if !filter.category_ids.is_empty() {
        qb.push(" AND p.category_id = ANY(")
            .push_bind(raw_ids(&filter.category_ids))
            .push(")");
    }

    if !filter.brand_ids.is_empty() {
        qb.push(" AND p.brand_id = ANY(")
            .push_bind(raw_ids(&filter.brand_ids))
            .push(")");
    }

    if let Some((min, max)) = filter.price_range {
        qb.push(" AND p.price BETWEEN ")
            .push_bind(min)
            .push(" AND ")
            .push_bind(max);
    }

    if let Some(search) = &filter.search {
        qb.push(" AND p.name ILIKE ")
            .push_bind(format!("%{}%", escape_like(search)))
            .push(r" ESCAPE '\'");
    }

    if let Some(min_rating) = filter.min_rating {
        qb.push(" AND COALESCE(r.average_rating, 0) >= ")
            .push_bind(min_rating);
    }
}

fn raw_ids<T>(ids: &[Id<T>]) -> Vec<i32> {
    ids.iter().map(|id| id.as_i32()).collect()
}

/// Escape `LIKE` wildcards so user input matches literally
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

// ============================================================================
// Row shaping
// ============================================================================

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProductRow {
    pub id: i32,
    pub shop_id: i32,
    pub shop_name: String,
    pub category_id: i32,
    pub category_name: String,
    pub brand_id: Option<i32>,
    pub brand_name: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub average_rating: f64,
    pub rating_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ImageRow {
    pub id: i32,
    pub product_id: i32,
    pub url: String,
    pub sort_order: i32,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct VariantRow {
    pub id: i32,
    pub product_id: i32,
    pub color: Option<String>,
    pub size: Option<String>,
    pub sku: Option<String>,
    pub stock: i32,
    pub price: Decimal,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct RatingRow {
    pub id: i32,
    pub product_id: i32,
    pub user_id: i32,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub username: Option<String>,
}

impl RatingRow {
    pub(crate) fn into_rating(self) -> ProductRating {
        ProductRating {
            id: RatingId::new(self.id),
            user_id: UserId::new(self.user_id),
            rating: self.rating,
            comment: self.comment,
            created_at: self.created_at,
            username: self.username,
        }
    }
}

/// Load images, variants and ratings for `rows` and assemble the views,
/// preserving the order of `rows`
pub(crate) async fn load_views(
    pool: &PgPool,
    rows: Vec<ProductRow>,
) -> Result<Vec<ProductView>, sqlx::Error> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();

    let images = sqlx::query_as::<_, ImageRow>(
        r#"
        SELECT id, product_id, url, sort_order
        FROM product_images
        WHERE product_id = ANY($1) AND is_deleted = FALSE
        ORDER BY product_id, sort_order, id
        "#,
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let variants = sqlx::query_as::<_, VariantRow>(
        r#"
        SELECT v.id, v.product_id, v.color, v.size, v.sku, v.stock,
               COALESCE(v.price, p.price) AS price
        FROM product_variants v
        JOIN products p ON p.id = v.product_id
        WHERE v.product_id = ANY($1) AND v.is_deleted = FALSE
        ORDER BY v.product_id, v.id
        "#,
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let ratings = sqlx::query_as::<_, RatingRow>(
        r#"
        SELECT r.id, r.product_id, r.user_id, r.rating, r.comment, r.created_at, u.username
        FROM product_ratings r
        LEFT JOIN users u ON u.id = r.user_id AND u.is_deleted = FALSE
        WHERE r.product_id = ANY($1) AND r.is_deleted = FALSE
        ORDER BY r.product_id, r.created_at DESC, r.id DESC
        "#,
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    Ok(assemble(rows, images, variants, ratings))
}

/// Group child rows under their products. Products without children get
/// empty arrays.
pub(crate) fn assemble(
    rows: Vec<ProductRow>,
    images: Vec<ImageRow>,
    variants: Vec<VariantRow>,
    ratings: Vec<RatingRow>,
) -> Vec<ProductView> {
    let mut images_by: HashMap<i32, Vec<ProductImage>> = HashMap::new();
    for image in images {
        images_by.entry(image.product_id).or_default().push(ProductImage {
            id: ProductImageId::new(image.id),
            url: image.url,
            sort_order: image.sort_order,
        });
    }

    let mut variants_by: HashMap<i32, Vec<ProductVariant>> = HashMap::new();
    for variant in variants {
        variants_by
            .entry(variant.product_id)
            .or_default()
            .push(ProductVariant {
                id: VariantId::new(variant.id),
                color: variant.color,
                size: variant.size,
                sku: variant.sku,
                stock: variant.stock,
                price: variant.price,
            });
    }

    let mut ratings_by: HashMap<i32, Vec<ProductRating>> = HashMap::new();
    for rating in ratings {
        ratings_by
            .entry(rating.product_id)
            .or_default()
            .push(rating.into_rating());
    }

    rows.into_iter()
        .map(|row| ProductView {
            id: ProductId::new(row.id),
            shop_id: ShopId::new(row.shop_id),
            shop_name: row.shop_name,
            category_id: CategoryId::new(row.category_id),
            category_name: row.category_name,
            brand_id: row.brand_id.map(BrandId::new),
            brand_name: row.brand_name,
            name: row.name,
            description: row.description,
            price: row.price,
            stock: row.stock,
            average_rating: row.average_rating,
            rating_count: row.rating_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
            images: images_by.remove(&row.id).unwrap_or_default(),
            variants: variants_by.remove(&row.id).unwrap_or_default(),
            ratings: ratings_by.remove(&row.id).unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filter::ProductQuery;

    fn filter(json: serde_json::Value) -> ProductFilter {
        ProductFilter::from_query(serde_json::from_value::<ProductQuery>(json).unwrap()).unwrap()
    }

    fn normalized(sql: &str) -> String {
        sql.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_no_filters_orders_by_updated_at() {
        let qb = build_search(&ProductFilter::default());
        let sql = normalized(qb.sql());

        assert!(sql.contains("WHERE p.is_deleted = FALSE ORDER BY p.updated_at DESC, p.id DESC"));
        assert!(sql.ends_with("LIMIT $1 OFFSET $2"));
        assert!(!sql.contains("ANY("));
        assert!(!sql.contains("BETWEEN"));
        assert!(!sql.contains("ILIKE"));
    }

    #[test]
    fn test_each_field_adds_one_predicate() {
        let qb = build_search(&filter(serde_json::json!({
            "shopId": 3,
            "categoryIds": "1,2",
            "brandIds": [5],
            "priceMin": 10,
            "priceMax": "20.5",
            "search": "shoe",
            "minRating": 4
        })));
        let sql = normalized(qb.sql());

        assert!(sql.contains("AND p.shop_id = $1"));
        assert!(sql.contains("AND p.category_id = ANY($2)"));
        assert!(sql.contains("AND p.brand_id = ANY($3)"));
        assert!(sql.contains("AND p.price BETWEEN $4 AND $5"));
        assert!(sql.contains(r"AND p.name ILIKE $6 ESCAPE '\'"));
        assert!(sql.contains("AND COALESCE(r.average_rating, 0) >= $7"));
        assert!(sql.contains("LIMIT $8 OFFSET $9"));
    }

    #[test]
    fn test_price_needs_both_bounds() {
        let sql = build_search(&filter(serde_json::json!({ "priceMin": 10 })))
            .sql()
            .to_string();
        assert!(!sql.contains("BETWEEN"));

        let sql = build_search(&filter(serde_json::json!({ "priceMax": 10 })))
            .sql()
            .to_string();
        assert!(!sql.contains("BETWEEN"));
    }

    #[test]
    fn test_empty_id_list_adds_nothing() {
        let sql = build_search(&filter(serde_json::json!({ "categoryIds": "abc," })))
            .sql()
            .to_string();
        assert!(!sql.contains("ANY("));
    }

    #[test]
    fn test_count_has_no_paging() {
        let sql = normalized(build_count(&filter(serde_json::json!({ "shopId": 1 }))).sql());
        assert!(sql.starts_with("SELECT COUNT(*) FROM products p"));
        assert!(sql.ends_with("AND p.shop_id = $1"));
        assert!(!sql.contains("LIMIT"));
    }

    #[test]
    fn test_find_by_id() {
        let sql = normalized(build_find(ProductId::new(9)).sql());
        assert!(sql.ends_with("WHERE p.is_deleted = FALSE AND p.id = $1"));
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), r"50\%\_off\\");
        assert_eq!(escape_like("plain"), "plain");
    }

    fn product_row(id: i32) -> ProductRow {
        ProductRow {
            id,
            shop_id: 1,
            shop_name: "Shop".into(),
            category_id: 1,
            category_name: "Shoes".into(),
            brand_id: None,
            brand_name: None,
            name: format!("Product {id}"),
            description: None,
            price: Decimal::new(1999, 2),
            stock: 5,
            average_rating: 0.0,
            rating_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_assemble_groups_children_and_keeps_order() {
        let views = assemble(
            vec![product_row(2), product_row(1)],
            vec![ImageRow {
                id: 10,
                product_id: 1,
                url: "a.png".into(),
                sort_order: 0,
            }],
            vec![VariantRow {
                id: 20,
                product_id: 2,
                color: Some("red".into()),
                size: None,
                sku: None,
                stock: 1,
                price: Decimal::new(1999, 2),
            }],
            vec![],
        );

        assert_eq!(views[0].id, ProductId::new(2));
        assert_eq!(views[0].variants.len(), 1);
        assert!(views[0].images.is_empty());
        assert_eq!(views[1].images[0].url, "a.png");
        assert!(views[1].variants.is_empty());
        assert!(views.iter().all(|v| v.ratings.is_empty()));
    }

    #[test]
    fn test_view_serializes_numbers_and_arrays() {
        let view = assemble(vec![product_row(1)], vec![], vec![], vec![]).remove(0);
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["price"], serde_json::json!(19.99));
        assert_eq!(json["images"], serde_json::json!([]));
        assert_eq!(json["variants"], serde_json::json!([]));
        assert_eq!(json["ratings"], serde_json::json!([]));
        assert!(json["createdAt"].as_str().unwrap().contains('T'));
    }
}
