//! PostgreSQL Repository Implementation

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use kernel::id::{BannerId, BrandId, CategoryId, ProductId, ShopId, UserId};
use kernel::page::Page;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};

use crate::domain::entity::{
    banner::{Banner, BannerChanges, NewBanner},
    brand::{Brand, BrandFields},
    category::{Category, CategoryFields},
    product::{
        NewProduct, NewProductImage, NewRating, NewVariant, ProductChanges, ProductRating,
        ProductView,
    },
    shop::{NewShop, Shop, ShopChanges},
};
use crate::domain::filter::ProductFilter;
use crate::domain::repository::{
    BannerRepository, BrandRepository, CategoryRepository, ProductRepository, ShopRepository,
};
use crate::error::{CatalogError, CatalogResult, map_write_error};
use crate::infra::product_query::{self, ProductRow, RatingRow};

const SHOP_COLUMNS: &str =
    "id, owner_id, name, description, logo, address, phone, created_at, updated_at";
const CATEGORY_COLUMNS: &str = "id, name, description, image, created_at, updated_at";
const BRAND_COLUMNS: &str = "id, name, description, logo, created_at, updated_at";
const BANNER_COLUMNS: &str = "id, title, image_url, is_active, created_at, updated_at";

const DUPLICATE_CATEGORY: &str = "Category name already exists";
const DUPLICATE_BRAND: &str = "Brand name already exists";
const DUPLICATE_PRODUCT: &str = "Duplicate product data";

/// PostgreSQL-backed catalog
#[derive(Clone)]
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Shops
// ============================================================================

impl ShopRepository for PgCatalogRepository {
    async fn list_shops(&self) -> CatalogResult<Vec<Shop>> {
        let sql = format!(
            "SELECT {SHOP_COLUMNS} FROM shops WHERE is_deleted = FALSE ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, ShopRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(ShopRow::into_shop).collect())
    }

    async fn find_shop(&self, id: ShopId) -> CatalogResult<Option<Shop>> {
        let sql = format!("SELECT {SHOP_COLUMNS} FROM shops WHERE id = $1 AND is_deleted = FALSE");
        let row = sqlx::query_as::<_, ShopRow>(&sql)
            .bind(id.as_i32())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(ShopRow::into_shop))
    }

    async fn create_shop(&self, shop: &NewShop) -> CatalogResult<Shop> {
        let sql = format!(
            r#"
            INSERT INTO shops (owner_id, name, description, logo, address, phone)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {SHOP_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, ShopRow>(&sql)
            .bind(shop.owner_id.as_i32())
            .bind(&shop.name)
            .bind(&shop.description)
            .bind(&shop.logo)
            .bind(&shop.address)
            .bind(&shop.phone)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "Shop already exists"))?;

        Ok(row.into_shop())
    }

    async fn update_shop(&self, id: ShopId, changes: &ShopChanges) -> CatalogResult<Shop> {
        let sql = format!(
            r#"
            UPDATE shops SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                logo = COALESCE($4, logo),
                address = COALESCE($5, address),
                phone = COALESCE($6, phone),
                updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING {SHOP_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, ShopRow>(&sql)
            .bind(id.as_i32())
            .bind(&changes.name)
            .bind(&changes.description)
            .bind(&changes.logo)
            .bind(&changes.address)
            .bind(&changes.phone)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "Shop already exists"))?;

        row.map(ShopRow::into_shop)
            .ok_or(CatalogError::NotFound("Shop"))
    }

    async fn delete_shop(&self, id: ShopId) -> CatalogResult<()> {
        soft_delete(&self.pool, "shops", id.as_i32(), "Shop").await
    }
}

// ============================================================================
// Categories and brands
// ============================================================================

impl CategoryRepository for PgCatalogRepository {
    async fn list_categories(&self) -> CatalogResult<Vec<Category>> {
        let sql = format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE is_deleted = FALSE ORDER BY name, id"
        );
        let rows = sqlx::query_as::<_, CategoryRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(CategoryRow::into_category).collect())
    }

    async fn find_category(&self, id: CategoryId) -> CatalogResult<Option<Category>> {
        let sql = format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1 AND is_deleted = FALSE"
        );
        let row = sqlx::query_as::<_, CategoryRow>(&sql)
            .bind(id.as_i32())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(CategoryRow::into_category))
    }

    async fn create_category(&self, fields: &CategoryFields) -> CatalogResult<Category> {
        let sql = format!(
            r#"
            INSERT INTO categories (name, description, image)
            VALUES ($1, $2, $3)
            RETURNING {CATEGORY_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, CategoryRow>(&sql)
            .bind(&fields.name)
            .bind(&fields.description)
            .bind(&fields.image)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, DUPLICATE_CATEGORY))?;

        Ok(row.into_category())
    }

    async fn update_category(
        &self,
        id: CategoryId,
        fields: &CategoryFields,
    ) -> CatalogResult<Category> {
        let sql = format!(
            r#"
            UPDATE categories SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                image = COALESCE($4, image),
                updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING {CATEGORY_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, CategoryRow>(&sql)
            .bind(id.as_i32())
            .bind(&fields.name)
            .bind(&fields.description)
            .bind(&fields.image)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, DUPLICATE_CATEGORY))?;

        row.map(CategoryRow::into_category)
            .ok_or(CatalogError::NotFound("Category"))
    }

    async fn delete_category(&self, id: CategoryId) -> CatalogResult<()> {
        soft_delete(&self.pool, "categories", id.as_i32(), "Category").await
    }
}

impl BrandRepository for PgCatalogRepository {
    async fn list_brands(&self) -> CatalogResult<Vec<Brand>> {
        let sql =
            format!("SELECT {BRAND_COLUMNS} FROM brands WHERE is_deleted = FALSE ORDER BY name, id");
        let rows = sqlx::query_as::<_, BrandRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(BrandRow::into_brand).collect())
    }

    async fn find_brand(&self, id: BrandId) -> CatalogResult<Option<Brand>> {
        let sql = format!("SELECT {BRAND_COLUMNS} FROM brands WHERE id = $1 AND is_deleted = FALSE");
        let row = sqlx::query_as::<_, BrandRow>(&sql)
            .bind(id.as_i32())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(BrandRow::into_brand))
    }

    async fn create_brand(&self, fields: &BrandFields) -> CatalogResult<Brand> {
        let sql = format!(
            "INSERT INTO brands (name, description, logo) VALUES ($1, $2, $3) RETURNING {BRAND_COLUMNS}"
        );
        let row = sqlx::query_as::<_, BrandRow>(&sql)
            .bind(&fields.name)
            .bind(&fields.description)
            .bind(&fields.logo)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, DUPLICATE_BRAND))?;

        Ok(row.into_brand())
    }

    async fn update_brand(&self, id: BrandId, fields: &BrandFields) -> CatalogResult<Brand> {
        let sql = format!(
            r#"
            UPDATE brands SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                logo = COALESCE($4, logo),
                updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING {BRAND_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, BrandRow>(&sql)
            .bind(id.as_i32())
            .bind(&fields.name)
            .bind(&fields.description)
            .bind(&fields.logo)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, DUPLICATE_BRAND))?;

        row.map(BrandRow::into_brand)
            .ok_or(CatalogError::NotFound("Brand"))
    }

    async fn delete_brand(&self, id: BrandId) -> CatalogResult<()> {
        soft_delete(&self.pool, "brands", id.as_i32(), "Brand").await
    }
}

// ============================================================================
// Products
// ============================================================================

impl ProductRepository for PgCatalogRepository {
    async fn search_products(&self, filter: &ProductFilter) -> CatalogResult<Page<ProductView>> {
        let mut count = product_query::build_count(filter);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut search = product_query::build_search(filter);
        let rows: Vec<ProductRow> = search.build_query_as().fetch_all(&self.pool).await?;

        let items = product_query::load_views(&self.pool, rows).await?;
        Ok(Page::new(items, filter.page, total))
    }

    async fn find_product(&self, id: ProductId) -> CatalogResult<Option<ProductView>> {
        let mut find = product_query::build_find(id);
        let row: Option<ProductRow> = find.build_query_as().fetch_optional(&self.pool).await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut views = product_query::load_views(&self.pool, vec![row]).await?;
        Ok(views.pop())
    }

    async fn find_product_owner(&self, id: ProductId) -> CatalogResult<Option<UserId>> {
        let owner: Option<i32> = sqlx::query_scalar(
            r#"
            SELECT s.owner_id
            FROM products p
            JOIN shops s ON s.id = p.shop_id AND s.is_deleted = FALSE
            WHERE p.id = $1 AND p.is_deleted = FALSE
            "#,
        )
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        Ok(owner.map(UserId::new))
    }

    async fn create_product(&self, product: &NewProduct) -> CatalogResult<ProductId> {
        let mut tx = self.pool.begin().await?;

        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO products (shop_id, category_id, brand_id, name, description, price, stock)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(product.shop_id.as_i32())
        .bind(product.category_id.as_i32())
        .bind(product.brand_id.map(|b| b.as_i32()))
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.stock)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, DUPLICATE_PRODUCT))?;

        insert_images(&mut tx, id, &product.images).await?;
        insert_variants(&mut tx, id, &product.variants).await?;
        tx.commit().await?;

        Ok(ProductId::new(id))
    }

    async fn update_product(&self, id: ProductId, changes: &ProductChanges) -> CatalogResult<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE products SET
                category_id = COALESCE($2, category_id),
                brand_id = COALESCE($3, brand_id),
                name = COALESCE($4, name),
                description = COALESCE($5, description),
                price = COALESCE($6, price),
                stock = COALESCE($7, stock),
                updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(id.as_i32())
        .bind(changes.category_id.map(|c| c.as_i32()))
        .bind(changes.brand_id.map(|b| b.as_i32()))
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(changes.price)
        .bind(changes.stock)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, DUPLICATE_PRODUCT))?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound("Product"));
        }

        if let Some(images) = &changes.images {
            sqlx::query(
                "UPDATE product_images SET is_deleted = TRUE, updated_at = NOW() WHERE product_id = $1 AND is_deleted = FALSE",
            )
            .bind(id.as_i32())
            .execute(&mut *tx)
            .await?;
            insert_images(&mut tx, id.as_i32(), images).await?;
        }

        // Old variants stay referenced by carts and orders, so they are
        // retired rather than removed.
        if let Some(variants) = &changes.variants {
            sqlx::query(
                "UPDATE product_variants SET is_deleted = TRUE, updated_at = NOW() WHERE product_id = $1 AND is_deleted = FALSE",
            )
            .bind(id.as_i32())
            .execute(&mut *tx)
            .await?;
            insert_variants(&mut tx, id.as_i32(), variants).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn delete_product(&self, id: ProductId) -> CatalogResult<()> {
        soft_delete(&self.pool, "products", id.as_i32(), "Product").await
    }

    async fn upsert_rating(&self, rating: &NewRating) -> CatalogResult<ProductRating> {
        let row = sqlx::query_as::<_, RatingRow>(
            r#"
            WITH saved AS (
                INSERT INTO product_ratings (product_id, user_id, rating, comment)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (product_id, user_id) DO UPDATE SET
                    rating = EXCLUDED.rating,
                    comment = EXCLUDED.comment,
                    is_deleted = FALSE,
                    updated_at = NOW()
                RETURNING id, product_id, user_id, rating, comment, created_at
            )
            SELECT saved.id, saved.product_id, saved.user_id, saved.rating, saved.comment,
                   saved.created_at, u.username
            FROM saved
            LEFT JOIN users u ON u.id = saved.user_id AND u.is_deleted = FALSE
            "#,
        )
        .bind(rating.product_id.as_i32())
        .bind(rating.user_id.as_i32())
        .bind(rating.rating)
        .bind(&rating.comment)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Rating already exists"))?;

        Ok(row.into_rating())
    }
}

async fn insert_images(
    tx: &mut Transaction<'_, Postgres>,
    product_id: i32,
    images: &[NewProductImage],
) -> CatalogResult<()> {
    if images.is_empty() {
        return Ok(());
    }

    let mut qb = QueryBuilder::<Postgres>::new(
        "INSERT INTO product_images (product_id, url, sort_order) ",
    );
    qb.push_values(images, |mut b, image| {
        b.push_bind(product_id)
            .push_bind(&image.url)
            .push_bind(image.sort_order);
    });
    qb.build().execute(&mut **tx).await?;
    Ok(())
}

async fn insert_variants(
    tx: &mut Transaction<'_, Postgres>,
    product_id: i32,
    variants: &[NewVariant],
) -> CatalogResult<()> {
    if variants.is_empty() {
        return Ok(());
    }

    let mut qb = QueryBuilder::<Postgres>::new(
        "INSERT INTO product_variants (product_id, color, size, sku, stock, price) ",
    );
    qb.push_values(variants, |mut b, variant| {
        b.push_bind(product_id)
            .push_bind(&variant.color)
            .push_bind(&variant.size)
            .push_bind(&variant.sku)
            .push_bind(variant.stock)
            .push_bind(variant.price);
    });
    qb.build()
        .execute(&mut **tx)
        .await
        .map_err(|e| map_write_error(e, "Variant SKU already exists"))?;
    Ok(())
}

// ============================================================================
// Banners
// ============================================================================

impl BannerRepository for PgCatalogRepository {
    async fn list_active_banners(&self) -> CatalogResult<Vec<Banner>> {
        let sql = format!(
            r#"
            SELECT {BANNER_COLUMNS} FROM banners
            WHERE is_active = TRUE AND is_deleted = FALSE
            ORDER BY created_at DESC, id DESC
            "#
        );
        let rows = sqlx::query_as::<_, BannerRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        self.attach_products(rows).await
    }

    async fn find_banner(&self, id: BannerId) -> CatalogResult<Option<Banner>> {
        let sql =
            format!("SELECT {BANNER_COLUMNS} FROM banners WHERE id = $1 AND is_deleted = FALSE");
        let row = sqlx::query_as::<_, BannerRow>(&sql)
            .bind(id.as_i32())
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(self.attach_products(vec![row]).await?.pop())
    }

    async fn create_banner(&self, banner: &NewBanner) -> CatalogResult<Banner> {
        let mut tx = self.pool.begin().await?;

        let id: i32 = sqlx::query_scalar(
            "INSERT INTO banners (title, image_url, is_active) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&banner.title)
        .bind(&banner.image_url)
        .bind(banner.is_active)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Banner already exists"))?;

        link_products(&mut tx, id, &banner.product_ids).await?;
        tx.commit().await?;

        self.find_banner(BannerId::new(id))
            .await?
            .ok_or(CatalogError::NotFound("Banner"))
    }

    async fn update_banner(&self, id: BannerId, changes: &BannerChanges) -> CatalogResult<Banner> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE banners SET
                title = COALESCE($2, title),
                image_url = COALESCE($3, image_url),
                is_active = COALESCE($4, is_active),
                updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(id.as_i32())
        .bind(&changes.title)
        .bind(&changes.image_url)
        .bind(changes.is_active)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound("Banner"));
        }

        if let Some(product_ids) = &changes.product_ids {
            sqlx::query(
                "UPDATE banner_products SET is_deleted = TRUE WHERE banner_id = $1 AND is_deleted = FALSE",
            )
            .bind(id.as_i32())
            .execute(&mut *tx)
            .await?;
            link_products(&mut tx, id.as_i32(), product_ids).await?;
        }

        tx.commit().await?;

        self.find_banner(id)
            .await?
            .ok_or(CatalogError::NotFound("Banner"))
    }

    async fn delete_banner(&self, id: BannerId) -> CatalogResult<()> {
        soft_delete(&self.pool, "banners", id.as_i32(), "Banner").await
    }
}

impl PgCatalogRepository {
    async fn attach_products(&self, rows: Vec<BannerRow>) -> CatalogResult<Vec<Banner>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();

        let links: Vec<(i32, i32)> = sqlx::query_as(
            r#"
            SELECT banner_id, product_id FROM banner_products
            WHERE banner_id = ANY($1) AND is_deleted = FALSE
            ORDER BY banner_id, sort_order, id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_banner: HashMap<i32, Vec<ProductId>> = HashMap::new();
        for (banner_id, product_id) in links {
            by_banner
                .entry(banner_id)
                .or_default()
                .push(ProductId::new(product_id));
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let product_ids = by_banner.remove(&row.id).unwrap_or_default();
                row.into_banner(product_ids)
            })
            .collect())
    }
}

async fn link_products(
    tx: &mut Transaction<'_, Postgres>,
    banner_id: i32,
    product_ids: &[ProductId],
) -> CatalogResult<()> {
    if product_ids.is_empty() {
        return Ok(());
    }

    let mut qb = QueryBuilder::<Postgres>::new(
        "INSERT INTO banner_products (banner_id, product_id, sort_order) ",
    );
    qb.push_values(product_ids.iter().enumerate(), |mut b, (position, product_id)| {
        b.push_bind(banner_id)
            .push_bind(product_id.as_i32())
            .push_bind(i32::try_from(position).unwrap_or(i32::MAX));
    });
    qb.build()
        .execute(&mut **tx)
        .await
        .map_err(|e| map_write_error(e, "Product listed twice"))?;
    Ok(())
}

/// Mark one live row deleted; `NotFound` when nothing matched
async fn soft_delete(
    pool: &PgPool,
    table: &'static str,
    id: i32,
    entity: &'static str,
) -> CatalogResult<()> {
    let sql = format!(
        "UPDATE {table} SET is_deleted = TRUE, updated_at = NOW() WHERE id = $1 AND is_deleted = FALSE"
    );
    let result = sqlx::query(&sql).bind(id).execute(pool).await?;

    if result.rows_affected() == 0 {
        return Err(CatalogError::NotFound(entity));
    }
    Ok(())
}

// ============================================================================
// Rows
// ============================================================================

#[derive(sqlx::FromRow)]
struct ShopRow {
    id: i32,
    owner_id: i32,
    name: String,
    description: Option<String>,
    logo: Option<String>,
    address: Option<String>,
    phone: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ShopRow {
    fn into_shop(self) -> Shop {
        Shop {
            id: ShopId::new(self.id),
            owner_id: UserId::new(self.owner_id),
            name: self.name,
            description: self.description,
            logo: self.logo,
            address: self.address,
            phone: self.phone,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: i32,
    name: String,
    description: Option<String>,
    image: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CategoryRow {
    fn into_category(self) -> Category {
        Category {
            id: CategoryId::new(self.id),
            name: self.name,
            description: self.description,
            image: self.image,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct BrandRow {
    id: i32,
    name: String,
    description: Option<String>,
    logo: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BrandRow {
    fn into_brand(self) -> Brand {
        Brand {
            id: BrandId::new(self.id),
            name: self.name,
            description: self.description,
            logo: self.logo,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct BannerRow {
    id: i32,
    title: String,
    image_url: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BannerRow {
    fn into_banner(self, product_ids: Vec<ProductId>) -> Banner {
        Banner {
            id: BannerId::new(self.id),
            title: self.title,
            image_url: self.image_url,
            is_active: self.is_active,
            product_ids,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
