use std::sync::{Arc, Mutex};

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use chrono::{Duration, Utc};
use kernel::id::{BannerId, BrandId, CategoryId, ProductId, RatingId, ShopId, UserId};
use kernel::page::Page;
use platform::token::TokenCodec;
use rust_decimal::Decimal;
use secrecy::SecretString;
use tower::ServiceExt;

use auth::AuthGate;

use crate::application::{
    BannerInput, BannerUseCase, CategoryInput, CategoryUseCase, ImageInput, ProductInput,
    ProductUseCase, RateProductUseCase, RatingInput, ShopInput, ShopUseCase, VariantInput,
};
use crate::domain::entity::{
    banner::{Banner, BannerChanges, NewBanner},
    brand::{Brand, BrandFields},
    category::{Category, CategoryFields},
    product::{
        NewProduct, NewRating, ProductChanges, ProductImage, ProductRating, ProductVariant,
        ProductView,
    },
    shop::{NewShop, Shop, ShopChanges},
};
use crate::domain::filter::{IdList, ProductFilter, ProductQuery};
use crate::domain::repository::{
    BannerRepository, BrandRepository, CategoryRepository, ProductRepository, ShopRepository,
};
use crate::error::{CatalogError, CatalogResult};
use crate::presentation::router::catalog_router_generic;

// ============================================================================
// In-memory catalog
// ============================================================================

#[derive(Default)]
struct Store {
    next_id: i32,
    shops: Vec<Shop>,
    categories: Vec<Category>,
    brands: Vec<Brand>,
    products: Vec<ProductView>,
    ratings: Vec<(ProductId, ProductRating)>,
    banners: Vec<Banner>,
}

impl Store {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Clone, Default)]
struct InMemoryCatalog {
    store: Arc<Mutex<Store>>,
}

impl ShopRepository for InMemoryCatalog {
    async fn list_shops(&self) -> CatalogResult<Vec<Shop>> {
        Ok(self.store.lock().unwrap().shops.clone())
    }

    async fn find_shop(&self, id: ShopId) -> CatalogResult<Option<Shop>> {
        let store = self.store.lock().unwrap();
        Ok(store.shops.iter().find(|s| s.id == id).cloned())
    }

    async fn create_shop(&self, shop: &NewShop) -> CatalogResult<Shop> {
        let mut store = self.store.lock().unwrap();
        let created = Shop {
            id: ShopId::new(store.next_id()),
            owner_id: shop.owner_id,
            name: shop.name.clone(),
            description: shop.description.clone(),
            logo: shop.logo.clone(),
            address: shop.address.clone(),
            phone: shop.phone.clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        store.shops.push(created.clone());
        Ok(created)
    }

    async fn update_shop(&self, id: ShopId, changes: &ShopChanges) -> CatalogResult<Shop> {
        let mut store = self.store.lock().unwrap();
        let shop = store
            .shops
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(CatalogError::NotFound("Shop"))?;
        if let Some(name) = &changes.name {
            shop.name = name.clone();
        }
        Ok(shop.clone())
    }

    async fn delete_shop(&self, id: ShopId) -> CatalogResult<()> {
        let mut store = self.store.lock().unwrap();
        store.shops.retain(|s| s.id != id);
        store.products.retain(|p| p.shop_id != id);
        Ok(())
    }
}

impl CategoryRepository for InMemoryCatalog {
    async fn list_categories(&self) -> CatalogResult<Vec<Category>> {
        Ok(self.store.lock().unwrap().categories.clone())
    }

    async fn find_category(&self, id: CategoryId) -> CatalogResult<Option<Category>> {
        let store = self.store.lock().unwrap();
        Ok(store.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn create_category(&self, fields: &CategoryFields) -> CatalogResult<Category> {
        let mut store = self.store.lock().unwrap();
        let name = fields.name.clone().unwrap_or_default();
        if store
            .categories
            .iter()
            .any(|c| c.name.to_lowercase() == name.to_lowercase())
        {
            return Err(CatalogError::Duplicate("Category name already exists".into()));
        }
        let category = Category {
            id: CategoryId::new(store.next_id()),
            name,
            description: fields.description.clone(),
            image: fields.image.clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        store.categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        id: CategoryId,
        fields: &CategoryFields,
    ) -> CatalogResult<Category> {
        let mut store = self.store.lock().unwrap();
        let category = store
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(CatalogError::NotFound("Category"))?;
        if let Some(name) = &fields.name {
            category.name = name.clone();
        }
        Ok(category.clone())
    }

    async fn delete_category(&self, id: CategoryId) -> CatalogResult<()> {
        let mut store = self.store.lock().unwrap();
        let before = store.categories.len();
        store.categories.retain(|c| c.id != id);
        if store.categories.len() == before {
            return Err(CatalogError::NotFound("Category"));
        }
        Ok(())
    }
}

impl BrandRepository for InMemoryCatalog {
    async fn list_brands(&self) -> CatalogResult<Vec<Brand>> {
        Ok(self.store.lock().unwrap().brands.clone())
    }

    async fn find_brand(&self, id: BrandId) -> CatalogResult<Option<Brand>> {
        let store = self.store.lock().unwrap();
        Ok(store.brands.iter().find(|b| b.id == id).cloned())
    }

    async fn create_brand(&self, fields: &BrandFields) -> CatalogResult<Brand> {
        let mut store = self.store.lock().unwrap();
        let brand = Brand {
            id: BrandId::new(store.next_id()),
            name: fields.name.clone().unwrap_or_default(),
            description: fields.description.clone(),
            logo: fields.logo.clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        store.brands.push(brand.clone());
        Ok(brand)
    }

    async fn update_brand(&self, id: BrandId, _fields: &BrandFields) -> CatalogResult<Brand> {
        self.find_brand(id).await?.ok_or(CatalogError::NotFound("Brand"))
    }

    async fn delete_brand(&self, id: BrandId) -> CatalogResult<()> {
        self.store.lock().unwrap().brands.retain(|b| b.id != id);
        Ok(())
    }
}

impl ProductRepository for InMemoryCatalog {
    async fn search_products(&self, filter: &ProductFilter) -> CatalogResult<Page<ProductView>> {
        let store = self.store.lock().unwrap();
        let mut items: Vec<ProductView> = store
            .products
            .iter()
            .filter(|p| filter.shop_id.is_none_or(|id| p.shop_id == id))
            .filter(|p| filter.category_ids.is_empty() || filter.category_ids.contains(&p.category_id))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        let total = items.len() as i64;
        Ok(Page::new(items, filter.page, total))
    }

    async fn find_product(&self, id: ProductId) -> CatalogResult<Option<ProductView>> {
        let store = self.store.lock().unwrap();
        let Some(mut product) = store.products.iter().find(|p| p.id == id).cloned() else {
            return Ok(None);
        };
        product.ratings = store
            .ratings
            .iter()
            .filter(|(pid, _)| *pid == id)
            .map(|(_, r)| r.clone())
            .collect();
        product.rating_count = product.ratings.len() as i64;
        Ok(Some(product))
    }

    async fn find_product_owner(&self, id: ProductId) -> CatalogResult<Option<UserId>> {
        let store = self.store.lock().unwrap();
        let Some(product) = store.products.iter().find(|p| p.id == id) else {
            return Ok(None);
        };
        Ok(store
            .shops
            .iter()
            .find(|s| s.id == product.shop_id)
            .map(|s| s.owner_id))
    }

    async fn create_product(&self, product: &NewProduct) -> CatalogResult<ProductId> {
        let mut store = self.store.lock().unwrap();
        let id = ProductId::new(store.next_id());
        let mut images: Vec<ProductImage> = Vec::new();
        for image in &product.images {
            images.push(ProductImage {
                id: kernel::id::ProductImageId::new(store.next_id()),
                url: image.url.clone(),
                sort_order: image.sort_order,
            });
        }
        images.sort_by_key(|i| i.sort_order);
        let mut variants = Vec::new();
        for variant in &product.variants {
            variants.push(ProductVariant {
                id: kernel::id::VariantId::new(store.next_id()),
                color: variant.color.clone(),
                size: variant.size.clone(),
                sku: variant.sku.clone(),
                stock: variant.stock,
                price: variant.price.unwrap_or(product.price),
            });
        }
        store.products.push(ProductView {
            id,
            shop_id: product.shop_id,
            shop_name: "Shop".into(),
            category_id: product.category_id,
            category_name: "Category".into(),
            brand_id: product.brand_id,
            brand_name: None,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            stock: product.stock,
            average_rating: 0.0,
            rating_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            images,
            variants,
            ratings: Vec::new(),
        });
        Ok(id)
    }

    async fn update_product(&self, id: ProductId, changes: &ProductChanges) -> CatalogResult<()> {
        let mut store = self.store.lock().unwrap();
        let product = store
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(CatalogError::NotFound("Product"))?;
        if let Some(name) = &changes.name {
            product.name = name.clone();
        }
        if let Some(price) = changes.price {
            product.price = price;
        }
        product.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_product(&self, id: ProductId) -> CatalogResult<()> {
        self.store.lock().unwrap().products.retain(|p| p.id != id);
        Ok(())
    }

    async fn upsert_rating(&self, rating: &NewRating) -> CatalogResult<ProductRating> {
        let mut store = self.store.lock().unwrap();
        store
            .ratings
            .retain(|(pid, r)| !(*pid == rating.product_id && r.user_id == rating.user_id));
        let saved = ProductRating {
            id: RatingId::new(store.next_id()),
            user_id: rating.user_id,
            rating: rating.rating,
            comment: rating.comment.clone(),
            created_at: Utc::now(),
            username: None,
        };
        store.ratings.push((rating.product_id, saved.clone()));
        Ok(saved)
    }
}

impl BannerRepository for InMemoryCatalog {
    async fn list_active_banners(&self) -> CatalogResult<Vec<Banner>> {
        let store = self.store.lock().unwrap();
        Ok(store.banners.iter().filter(|b| b.is_active).cloned().collect())
    }

    async fn find_banner(&self, id: BannerId) -> CatalogResult<Option<Banner>> {
        let store = self.store.lock().unwrap();
        Ok(store.banners.iter().find(|b| b.id == id).cloned())
    }

    async fn create_banner(&self, banner: &NewBanner) -> CatalogResult<Banner> {
        let mut store = self.store.lock().unwrap();
        let created = Banner {
            id: BannerId::new(store.next_id()),
            title: banner.title.clone(),
            image_url: banner.image_url.clone(),
            is_active: banner.is_active,
            product_ids: banner.product_ids.clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        store.banners.push(created.clone());
        Ok(created)
    }

    async fn update_banner(&self, id: BannerId, changes: &BannerChanges) -> CatalogResult<Banner> {
        let mut store = self.store.lock().unwrap();
        let banner = store
            .banners
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(CatalogError::NotFound("Banner"))?;
        if let Some(is_active) = changes.is_active {
            banner.is_active = is_active;
        }
        if let Some(ids) = &changes.product_ids {
            banner.product_ids = ids.clone();
        }
        Ok(banner.clone())
    }

    async fn delete_banner(&self, id: BannerId) -> CatalogResult<()> {
        self.store.lock().unwrap().banners.retain(|b| b.id != id);
        Ok(())
    }
}

// ============================================================================
// Helpers
// ============================================================================

const ALICE: UserId = UserId::new(1);
const BOB: UserId = UserId::new(2);

fn shop_input(name: &str) -> ShopInput {
    ShopInput {
        name: Some(name.into()),
        ..Default::default()
    }
}

fn product_input(shop_id: ShopId) -> ProductInput {
    ProductInput {
        shop_id: Some(shop_id.as_i32()),
        category_id: Some(1),
        name: Some("Runner".into()),
        price: Some(Decimal::new(4999, 2)),
        stock: Some(10),
        images: Some(vec![
            ImageInput {
                url: "b.png".into(),
                sort_order: Some(2),
            },
            ImageInput {
                url: "a.png".into(),
                sort_order: Some(1),
            },
        ]),
        variants: Some(vec![
            VariantInput {
                color: Some("red".into()),
                stock: Some(3),
                ..Default::default()
            },
            VariantInput {
                color: Some("gold".into()),
                stock: Some(1),
                price: Some(Decimal::new(5999, 2)),
                ..Default::default()
            },
        ]),
        ..Default::default()
    }
}

async fn seeded_shop(repo: &Arc<InMemoryCatalog>, owner: UserId) -> Shop {
    ShopUseCase::new(repo.clone())
        .create(owner, shop_input("Alice's"))
        .await
        .unwrap()
}

// ============================================================================
// Use cases
// ============================================================================

#[tokio::test]
async fn only_owner_can_change_shop() {
    let repo = Arc::new(InMemoryCatalog::default());
    let shop = seeded_shop(&repo, ALICE).await;
    let shops = ShopUseCase::new(repo.clone());

    let err = shops
        .update(BOB, shop.id, shop_input("Bob's now"))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Forbidden(_)));

    let err = shops.delete(BOB, shop.id).await.unwrap_err();
    assert!(matches!(err, CatalogError::Forbidden(_)));

    let renamed = shops
        .update(ALICE, shop.id, shop_input("Renamed"))
        .await
        .unwrap();
    assert_eq!(renamed.name, "Renamed");
}

#[tokio::test]
async fn shop_name_is_required() {
    let repo = Arc::new(InMemoryCatalog::default());
    let err = ShopUseCase::new(repo)
        .create(ALICE, shop_input("   "))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Validation(_)));
}

#[tokio::test]
async fn product_create_requires_shop_ownership() {
    let repo = Arc::new(InMemoryCatalog::default());
    let shop = seeded_shop(&repo, ALICE).await;
    let products = ProductUseCase::new(repo.clone());

    let err = products
        .create(BOB, product_input(shop.id))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Forbidden(_)));

    let err = products
        .create(ALICE, product_input(ShopId::new(999)))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound("Shop")));
}

#[tokio::test]
async fn product_create_returns_nested_view() {
    let repo = Arc::new(InMemoryCatalog::default());
    let shop = seeded_shop(&repo, ALICE).await;

    let product = ProductUseCase::new(repo.clone())
        .create(ALICE, product_input(shop.id))
        .await
        .unwrap();

    let urls: Vec<&str> = product.images.iter().map(|i| i.url.as_str()).collect();
    assert_eq!(urls, vec!["a.png", "b.png"]);
    assert_eq!(product.variants[0].price, Decimal::new(4999, 2));
    assert_eq!(product.variants[1].price, Decimal::new(5999, 2));
    assert!(product.ratings.is_empty());
}

#[tokio::test]
async fn product_price_and_stock_must_be_non_negative() {
    let repo = Arc::new(InMemoryCatalog::default());
    let shop = seeded_shop(&repo, ALICE).await;
    let products = ProductUseCase::new(repo.clone());

    let mut input = product_input(shop.id);
    input.price = Some(Decimal::new(-1, 0));
    assert!(matches!(
        products.create(ALICE, input).await.unwrap_err(),
        CatalogError::Validation(_)
    ));

    let mut input = product_input(shop.id);
    input.stock = Some(-5);
    assert!(matches!(
        products.create(ALICE, input).await.unwrap_err(),
        CatalogError::Validation(_)
    ));
}

#[tokio::test]
async fn only_owner_can_update_or_delete_product() {
    let repo = Arc::new(InMemoryCatalog::default());
    let shop = seeded_shop(&repo, ALICE).await;
    let products = ProductUseCase::new(repo.clone());
    let product = products.create(ALICE, product_input(shop.id)).await.unwrap();

    let rename = ProductInput {
        name: Some("Trail Runner".into()),
        ..Default::default()
    };
    let err = products
        .update(BOB, product.id, rename.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Forbidden(_)));

    let updated = products.update(ALICE, product.id, rename).await.unwrap();
    assert_eq!(updated.name, "Trail Runner");
    assert_eq!(updated.price, Decimal::new(4999, 2));

    assert!(products.delete(BOB, product.id).await.is_err());
    products.delete(ALICE, product.id).await.unwrap();
    assert!(matches!(
        products.get(product.id).await.unwrap_err(),
        CatalogError::NotFound("Product")
    ));
}

#[tokio::test]
async fn search_rejects_out_of_range_rating() {
    let repo = Arc::new(InMemoryCatalog::default());
    let query = ProductQuery {
        min_rating: Some(6.0),
        ..Default::default()
    };
    let err = ProductUseCase::new(repo).search(query).await.unwrap_err();
    assert!(matches!(err, CatalogError::Validation(_)));
}

#[tokio::test]
async fn rating_is_validated_and_replaced() {
    let repo = Arc::new(InMemoryCatalog::default());
    let shop = seeded_shop(&repo, ALICE).await;
    let product = ProductUseCase::new(repo.clone())
        .create(ALICE, product_input(shop.id))
        .await
        .unwrap();
    let rate = RateProductUseCase::new(repo.clone());

    for bad in [0, 6] {
        let input = RatingInput {
            rating: bad,
            comment: None,
        };
        assert!(matches!(
            rate.execute(BOB, product.id, input).await.unwrap_err(),
            CatalogError::Validation(_)
        ));
    }

    let missing = rate
        .execute(
            BOB,
            ProductId::new(999),
            RatingInput {
                rating: 5,
                comment: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(missing, CatalogError::NotFound("Product")));

    for value in [2, 4] {
        rate.execute(
            BOB,
            product.id,
            RatingInput {
                rating: value,
                comment: Some("ok".into()),
            },
        )
        .await
        .unwrap();
    }

    let view = ProductUseCase::new(repo).get(product.id).await.unwrap();
    assert_eq!(view.ratings.len(), 1);
    assert_eq!(view.ratings[0].rating, 4);
}

#[tokio::test]
async fn duplicate_category_name_is_bad_request() {
    let repo = Arc::new(InMemoryCatalog::default());
    let categories = CategoryUseCase::new(repo);
    let input = CategoryInput {
        name: Some("Shoes".into()),
        ..Default::default()
    };
    categories.create(input).await.unwrap();

    let err = categories
        .create(CategoryInput {
            name: Some("shoes".into()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.to_app_error().status_code(), 400);
    assert_eq!(err.to_string(), "Category name already exists");
}

#[tokio::test]
async fn banner_keeps_product_order_without_duplicates() {
    let repo = Arc::new(InMemoryCatalog::default());
    let banners = BannerUseCase::new(repo);

    let banner = banners
        .create(BannerInput {
            title: Some("Summer".into()),
            product_ids: Some(IdList::parse_csv("3,3,1,abc,2")),
            ..Default::default()
        })
        .await
        .unwrap();
    let ids: Vec<i32> = banner.product_ids.iter().map(|id| id.as_i32()).collect();
    assert_eq!(ids, vec![3, 1, 2]);
    assert!(banner.is_active);

    banners
        .update(
            banner.id,
            BannerInput {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(banners.list_active().await.unwrap().is_empty());
}

// ============================================================================
// HTTP
// ============================================================================

const SECRET: &str = "catalog-test-secret-catalog-test-secret";

fn tokens() -> Arc<TokenCodec> {
    Arc::new(TokenCodec::new(&SecretString::from(SECRET.to_owned()), Duration::days(1)).unwrap())
}

fn app() -> axum::Router {
    let router = catalog_router_generic(InMemoryCatalog::default(), AuthGate::new(tokens()));
    axum::Router::new().nest("/api", router)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn public_listing_needs_no_token() {
    let response = app()
        .oneshot(
            Request::get("/api/products?categoryIds=1,2&page=2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["items"], serde_json::json!([]));
    assert_eq!(body["page"], 2);
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn blank_filter_values_are_ignored() {
    for uri in [
        "/api/products?priceMin=&priceMax=",
        "/api/products?shopId=",
        "/api/products?minRating=",
        "/api/products?priceMin=&priceMax=&shopId=&minRating=&page=&limit=",
        "/api/products?categoryIds=1,2,3&brandIds=",
    ] {
        let response = app()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        let body = body_json(response).await;
        assert_eq!(body["page"], 1, "{uri}");
    }

    let response = app()
        .oneshot(
            Request::get("/api/products?shopId=abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn writes_without_token_are_unauthorized() {
    let response = app()
        .oneshot(
            Request::post("/api/products")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Token missing!");
}

#[tokio::test]
async fn non_numeric_id_is_bad_request() {
    let response = app()
        .oneshot(Request::get("/api/shops/abc").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn created_shop_belongs_to_caller() {
    let app = app();
    let token = tokens().issue(7, "carol@example.com").unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::post("/api/shops")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"name":"Carol's Corner"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let shop = body_json(response).await;
    assert_eq!(shop["ownerId"], 7);

    let response = app
        .oneshot(
            Request::get(format!("/api/shops/{}", shop["id"]))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["name"], "Carol's Corner");
}
