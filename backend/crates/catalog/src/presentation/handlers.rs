//! HTTP Handlers

use std::sync::Arc;

use auth::CurrentUser;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use kernel::extract::{AppJson, AppPath, AppQuery};
use kernel::id::{BannerId, BrandId, CategoryId, ProductId, ShopId};
use kernel::page::Page;

use crate::application::{
    BannerInput, BannerUseCase, BrandInput, BrandUseCase, CategoryInput, CategoryUseCase,
    ProductInput, ProductUseCase, RateProductUseCase, RatingInput, ShopInput, ShopUseCase,
};
use crate::domain::entity::{
    banner::Banner, brand::Brand, category::Category, product::ProductRating,
    product::ProductView, shop::Shop,
};
use crate::domain::filter::ProductQuery;
use crate::domain::repository::CatalogRepository;
use crate::error::CatalogResult;
use crate::presentation::dto::MessageResponse;

/// Shared state for catalog handlers
#[derive(Clone)]
pub struct CatalogAppState<R: CatalogRepository> {
    pub repo: Arc<R>,
}

// ============================================================================
// Products
// ============================================================================

/// GET /api/products
pub async fn list_products<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    AppQuery(query): AppQuery<ProductQuery>,
) -> CatalogResult<Json<Page<ProductView>>> {
    let page = ProductUseCase::new(state.repo.clone()).search(query).await?;
    Ok(Json(page))
}

/// POST /api/products/search
pub async fn search_products<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    AppJson(query): AppJson<ProductQuery>,
) -> CatalogResult<Json<Page<ProductView>>> {
    let page = ProductUseCase::new(state.repo.clone()).search(query).await?;
    Ok(Json(page))
}

/// GET /api/products/{id}
pub async fn get_product<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    AppPath(id): AppPath<i32>,
) -> CatalogResult<Json<ProductView>> {
    let product = ProductUseCase::new(state.repo.clone())
        .get(ProductId::new(id))
        .await?;
    Ok(Json(product))
}

/// POST /api/products
pub async fn create_product<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    user: CurrentUser,
    AppJson(input): AppJson<ProductInput>,
) -> CatalogResult<(StatusCode, Json<ProductView>)> {
    let product = ProductUseCase::new(state.repo.clone())
        .create(user.id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /api/products/{id}
pub async fn update_product<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    user: CurrentUser,
    AppPath(id): AppPath<i32>,
    AppJson(input): AppJson<ProductInput>,
) -> CatalogResult<Json<ProductView>> {
    let product = ProductUseCase::new(state.repo.clone())
        .update(user.id, ProductId::new(id), input)
        .await?;
    Ok(Json(product))
}

/// DELETE /api/products/{id}
pub async fn delete_product<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    user: CurrentUser,
    AppPath(id): AppPath<i32>,
) -> CatalogResult<Json<MessageResponse>> {
    ProductUseCase::new(state.repo.clone())
        .delete(user.id, ProductId::new(id))
        .await?;
    Ok(Json(MessageResponse::new("Product deleted successfully")))
}

/// POST /api/products/{id}/ratings
pub async fn rate_product<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    user: CurrentUser,
    AppPath(id): AppPath<i32>,
    AppJson(input): AppJson<RatingInput>,
) -> CatalogResult<Json<ProductRating>> {
    let rating = RateProductUseCase::new(state.repo.clone())
        .execute(user.id, ProductId::new(id), input)
        .await?;
    Ok(Json(rating))
}

// ============================================================================
// Shops
// ============================================================================

/// GET /api/shops
pub async fn list_shops<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
) -> CatalogResult<Json<Vec<Shop>>> {
    Ok(Json(ShopUseCase::new(state.repo.clone()).list().await?))
}

/// GET /api/shops/{id}
pub async fn get_shop<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    AppPath(id): AppPath<i32>,
) -> CatalogResult<Json<Shop>> {
    let shop = ShopUseCase::new(state.repo.clone())
        .get(ShopId::new(id))
        .await?;
    Ok(Json(shop))
}

/// POST /api/shops
pub async fn create_shop<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    user: CurrentUser,
    AppJson(input): AppJson<ShopInput>,
) -> CatalogResult<(StatusCode, Json<Shop>)> {
    let shop = ShopUseCase::new(state.repo.clone())
        .create(user.id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(shop)))
}

/// PUT /api/shops/{id}
pub async fn update_shop<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    user: CurrentUser,
    AppPath(id): AppPath<i32>,
    AppJson(input): AppJson<ShopInput>,
) -> CatalogResult<Json<Shop>> {
    let shop = ShopUseCase::new(state.repo.clone())
        .update(user.id, ShopId::new(id), input)
        .await?;
    Ok(Json(shop))
}

/// DELETE /api/shops/{id}
pub async fn delete_shop<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    user: CurrentUser,
    AppPath(id): AppPath<i32>,
) -> CatalogResult<Json<MessageResponse>> {
    ShopUseCase::new(state.repo.clone())
        .delete(user.id, ShopId::new(id))
        .await?;
    Ok(Json(MessageResponse::new("Shop deleted successfully")))
}

// ============================================================================
// Categories
// ============================================================================

/// GET /api/categories
pub async fn list_categories<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
) -> CatalogResult<Json<Vec<Category>>> {
    Ok(Json(CategoryUseCase::new(state.repo.clone()).list().await?))
}

/// GET /api/categories/{id}
pub async fn get_category<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    AppPath(id): AppPath<i32>,
) -> CatalogResult<Json<Category>> {
    let category = CategoryUseCase::new(state.repo.clone())
        .get(CategoryId::new(id))
        .await?;
    Ok(Json(category))
}

/// POST /api/categories
pub async fn create_category<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    _user: CurrentUser,
    AppJson(input): AppJson<CategoryInput>,
) -> CatalogResult<(StatusCode, Json<Category>)> {
    let category = CategoryUseCase::new(state.repo.clone())
        .create(input)
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/categories/{id}
pub async fn update_category<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    _user: CurrentUser,
    AppPath(id): AppPath<i32>,
    AppJson(input): AppJson<CategoryInput>,
) -> CatalogResult<Json<Category>> {
    let category = CategoryUseCase::new(state.repo.clone())
        .update(CategoryId::new(id), input)
        .await?;
    Ok(Json(category))
}

/// DELETE /api/categories/{id}
pub async fn delete_category<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    _user: CurrentUser,
    AppPath(id): AppPath<i32>,
) -> CatalogResult<Json<MessageResponse>> {
    CategoryUseCase::new(state.repo.clone())
        .delete(CategoryId::new(id))
        .await?;
    Ok(Json(MessageResponse::new("Category deleted successfully")))
}

// ============================================================================
// Brands
// ============================================================================

/// GET /api/brands
pub async fn list_brands<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
) -> CatalogResult<Json<Vec<Brand>>> {
    Ok(Json(BrandUseCase::new(state.repo.clone()).list().await?))
}

/// GET /api/brands/{id}
pub async fn get_brand<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    AppPath(id): AppPath<i32>,
) -> CatalogResult<Json<Brand>> {
    let brand = BrandUseCase::new(state.repo.clone())
        .get(BrandId::new(id))
        .await?;
    Ok(Json(brand))
}

/// POST /api/brands
pub async fn create_brand<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    _user: CurrentUser,
    AppJson(input): AppJson<BrandInput>,
) -> CatalogResult<(StatusCode, Json<Brand>)> {
    let brand = BrandUseCase::new(state.repo.clone()).create(input).await?;
    Ok((StatusCode::CREATED, Json(brand)))
}

/// PUT /api/brands/{id}
pub async fn update_brand<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    _user: CurrentUser,
    AppPath(id): AppPath<i32>,
    AppJson(input): AppJson<BrandInput>,
) -> CatalogResult<Json<Brand>> {
    let brand = BrandUseCase::new(state.repo.clone())
        .update(BrandId::new(id), input)
        .await?;
    Ok(Json(brand))
}

/// DELETE /api/brands/{id}
pub async fn delete_brand<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    _user: CurrentUser,
    AppPath(id): AppPath<i32>,
) -> CatalogResult<Json<MessageResponse>> {
    BrandUseCase::new(state.repo.clone())
        .delete(BrandId::new(id))
        .await?;
    Ok(Json(MessageResponse::new("Brand deleted successfully")))
}

// ============================================================================
// Banners
// ============================================================================

/// GET /api/banners
pub async fn list_banners<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
) -> CatalogResult<Json<Vec<Banner>>> {
    Ok(Json(
        BannerUseCase::new(state.repo.clone()).list_active().await?,
    ))
}

/// GET /api/banners/{id}
pub async fn get_banner<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    AppPath(id): AppPath<i32>,
) -> CatalogResult<Json<Banner>> {
    let banner = BannerUseCase::new(state.repo.clone())
        .get(BannerId::new(id))
        .await?;
    Ok(Json(banner))
}

/// POST /api/banners
pub async fn create_banner<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    _user: CurrentUser,
    AppJson(input): AppJson<BannerInput>,
) -> CatalogResult<(StatusCode, Json<Banner>)> {
    let banner = BannerUseCase::new(state.repo.clone()).create(input).await?;
    Ok((StatusCode::CREATED, Json(banner)))
}

/// PUT /api/banners/{id}
pub async fn update_banner<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    _user: CurrentUser,
    AppPath(id): AppPath<i32>,
    AppJson(input): AppJson<BannerInput>,
) -> CatalogResult<Json<Banner>> {
    let banner = BannerUseCase::new(state.repo.clone())
        .update(BannerId::new(id), input)
        .await?;
    Ok(Json(banner))
}

/// DELETE /api/banners/{id}
pub async fn delete_banner<R: CatalogRepository>(
    State(state): State<CatalogAppState<R>>,
    _user: CurrentUser,
    AppPath(id): AppPath<i32>,
) -> CatalogResult<Json<MessageResponse>> {
    BannerUseCase::new(state.repo.clone())
        .delete(BannerId::new(id))
        .await?;
    Ok(Json(MessageResponse::new("Banner deleted successfully")))
}
