//! HTTP Handlers
//!
//! Every route here is behind the auth middleware, so each handler takes the
//! [`CurrentUser`] and only ever touches that user's rows.

use std::sync::Arc;

use auth::CurrentUser;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use kernel::extract::{AppJson, AppPath};
use kernel::id::{CartItemId, OrderId};

use crate::application::{
    AddToCartInput, CartUseCase, OrderUseCase, PlaceOrderInput, SetQuantityInput,
};
use crate::domain::entity::{cart::CartLine, order::Order};
use crate::domain::repository::CommerceRepository;
use crate::error::CommerceResult;
use crate::presentation::dto::MessageResponse;

#[derive(Clone)]
pub struct CommerceAppState<R: CommerceRepository> {
    pub repo: Arc<R>,
}

/// GET /api/carts
pub async fn list_cart<R: CommerceRepository>(
    State(state): State<CommerceAppState<R>>,
    user: CurrentUser,
) -> CommerceResult<Json<Vec<CartLine>>> {
    let lines = CartUseCase::new(state.repo.clone()).list(user.id).await?;
    Ok(Json(lines))
}

/// POST /api/carts
pub async fn add_to_cart<R: CommerceRepository>(
    State(state): State<CommerceAppState<R>>,
    user: CurrentUser,
    AppJson(input): AppJson<AddToCartInput>,
) -> CommerceResult<(StatusCode, Json<CartLine>)> {
    let line = CartUseCase::new(state.repo.clone())
        .add(user.id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(line)))
}

/// PATCH /api/carts/{id}
pub async fn set_cart_quantity<R: CommerceRepository>(
    State(state): State<CommerceAppState<R>>,
    user: CurrentUser,
    AppPath(id): AppPath<i32>,
    AppJson(input): AppJson<SetQuantityInput>,
) -> CommerceResult<Json<CartLine>> {
    let line = CartUseCase::new(state.repo.clone())
        .set_quantity(user.id, CartItemId::new(id), input)
        .await?;
    Ok(Json(line))
}

/// DELETE /api/carts/{id}
pub async fn remove_cart_item<R: CommerceRepository>(
    State(state): State<CommerceAppState<R>>,
    user: CurrentUser,
    AppPath(id): AppPath<i32>,
) -> CommerceResult<Json<MessageResponse>> {
    CartUseCase::new(state.repo.clone())
        .remove(user.id, CartItemId::new(id))
        .await?;
    Ok(Json(MessageResponse {
        message: "Cart item removed successfully".to_string(),
    }))
}

/// GET /api/orders
pub async fn list_orders<R: CommerceRepository>(
    State(state): State<CommerceAppState<R>>,
    user: CurrentUser,
) -> CommerceResult<Json<Vec<Order>>> {
    let orders = OrderUseCase::new(state.repo.clone()).list(user.id).await?;
    Ok(Json(orders))
}

/// POST /api/orders
pub async fn place_order<R: CommerceRepository>(
    State(state): State<CommerceAppState<R>>,
    user: CurrentUser,
    AppJson(input): AppJson<PlaceOrderInput>,
) -> CommerceResult<(StatusCode, Json<Order>)> {
    let order = OrderUseCase::new(state.repo.clone())
        .place(user.id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /api/orders/{id}
pub async fn get_order<R: CommerceRepository>(
    State(state): State<CommerceAppState<R>>,
    user: CurrentUser,
    AppPath(id): AppPath<i32>,
) -> CommerceResult<Json<Order>> {
    let order = OrderUseCase::new(state.repo.clone())
        .get(user.id, OrderId::new(id))
        .await?;
    Ok(Json(order))
}

/// DELETE /api/orders/{id}
pub async fn delete_order<R: CommerceRepository>(
    State(state): State<CommerceAppState<R>>,
    user: CurrentUser,
    AppPath(id): AppPath<i32>,
) -> CommerceResult<Json<MessageResponse>> {
    OrderUseCase::new(state.repo.clone())
        .delete(user.id, OrderId::new(id))
        .await?;
    Ok(Json(MessageResponse {
        message: "Order deleted successfully".to_string(),
    }))
}
