//! Handlers for the `/cart-items` resource.
//!
//! Thin adapters: extract, call the cart service with the caller's resolved
//! user id and a per-request cancellation token, wrap the result.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use opencart_core::dto::{CartItemDto, CartItemImageDto};
use opencart_core::pagination::Page;
use opencart_core::types::DbId;

use crate::error::AppResult;
use crate::middleware::auth::CurrentUser;
use crate::query::PageParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/cart-items?page=&pageSize=
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<PageParams>,
) -> AppResult<Json<Page<CartItemDto>>> {
    let cancel = state.request_token();
    let page = state
        .cart
        .list_cart_items(&user.user_id, params.into(), &cancel)
        .await?;
    Ok(Json(page))
}

/// GET /api/v1/cart-items/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CartItemDto>>> {
    let cancel = state.request_token();
    let item = state.cart.get_cart_item(&user.user_id, id, &cancel).await?;
    Ok(Json(DataResponse { data: item }))
}

/// POST /api/v1/cart-items
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<CartItemDto>,
) -> AppResult<(StatusCode, Json<DataResponse<CartItemDto>>)> {
    let cancel = state.request_token();
    let item = state.cart.add_cart_item(&user.user_id, input, &cancel).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// PUT /api/v1/cart-items/{id}
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<DbId>,
    Json(input): Json<CartItemDto>,
) -> AppResult<Json<DataResponse<CartItemDto>>> {
    let cancel = state.request_token();
    let item = state
        .cart
        .update_cart_item(&user.user_id, id, input, &cancel)
        .await?;
    Ok(Json(DataResponse { data: item }))
}

/// DELETE /api/v1/cart-items/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<bool>>> {
    let cancel = state.request_token();
    let removed = state.cart.remove_cart_item(&user.user_id, id, &cancel).await?;
    Ok(Json(DataResponse { data: removed }))
}

/// POST /api/v1/cart-items/{id}/images
pub async fn add_image(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<DbId>,
    Json(input): Json<CartItemImageDto>,
) -> AppResult<(StatusCode, Json<DataResponse<CartItemImageDto>>)> {
    let cancel = state.request_token();
    let image = state
        .cart
        .add_image_to_cart_item(&user.user_id, id, input, &cancel)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: image })))
}
