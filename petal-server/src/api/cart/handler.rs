//! Cart API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::api::convert::{parse_record_id, user_record_id};
use crate::auth::CurrentUser;
use crate::cart::CartService;
use crate::core::ServerState;
use crate::db::models::CartSummary;
use crate::utils::{AppResponse, AppResult, ok};

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub flower_id: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

/// GET /api/cart - 查看购物车
pub async fn summary(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<AppResponse<CartSummary>>> {
    let user = user_record_id(&current_user)?;
    let service = CartService::new(state.get_db());
    let summary = service.get_summary(&user).await?;
    Ok(ok(summary))
}

/// POST /api/cart/items - 加入商品
pub async fn add_item(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<AddItemRequest>,
) -> AppResult<Json<AppResponse<CartSummary>>> {
    let user = user_record_id(&current_user)?;
    let flower = parse_record_id("flower", &payload.flower_id)?;
    let service = CartService::new(state.get_db());
    let summary = service.add_item(&user, &flower, payload.quantity).await?;
    Ok(ok(summary))
}

/// PUT /api/cart/items/:id - 修改数量
pub async fn update_quantity(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateQuantityRequest>,
) -> AppResult<Json<AppResponse<CartSummary>>> {
    let user = user_record_id(&current_user)?;
    let item = parse_record_id("cart_item", &id)?;
    let service = CartService::new(state.get_db());
    let summary = service
        .update_quantity(&user, &item, payload.quantity)
        .await?;
    Ok(ok(summary))
}

/// DELETE /api/cart/items/:id - 移除商品
pub async fn remove_item(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<CartSummary>>> {
    let user = user_record_id(&current_user)?;
    let item = parse_record_id("cart_item", &id)?;
    let service = CartService::new(state.get_db());
    let summary = service.remove_item(&user, &item).await?;
    Ok(ok(summary))
}

/// DELETE /api/cart - 清空购物车
pub async fn clear(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<AppResponse<CartSummary>>> {
    let user = user_record_id(&current_user)?;
    let service = CartService::new(state.get_db());
    let summary = service.clear(&user).await?;
    Ok(ok(summary))
}
