//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::convert::{parse_record_id, user_record_id};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::Order;
use crate::db::repository::OrderRepository;
use crate::orders::{CheckoutEngine, OrderLifecycle};
use crate::utils::{AppError, AppResponse, AppResult, ok};

#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub delivery_address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListAllQuery {
    /// Optional status filter (PENDING, CONFIRMED, CANCELLED, DELIVERED)
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
}

/// POST /api/orders - 下单
///
/// Checks out the caller's cart: reserves stock, snapshots prices,
/// creates the order and clears the cart.
pub async fn place_order(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<PlaceOrderRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let user = user_record_id(&current_user)?;
    let engine = CheckoutEngine::new(state.get_db());
    let order = engine.place_order(&user, payload.delivery_address).await?;
    Ok(ok(order))
}

/// GET /api/orders - 我的订单列表 (最新在前)
pub async fn list_own(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    let user = user_record_id(&current_user)?;
    let lifecycle = OrderLifecycle::new(state.get_db());
    let orders = lifecycle.list_own_orders(&user).await?;
    Ok(ok(orders))
}

/// GET /api/orders/:id - 查看单个订单
///
/// Customers only see their own orders; admins see any.
pub async fn get_by_id(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order_id = parse_record_id("order", &id)?;
    let repo = OrderRepository::new(state.get_db());
    let order = repo
        .find_by_id(&order_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found(format!("Order {}", id)))?;

    if !current_user.is_admin() {
        let user = user_record_id(&current_user)?;
        if order.user != user {
            return Err(AppError::forbidden("You can only view your own orders"));
        }
    }

    Ok(ok(order))
}

/// POST /api/orders/:id/cancel - 取消自己的订单
///
/// Only PENDING orders can be cancelled; stock is restored.
pub async fn cancel(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    let user = user_record_id(&current_user)?;
    let order_id = parse_record_id("order", &id)?;
    let lifecycle = OrderLifecycle::new(state.get_db());
    let order = lifecycle.cancel_own_order(&user, &order_id).await?;
    Ok(ok(order))
}

/// GET /api/admin/orders - 全部订单列表 (管理员)
///
/// `?status=PENDING` filters by status
pub async fn list_all(
    State(state): State<ServerState>,
    Query(query): Query<ListAllQuery>,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    let lifecycle = OrderLifecycle::new(state.get_db());
    let orders = lifecycle.list_orders(query.status.as_deref()).await?;
    Ok(ok(orders))
}

/// PUT /api/admin/orders/:id/status - 修改订单状态 (管理员)
pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<SetStatusRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order_id = parse_record_id("order", &id)?;
    let lifecycle = OrderLifecycle::new(state.get_db());
    let order = lifecycle.set_status(&order_id, &payload.status).await?;
    Ok(ok(order))
}
