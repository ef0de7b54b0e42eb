//! Order API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/orders | POST | 下单 (结账当前购物车) | 用户 |
//! | /api/orders | GET | 我的订单列表 | 用户 |
//! | /api/orders/{id} | GET | 查看单个订单 (仅限本人或管理员) | 用户 |
//! | /api/orders/{id}/cancel | POST | 取消自己的 PENDING 订单 | 用户 |
//! | /api/admin/orders | GET | 全部订单列表 (可按状态过滤) | 管理员 |
//! | /api/admin/orders/{id}/status | PUT | 修改订单状态 | 管理员 |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let user_routes = Router::new()
        .route("/api/orders", post(handler::place_order))
        .route("/api/orders", get(handler::list_own))
        .route("/api/orders/{id}", get(handler::get_by_id))
        .route("/api/orders/{id}/cancel", post(handler::cancel));

    let admin_routes = Router::new()
        .route("/api/admin/orders", get(handler::list_all))
        .route("/api/admin/orders/{id}/status", put(handler::set_status))
        .layer(middleware::from_fn(require_admin));

    user_routes.merge(admin_routes)
}
