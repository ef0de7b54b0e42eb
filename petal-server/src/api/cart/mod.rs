//! Cart API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/cart | GET | 查看购物车 | 用户 |
//! | /api/cart | DELETE | 清空购物车 | 用户 |
//! | /api/cart/items | POST | 加入商品 (重复加入合并数量) | 用户 |
//! | /api/cart/items/{id} | PUT | 修改数量 (0 表示移除) | 用户 |
//! | /api/cart/items/{id} | DELETE | 移除商品 | 用户 |

mod handler;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cart", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::summary))
        .route("/", delete(handler::clear))
        .route("/items", post(handler::add_item))
        .route("/items/{id}", put(handler::update_quantity))
        .route("/items/{id}", delete(handler::remove_item))
}
