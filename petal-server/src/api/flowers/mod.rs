//! Flower catalogue API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/flowers | GET | 商品列表 (可按名称搜索) | 无 |
//! | /api/flowers/{id} | GET | 单个商品 | 无 |
//! | /api/flowers | POST | 创建商品 | 管理员 |
//! | /api/flowers/{id} | PUT | 更新商品 | 管理员 |
//! | /api/flowers/{id} | DELETE | 删除商品 | 管理员 |

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/flowers", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id));

    let admin_routes = Router::new()
        .route("/", axum::routing::post(handler::create))
        .route("/{id}", axum::routing::put(handler::update))
        .route("/{id}", axum::routing::delete(handler::delete))
        .layer(middleware::from_fn(require_admin));

    read_routes.merge(admin_routes)
}
