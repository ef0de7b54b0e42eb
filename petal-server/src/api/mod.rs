//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 认证相关接口
//! - [`flowers`] - 商品目录接口
//! - [`cart`] - 购物车接口
//! - [`orders`] - 订单接口

pub mod convert;

pub mod auth;
pub mod cart;
pub mod flowers;
pub mod health;
pub mod orders;

use axum::Router;
use axum::middleware as axum_middleware;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;
use crate::core::server::log_request;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        // Auth API - signup/login public, rest protected
        .merge(auth::router())
        // Catalogue API - reads public, writes admin
        .merge(flowers::router())
        // Cart API - authentication required
        .merge(cart::router())
        // Order API - authentication required, admin routes nested
        .merge(orders::router())
        // Health API - public route
        .merge(health::router())
}

/// Build a fully configured application with all middleware and state
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    build_router()
        // ========== Tower HTTP Middleware ==========
        // CORS - Handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Request logging - outermost, executed first
        .layer(axum_middleware::from_fn(log_request))
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // ========== Application Middleware ==========
        // JWT authentication - executes before routes, injects CurrentUser
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ))
}
