//! Petal Server - 在线花店后端服务
//!
//! # 架构概述
//!
//! 本模块是 Petal Server 的主入口，提供以下核心功能：
//!
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **认证** (`auth`): JWT + Argon2 认证体系
//! - **购物车** (`cart`): 购物车业务逻辑
//! - **订单** (`orders`): 结账事务引擎和订单状态机
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! petal-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、中间件
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层 (模型与仓储)
//! ├── cart/          # 购物车服务
//! ├── orders/        # 结账引擎与订单生命周期
//! └── utils/         # 错误处理、日志
//! ```

pub mod api;
pub mod auth;
pub mod cart;
pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use cart::CartService;
pub use core::{Config, Server, ServerState};
pub use orders::{CheckoutEngine, OrderError, OrderLifecycle};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
    ____       __        __
   / __ \___  / /_____ _/ /
  / /_/ / _ \/ __/ __ `/ /
 / ____/  __/ /_/ /_/ / /
/_/    \___/\__/\__,_/_/
    "#
    );
}
