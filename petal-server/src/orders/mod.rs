//! 订单核心模块
//!
//! 购物车到订单的转换（结算引擎）与订单状态机（生命周期控制器）。
//! 两者共享同一个失败分类 [`OrderError`]，所有操作要么完整提交，
//! 要么不留下任何部分写入。

pub mod checkout;
pub mod error;
pub mod lifecycle;

#[cfg(test)]
mod tests;

pub use checkout::{CheckoutEngine, order_line_snapshot};
pub use error::OrderError;
pub use lifecycle::OrderLifecycle;
