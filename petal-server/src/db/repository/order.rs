//! Order Repository
//!
//! Orders are append-only; the only mutation is the status transition,
//! expressed as a conditional UPDATE so racing transitions have exactly
//! one winner.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Order, OrderId, OrderStatus, UserId};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const ORDER_TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist a new order (line items embedded, single atomic CREATE)
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(ORDER_TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &OrderId) -> RepoResult<Option<Order>> {
        let order: Option<Order> = self.base.db().select(id.clone()).await?;
        Ok(order)
    }

    /// All orders of one user, newest first
    pub async fn find_by_user(&self, user: &UserId) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE user = $user ORDER BY ordered_at DESC")
            .bind(("user", user.clone()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// All orders, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY ordered_at DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// All orders in one status, newest first
    pub async fn find_by_status(&self, status: OrderStatus) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE status = $status ORDER BY ordered_at DESC")
            .bind(("status", status))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Conditional status transition: writes `to` only if the order is
    /// still in `from`. Returns `None` if the precondition no longer
    /// held (concurrent transition won, or no such order).
    pub async fn transition(
        &self,
        id: &OrderId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> RepoResult<Option<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("UPDATE $order SET status = $to WHERE status = $from RETURN AFTER")
            .bind(("order", id.clone()))
            .bind(("from", from))
            .bind(("to", to))
            .await?
            .take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Delete an order. Only used to unwind a checkout whose final cart
    /// clearing step failed; orders are never deleted through the API.
    pub async fn delete(&self, id: &OrderId) -> RepoResult<()> {
        let _: Option<Order> = self.base.db().delete(id.clone()).await?;
        Ok(())
    }
}
