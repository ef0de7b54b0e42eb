//! Order Lifecycle Controller
//!
//! Enforces the status state machine and the stock restoration rules:
//!
//! - `PENDING -> CONFIRMED | CANCELLED`
//! - `CONFIRMED -> DELIVERED | CANCELLED`
//! - `DELIVERED`, `CANCELLED` are terminal
//!
//! Customers may cancel their own `PENDING` orders, which restores the
//! stock those orders consumed. Admin cancellation of a `CONFIRMED`
//! order restores stock as well; every other transition leaves the
//! inventory untouched. Status writes are conditional on the observed
//! current status, so a racing double cancel has exactly one winner.

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::{FlowerId, Order, OrderId, OrderStatus, UserId};
use crate::db::repository::{FlowerRepository, OrderRepository};
use crate::orders::OrderError;

pub struct OrderLifecycle {
    orders: OrderRepository,
    flowers: FlowerRepository,
}

impl OrderLifecycle {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            flowers: FlowerRepository::new(db),
        }
    }

    /// Customer cancels their own order — only while it is still PENDING.
    /// Restores the stock the order consumed, so the items go back on sale.
    pub async fn cancel_own_order(
        &self,
        user: &UserId,
        order_id: &OrderId,
    ) -> Result<Order, OrderError> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| OrderError::NotFound(format!("Order {}", order_id)))?;

        if &order.user != user {
            return Err(OrderError::Forbidden(
                "You can only cancel your own orders".to_string(),
            ));
        }

        if order.status != OrderStatus::Pending {
            return Err(OrderError::InvalidTransition(format!(
                "Only PENDING orders can be cancelled. This order is: {}",
                order.status
            )));
        }

        // Conditional write decides the winner if two cancels race
        let cancelled = self
            .orders
            .transition(order_id, OrderStatus::Pending, OrderStatus::Cancelled)
            .await?
            .ok_or_else(|| {
                OrderError::InvalidTransition(
                    "Only PENDING orders can be cancelled. The order left PENDING concurrently."
                        .to_string(),
                )
            })?;

        self.restore_stock(&cancelled, OrderStatus::Pending).await?;

        tracing::info!(order_id = %order_id, user = %user, "Order cancelled");
        Ok(cancelled)
    }

    /// Admin changes the status of any order.
    ///
    /// The literal is parsed against the closed status set; terminal
    /// orders reject every change. Only `CONFIRMED -> CANCELLED`
    /// restores stock — a PENDING order cancelled by an admin does not
    /// (customers cancel PENDING orders via [`cancel_own_order`], which
    /// does restore).
    pub async fn set_status(
        &self,
        order_id: &OrderId,
        new_status_literal: &str,
    ) -> Result<Order, OrderError> {
        let new_status: OrderStatus = new_status_literal
            .parse()
            .map_err(|_| OrderError::InvalidStatus(new_status_literal.to_string()))?;

        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| OrderError::NotFound(format!("Order {}", order_id)))?;

        let current = order.status;
        if current.is_terminal() {
            return Err(OrderError::InvalidTransition(format!(
                "Cannot change status of a {} order. It is already in a terminal state.",
                current
            )));
        }

        let updated = self
            .orders
            .transition(order_id, current, new_status)
            .await?
            .ok_or_else(|| {
                OrderError::InvalidTransition(
                    "Order status changed concurrently, try again".to_string(),
                )
            })?;

        if current == OrderStatus::Confirmed && new_status == OrderStatus::Cancelled {
            self.restore_stock(&updated, current).await?;
        }

        tracing::info!(order_id = %order_id, from = %current, to = %new_status, "Order status updated");
        Ok(updated)
    }

    /// All orders, optionally filtered by status literal. An unknown
    /// literal fails instead of silently returning an unfiltered list.
    pub async fn list_orders(&self, status_filter: Option<&str>) -> Result<Vec<Order>, OrderError> {
        match status_filter {
            Some(literal) if !literal.trim().is_empty() => {
                let status: OrderStatus = literal
                    .parse()
                    .map_err(|_| OrderError::InvalidStatus(literal.to_string()))?;
                Ok(self.orders.find_by_status(status).await?)
            }
            _ => Ok(self.orders.find_all().await?),
        }
    }

    /// The user's orders, newest first
    pub async fn list_own_orders(&self, user: &UserId) -> Result<Vec<Order>, OrderError> {
        Ok(self.orders.find_by_user(user).await?)
    }

    /// Put the order's units back on sale. Lines whose flower was
    /// deleted from the catalogue are skipped; there is no counter
    /// left to restore.
    ///
    /// On a mid-loop failure the increments already applied are taken
    /// back before the status is reverted, so a retried cancel starts
    /// from a clean slate and restores each line exactly once.
    async fn restore_stock(
        &self,
        order: &Order,
        previous: OrderStatus,
    ) -> Result<(), OrderError> {
        let mut applied: Vec<(&FlowerId, i64)> = Vec::new();
        for item in &order.items {
            let Some(flower) = &item.flower else { continue };
            if let Err(e) = self.flowers.increment_stock(flower, item.quantity).await {
                self.take_back(&applied).await;
                if let Some(order_id) = &order.id {
                    let _ = self
                        .orders
                        .transition(order_id, OrderStatus::Cancelled, previous)
                        .await;
                }
                return Err(e.into());
            }
            applied.push((flower, item.quantity));
        }
        Ok(())
    }

    /// Undo partially applied restorations. The decrement is
    /// conditional; units a concurrent checkout already claimed stay
    /// sold and are logged instead of forced negative.
    async fn take_back(&self, applied: &[(&FlowerId, i64)]) {
        for (flower, qty) in applied {
            match self.flowers.try_decrement_stock(flower, *qty).await {
                Ok(Some(_)) => {}
                Ok(None) => {
                    tracing::error!(flower = %flower, qty, "Could not take back restored stock");
                }
                Err(e) => {
                    tracing::error!(flower = %flower, qty, error = %e, "Could not take back restored stock");
                }
            }
        }
    }
}
