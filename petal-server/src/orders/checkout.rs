//! Checkout Engine
//!
//! Converts a user's mutable cart into an immutable, price-snapshotted
//! order, all-or-nothing:
//!
//! 1. load the cart; no lines → `EmptyCart`
//! 2. per line, atomic conditional stock decrement; a loser aborts the
//!    whole attempt with `OutOfStock`
//! 3. snapshot each line from the flower row *returned by the decrement*
//!    (price at the instant of reservation, not an earlier read)
//! 4. create the order (line items embedded, one atomic CREATE), then
//!    clear the cart
//!
//! Concurrency strategy: optimistic per-line reservation with
//! compensation. SurrealDB executes each statement atomically but the
//! SDK has no cross-statement transaction, so any failure after partial
//! decrements undoes the already-applied ones before the error is
//! returned, and a cart-clearing failure deletes the freshly created
//! order. No in-process locks are involved; two checkouts racing on the
//! same flower are decided entirely by the conditional decrement.

use chrono::Utc;
use rust_decimal::Decimal;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::{Flower, FlowerId, Order, OrderItem, OrderStatus, UserId};
use crate::db::repository::{CartRepository, FlowerRepository, OrderRepository};
use crate::orders::OrderError;

/// Pure pricing snapshot: freeze name, unit price and subtotal of one
/// line. Later catalogue changes never touch the result.
pub fn order_line_snapshot(flower: &Flower, quantity: i64) -> OrderItem {
    let unit_price = flower.price;
    OrderItem {
        flower: flower.id.clone(),
        flower_name: flower.name.clone(),
        quantity,
        unit_price,
        subtotal: unit_price * Decimal::from(quantity),
    }
}

pub struct CheckoutEngine {
    carts: CartRepository,
    flowers: FlowerRepository,
    orders: OrderRepository,
}

impl CheckoutEngine {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            carts: CartRepository::new(db.clone()),
            flowers: FlowerRepository::new(db.clone()),
            orders: OrderRepository::new(db),
        }
    }

    /// Place an order from the user's cart
    pub async fn place_order(
        &self,
        user: &UserId,
        delivery_address: Option<String>,
    ) -> Result<Order, OrderError> {
        let Some(cart) = self.carts.find_by_user(user).await? else {
            return Err(OrderError::EmptyCart);
        };
        let cart_id = cart
            .id
            .ok_or_else(|| OrderError::Database("Cart record without id".to_string()))?;

        let lines = self.carts.items(&cart_id).await?;
        if lines.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        // Reserve stock line by line; remember what was applied so a
        // failure can undo it.
        let mut applied: Vec<(FlowerId, i64)> = Vec::new();
        let mut items: Vec<OrderItem> = Vec::new();
        let mut total = Decimal::ZERO;

        for line in &lines {
            match self
                .flowers
                .try_decrement_stock(&line.flower, line.quantity)
                .await
            {
                Ok(Some(flower)) => {
                    applied.push((line.flower.clone(), line.quantity));
                    let item = order_line_snapshot(&flower, line.quantity);
                    total += item.subtotal;
                    items.push(item);
                }
                Ok(None) => {
                    // Decrement did not apply: insufficient stock (possibly
                    // consumed by a concurrent checkout) or flower gone.
                    let err = match self.flowers.find_by_id(&line.flower).await {
                        Ok(Some(flower)) => OrderError::OutOfStock {
                            flower_id: line.flower.to_string(),
                            flower_name: flower.name,
                            requested: line.quantity,
                            available: flower.stock,
                        },
                        Ok(None) => OrderError::NotFound(format!("Flower {}", line.flower)),
                        Err(e) => e.into(),
                    };
                    self.release(&applied).await;
                    return Err(err);
                }
                Err(e) => {
                    self.release(&applied).await;
                    return Err(e.into());
                }
            }
        }

        let order = Order {
            id: None,
            user: user.clone(),
            total_price: total,
            status: OrderStatus::Pending,
            delivery_address,
            items,
            ordered_at: Utc::now(),
        };

        let order = match self.orders.create(order).await {
            Ok(order) => order,
            Err(e) => {
                self.release(&applied).await;
                return Err(e.into());
            }
        };

        if let Err(e) = self.carts.clear(&cart_id).await {
            // The order must not survive alongside an intact cart
            if let Some(id) = &order.id {
                let _ = self.orders.delete(id).await;
            }
            self.release(&applied).await;
            return Err(e.into());
        }

        tracing::info!(
            order_id = %order.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
            user = %user,
            items = order.items.len(),
            total = %order.total_price,
            "Order placed"
        );

        Ok(order)
    }

    /// Undo partially applied stock reservations
    async fn release(&self, applied: &[(FlowerId, i64)]) {
        for (flower, qty) in applied {
            if let Err(e) = self.flowers.increment_stock(flower, *qty).await {
                tracing::error!(flower = %flower, qty, error = %e, "Failed to release reserved stock");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surrealdb::RecordId;

    fn rose() -> Flower {
        Flower {
            id: Some(RecordId::from_table_key("flower", "rose")),
            name: "Red Rose".to_string(),
            price: Decimal::new(499, 2),
            stock: 5,
            image_url: None,
        }
    }

    #[test]
    fn snapshot_freezes_name_price_and_subtotal() {
        let item = order_line_snapshot(&rose(), 2);
        assert_eq!(item.flower_name, "Red Rose");
        assert_eq!(item.quantity, 2);
        assert_eq!(item.unit_price, Decimal::new(499, 2));
        assert_eq!(item.subtotal, Decimal::new(998, 2));
    }

    #[test]
    fn snapshot_subtotal_is_stored_not_recomputed() {
        let mut flower = rose();
        let item = order_line_snapshot(&flower, 3);
        // Later catalogue changes must not affect the snapshot
        flower.price = Decimal::new(999, 2);
        flower.name = "Golden Rose".to_string();
        assert_eq!(item.unit_price, Decimal::new(499, 2));
        assert_eq!(item.subtotal, Decimal::new(1497, 2));
        assert_eq!(item.flower_name, "Red Rose");
    }
}
