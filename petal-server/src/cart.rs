//! Cart mutation service
//!
//! All cart business logic. The stock checks here are advisory — they
//! keep obviously doomed carts out, but stock can change between
//! add-to-cart and checkout, so the authoritative check is always the
//! atomic decrement inside the checkout engine.

use rust_decimal::Decimal;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::{CartItemId, CartItemView, CartSummary, Flower, FlowerId, UserId};
use crate::db::repository::{CartRepository, FlowerRepository};
use crate::orders::OrderError;

pub struct CartService {
    carts: CartRepository,
    flowers: FlowerRepository,
}

impl CartService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            carts: CartRepository::new(db.clone()),
            flowers: FlowerRepository::new(db),
        }
    }

    /// Cart contents with a real-time calculated total (live prices,
    /// not snapshots — snapshotting happens at checkout)
    pub async fn get_summary(&self, user: &UserId) -> Result<CartSummary, OrderError> {
        let cart = self.carts.get_or_create(user).await?;
        let cart_id = cart
            .id
            .ok_or_else(|| OrderError::Database("Cart record without id".to_string()))?;

        let lines = self.carts.items(&cart_id).await?;
        let mut items = Vec::with_capacity(lines.len());
        let mut total = Decimal::ZERO;

        for line in lines {
            let Some(line_id) = line.id else { continue };
            let Some(flower) = self.flowers.find_by_id(&line.flower).await? else {
                // Flower was removed from the catalogue while sitting in
                // the cart; the line is unpriceable and left out.
                tracing::warn!(flower = %line.flower, "Cart line references a deleted flower");
                continue;
            };
            let line_total = flower.price * Decimal::from(line.quantity);
            total += line_total;
            items.push(CartItemView {
                id: line_id,
                flower: line.flower,
                flower_name: flower.name,
                unit_price: flower.price,
                quantity: line.quantity,
                line_total,
            });
        }

        let item_count = items.len();
        Ok(CartSummary {
            cart_id,
            items,
            total_price: total,
            item_count,
        })
    }

    /// Add a flower to the cart, or increase quantity if already present
    /// (one line per flower — duplicate adds merge).
    pub async fn add_item(
        &self,
        user: &UserId,
        flower_id: &FlowerId,
        quantity: i64,
    ) -> Result<CartSummary, OrderError> {
        if quantity < 1 {
            return Err(OrderError::InvalidQuantity(
                "Quantity must be at least 1".to_string(),
            ));
        }

        let cart = self.carts.get_or_create(user).await?;
        let cart_id = cart
            .id
            .ok_or_else(|| OrderError::Database("Cart record without id".to_string()))?;

        let flower = self
            .flowers
            .find_by_id(flower_id)
            .await?
            .ok_or_else(|| OrderError::NotFound(format!("Flower {}", flower_id)))?;

        if flower.stock <= 0 {
            return Err(out_of_stock(&flower, quantity));
        }

        // Advisory check against the *resulting* quantity for this flower
        match self.carts.find_item(&cart_id, flower_id).await? {
            Some(existing) => {
                let line_id = existing
                    .id
                    .ok_or_else(|| OrderError::Database("Cart line without id".to_string()))?;
                let resulting = existing.quantity + quantity;
                if resulting > flower.stock {
                    return Err(out_of_stock(&flower, resulting));
                }
                self.carts.set_item_quantity(&line_id, resulting).await?;
            }
            None => {
                if quantity > flower.stock {
                    return Err(out_of_stock(&flower, quantity));
                }
                self.carts.create_item(&cart_id, flower_id, quantity).await?;
            }
        }

        self.get_summary(user).await
    }

    /// Update a line's quantity. Zero removes the line.
    pub async fn update_quantity(
        &self,
        user: &UserId,
        item_id: &CartItemId,
        quantity: i64,
    ) -> Result<CartSummary, OrderError> {
        let cart = self.carts.get_or_create(user).await?;
        let cart_id = cart
            .id
            .ok_or_else(|| OrderError::Database("Cart record without id".to_string()))?;

        let item = self
            .carts
            .find_item_by_id(item_id)
            .await?
            .ok_or_else(|| OrderError::NotFound(format!("Cart item {}", item_id)))?;

        if item.cart != cart_id {
            return Err(OrderError::Forbidden(
                "This item does not belong to your cart".to_string(),
            ));
        }

        if quantity < 0 {
            return Err(OrderError::InvalidQuantity(
                "Quantity cannot be negative".to_string(),
            ));
        }

        if quantity == 0 {
            self.carts.delete_item(item_id).await?;
        } else {
            let flower = self
                .flowers
                .find_by_id(&item.flower)
                .await?
                .ok_or_else(|| OrderError::NotFound(format!("Flower {}", item.flower)))?;
            if quantity > flower.stock {
                return Err(out_of_stock(&flower, quantity));
            }
            self.carts.set_item_quantity(item_id, quantity).await?;
        }

        self.get_summary(user).await
    }

    /// Remove a single line from the caller's cart
    pub async fn remove_item(
        &self,
        user: &UserId,
        item_id: &CartItemId,
    ) -> Result<CartSummary, OrderError> {
        let cart = self.carts.get_or_create(user).await?;
        let cart_id = cart
            .id
            .ok_or_else(|| OrderError::Database("Cart record without id".to_string()))?;

        let item = self
            .carts
            .find_item_by_id(item_id)
            .await?
            .ok_or_else(|| OrderError::NotFound(format!("Cart item {}", item_id)))?;

        if item.cart != cart_id {
            return Err(OrderError::Forbidden(
                "This item does not belong to your cart".to_string(),
            ));
        }

        self.carts.delete_item(item_id).await?;
        self.get_summary(user).await
    }

    /// Remove every line from the cart
    pub async fn clear(&self, user: &UserId) -> Result<CartSummary, OrderError> {
        let cart = self.carts.get_or_create(user).await?;
        let cart_id = cart
            .id
            .ok_or_else(|| OrderError::Database("Cart record without id".to_string()))?;
        self.carts.clear(&cart_id).await?;
        self.get_summary(user).await
    }
}

fn out_of_stock(flower: &Flower, requested: i64) -> OrderError {
    OrderError::OutOfStock {
        flower_id: flower
            .id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_default(),
        flower_name: flower.name.clone(),
        requested,
        available: flower.stock,
    }
}
