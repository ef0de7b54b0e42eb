//! Cart Repository
//!
//! One cart per user (unique index on `cart.user`), one line per flower
//! per cart (unique index on `(cart_item.cart, cart_item.flower)`).

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Cart, CartId, CartItem, CartItemId, FlowerId, UserId};
use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const CART_TABLE: &str = "cart";
const CART_ITEM_TABLE: &str = "cart_item";

#[derive(Clone)]
pub struct CartRepository {
    base: BaseRepository,
}

impl CartRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find the user's cart, if any
    pub async fn find_by_user(&self, user: &UserId) -> RepoResult<Option<Cart>> {
        let carts: Vec<Cart> = self
            .base
            .db()
            .query("SELECT * FROM cart WHERE user = $user LIMIT 1")
            .bind(("user", user.clone()))
            .await?
            .take(0)?;
        Ok(carts.into_iter().next())
    }

    /// Return the user's cart, creating an empty one if none exists.
    /// Safe entry point — cart operations call this first.
    pub async fn get_or_create(&self, user: &UserId) -> RepoResult<Cart> {
        if let Some(cart) = self.find_by_user(user).await? {
            return Ok(cart);
        }

        let cart = Cart {
            id: None,
            user: user.clone(),
            created_at: Utc::now(),
        };
        let created: Result<Option<Cart>, surrealdb::Error> =
            self.base.db().create(CART_TABLE).content(cart).await;

        match created {
            Ok(Some(cart)) => Ok(cart),
            // Lost the creation race against a concurrent request for the
            // same user: the unique index rejected us, the cart now exists.
            _ => self
                .find_by_user(user)
                .await?
                .ok_or_else(|| RepoError::Database("Failed to create cart".to_string())),
        }
    }

    // =========================================================================
    // Cart lines
    // =========================================================================

    /// All lines of a cart
    pub async fn items(&self, cart: &CartId) -> RepoResult<Vec<CartItem>> {
        let items: Vec<CartItem> = self
            .base
            .db()
            .query("SELECT * FROM cart_item WHERE cart = $cart")
            .bind(("cart", cart.clone()))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Find the line for a specific flower within a cart
    pub async fn find_item(
        &self,
        cart: &CartId,
        flower: &FlowerId,
    ) -> RepoResult<Option<CartItem>> {
        let items: Vec<CartItem> = self
            .base
            .db()
            .query("SELECT * FROM cart_item WHERE cart = $cart AND flower = $flower LIMIT 1")
            .bind(("cart", cart.clone()))
            .bind(("flower", flower.clone()))
            .await?
            .take(0)?;
        Ok(items.into_iter().next())
    }

    /// Find a cart line by its id
    pub async fn find_item_by_id(&self, id: &CartItemId) -> RepoResult<Option<CartItem>> {
        let item: Option<CartItem> = self.base.db().select(id.clone()).await?;
        Ok(item)
    }

    /// Create a new line
    pub async fn create_item(
        &self,
        cart: &CartId,
        flower: &FlowerId,
        quantity: i64,
    ) -> RepoResult<CartItem> {
        let item = CartItem {
            id: None,
            cart: cart.clone(),
            flower: flower.clone(),
            quantity,
        };
        let created: Option<CartItem> = self
            .base
            .db()
            .create(CART_ITEM_TABLE)
            .content(item)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create cart item".to_string()))
    }

    /// Overwrite a line's quantity
    pub async fn set_item_quantity(
        &self,
        id: &CartItemId,
        quantity: i64,
    ) -> RepoResult<CartItem> {
        let items: Vec<CartItem> = self
            .base
            .db()
            .query("UPDATE $item SET quantity = $quantity RETURN AFTER")
            .bind(("item", id.clone()))
            .bind(("quantity", quantity))
            .await?
            .take(0)?;
        items
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Cart item {} not found", id)))
    }

    /// Delete a single line
    pub async fn delete_item(&self, id: &CartItemId) -> RepoResult<()> {
        let _: Option<CartItem> = self.base.db().delete(id.clone()).await?;
        Ok(())
    }

    /// Delete every line of a cart (the cart record itself stays)
    pub async fn clear(&self, cart: &CartId) -> RepoResult<()> {
        self.base
            .db()
            .query("DELETE cart_item WHERE cart = $cart")
            .bind(("cart", cart.clone()))
            .await?
            .check()?;
        Ok(())
    }
}
