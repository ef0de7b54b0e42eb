//! Flower Repository
//!
//! Catalogue CRUD plus the two stock primitives the ordering core relies
//! on: `try_decrement_stock` and `increment_stock`. Both are single
//! UPDATE statements, so each is indivisible even when concurrent
//! checkouts race on the same counter.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Flower, FlowerCreate, FlowerId, FlowerUpdate};
use rust_decimal::Decimal;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const FLOWER_TABLE: &str = "flower";

#[derive(Clone)]
pub struct FlowerRepository {
    base: BaseRepository,
}

impl FlowerRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all flowers, ordered by name
    pub async fn find_all(&self) -> RepoResult<Vec<Flower>> {
        let flowers: Vec<Flower> = self
            .base
            .db()
            .query("SELECT * FROM flower ORDER BY name")
            .await?
            .take(0)?;
        Ok(flowers)
    }

    /// Find flower by id
    pub async fn find_by_id(&self, id: &FlowerId) -> RepoResult<Option<Flower>> {
        let flower: Option<Flower> = self.base.db().select(id.clone()).await?;
        Ok(flower)
    }

    /// Case-insensitive name search
    pub async fn search_by_name(&self, name: &str) -> RepoResult<Vec<Flower>> {
        let flowers: Vec<Flower> = self
            .base
            .db()
            .query(
                "SELECT * FROM flower \
                 WHERE string::contains(string::lowercase(name), string::lowercase($name)) \
                 ORDER BY name",
            )
            .bind(("name", name.to_string()))
            .await?
            .take(0)?;
        Ok(flowers)
    }

    /// Create a new flower
    pub async fn create(&self, data: FlowerCreate) -> RepoResult<Flower> {
        if data.name.trim().is_empty() {
            return Err(RepoError::Validation("Flower name cannot be blank".into()));
        }
        if data.price <= Decimal::ZERO {
            return Err(RepoError::Validation(
                "Flower price must be greater than 0".into(),
            ));
        }
        if data.stock < 0 {
            return Err(RepoError::Validation(
                "Flower stock cannot be negative".into(),
            ));
        }

        let flower = Flower {
            id: None,
            name: data.name,
            price: data.price,
            stock: data.stock,
            image_url: data.image_url,
        };

        let created: Option<Flower> = self
            .base
            .db()
            .create(FLOWER_TABLE)
            .content(flower)
            .await?;

        created.ok_or_else(|| RepoError::Database("Failed to create flower".to_string()))
    }

    /// Partially update a flower — only provided fields are applied
    pub async fn update(&self, id: &FlowerId, data: FlowerUpdate) -> RepoResult<Flower> {
        if let Some(name) = &data.name
            && name.trim().is_empty()
        {
            return Err(RepoError::Validation("Flower name cannot be blank".into()));
        }
        if let Some(price) = data.price
            && price <= Decimal::ZERO
        {
            return Err(RepoError::Validation(
                "Flower price must be greater than 0".into(),
            ));
        }
        if let Some(stock) = data.stock
            && stock < 0
        {
            return Err(RepoError::Validation(
                "Flower stock cannot be negative".into(),
            ));
        }

        // Build dynamic SET clauses with proper type bindings
        let mut set_parts: Vec<&str> = Vec::new();
        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if data.price.is_some() {
            set_parts.push("price = $price");
        }
        if data.stock.is_some() {
            set_parts.push("stock = $stock");
        }
        if data.image_url.is_some() {
            set_parts.push("image_url = $image_url");
        }

        if set_parts.is_empty() {
            // No fields to update
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Flower {} not found", id)));
        }

        let query_str = format!("UPDATE $thing SET {} RETURN AFTER", set_parts.join(", "));

        let mut query = self.base.db().query(query_str).bind(("thing", id.clone()));
        if let Some(v) = data.name {
            query = query.bind(("name", v));
        }
        if let Some(v) = data.price {
            query = query.bind(("price", v));
        }
        if let Some(v) = data.stock {
            query = query.bind(("stock", v));
        }
        if let Some(v) = data.image_url {
            query = query.bind(("image_url", v));
        }

        let flowers: Vec<Flower> = query.await?.take(0)?;
        flowers
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Flower {} not found", id)))
    }

    /// Hard delete a flower. Historical order lines keep their name and
    /// price snapshots, so deletion cannot corrupt order history.
    pub async fn delete(&self, id: &FlowerId) -> RepoResult<()> {
        let deleted: Option<Flower> = self.base.db().delete(id.clone()).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("Flower {} not found", id)));
        }
        Ok(())
    }

    // =========================================================================
    // Stock primitives
    // =========================================================================

    /// Atomic conditional decrement: reduce stock by `qty` only if the
    /// current stock covers it. Returns the updated flower on success,
    /// `None` if the condition did not hold (insufficient stock — or no
    /// such flower; callers distinguish via a follow-up read).
    ///
    /// This is the authoritative stock check. A read-then-write sequence
    /// here would lose updates under concurrent checkouts and oversell.
    pub async fn try_decrement_stock(
        &self,
        id: &FlowerId,
        qty: i64,
    ) -> RepoResult<Option<Flower>> {
        let updated: Vec<Flower> = self
            .base
            .db()
            .query(
                "UPDATE flower SET stock -= $qty \
                 WHERE id = $flower AND stock >= $qty \
                 RETURN AFTER",
            )
            .bind(("flower", id.clone()))
            .bind(("qty", qty))
            .await?
            .take(0)?;
        Ok(updated.into_iter().next())
    }

    /// Atomic increment, used to restore stock on cancellation and to
    /// undo partially applied reservations when a checkout aborts.
    pub async fn increment_stock(&self, id: &FlowerId, qty: i64) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $flower SET stock += $qty")
            .bind(("flower", id.clone()))
            .bind(("qty", qty))
            .await?
            .check()?;
        Ok(())
    }
}
