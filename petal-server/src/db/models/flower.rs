//! Flower Model

use super::serde_helpers;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Flower ID type
pub type FlowerId = RecordId;

/// Catalogue entry. `stock` is the shared sellable counter — every
/// mutation of it goes through the atomic conditional update path in
/// `FlowerRepository`, never read-modify-write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flower {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<FlowerId>,
    pub name: String,
    /// Exact decimal, serialized as a string ("4.99")
    pub price: Decimal,
    /// Sellable units, >= 0 at all times
    pub stock: i64,
    pub image_url: Option<String>,
}

/// Create flower payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowerCreate {
    pub name: String,
    pub price: Decimal,
    pub stock: i64,
    pub image_url: Option<String>,
}

/// Update flower payload — only provided fields are applied
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}
