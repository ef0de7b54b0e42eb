//! Cart Model
//!
//! One cart per user (unique index), created lazily on first access and
//! never deleted, only emptied. At most one line per flower per cart —
//! duplicate adds merge quantities instead of creating a second line.

use super::serde_helpers;
use super::{FlowerId, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Cart ID type
pub type CartId = RecordId;

/// Cart line ID type
pub type CartItemId = RecordId;

/// Shopping cart entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<CartId>,
    #[serde(with = "serde_helpers::record_id")]
    pub user: UserId,
    pub created_at: DateTime<Utc>,
}

/// One line in a cart: flower reference + quantity (>= 1)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<CartItemId>,
    #[serde(with = "serde_helpers::record_id")]
    pub cart: CartId,
    #[serde(with = "serde_helpers::record_id")]
    pub flower: FlowerId,
    pub quantity: i64,
}

// =============================================================================
// API Response Types
// =============================================================================

/// Cart line joined with live flower data (for the summary view)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemView {
    #[serde(with = "serde_helpers::record_id")]
    pub id: CartItemId,
    #[serde(with = "serde_helpers::record_id")]
    pub flower: FlowerId,
    pub flower_name: String,
    pub unit_price: Decimal,
    pub quantity: i64,
    pub line_total: Decimal,
}

/// Cart contents with a real-time calculated total
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartSummary {
    #[serde(with = "serde_helpers::record_id")]
    pub cart_id: CartId,
    pub items: Vec<CartItemView>,
    pub total_price: Decimal,
    pub item_count: usize,
}
