//! Order Model
//!
//! Orders are append-only snapshots: the line items, unit prices and the
//! total are frozen at placement time and never recomputed. The single
//! mutable field is `status`, driven by the lifecycle state machine.

use super::serde_helpers;
use super::{FlowerId, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use surrealdb::RecordId;

/// Order ID type
pub type OrderId = RecordId;

// =============================================================================
// Order Status (state machine)
// =============================================================================

/// Order lifecycle status
///
/// ```text
/// PENDING ──► CONFIRMED ──► DELIVERED (terminal)
///    │             │
///    └──────┬──────┘
///           ▼
///       CANCELLED (terminal)
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    /// Terminal states have no outgoing transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Whether the canonical state machine allows `self -> next`.
    ///
    /// Test-only description of the diagram above. Runtime enforcement
    /// is split differently: customer cancellation requires exactly
    /// `Pending`, and the administrative status change rejects only
    /// terminal states, so an admin may mark a `Pending` order
    /// `DELIVERED` without passing through `CONFIRMED`.
    #[cfg(test)]
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        match self {
            OrderStatus::Pending => {
                matches!(next, OrderStatus::Confirmed | OrderStatus::Cancelled)
            }
            OrderStatus::Confirmed => {
                matches!(next, OrderStatus::Delivered | OrderStatus::Cancelled)
            }
            OrderStatus::Delivered | OrderStatus::Cancelled => false,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ();

    /// Case-insensitive parse of the four known literals
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(OrderStatus::Pending),
            "CONFIRMED" => Ok(OrderStatus::Confirmed),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            _ => Err(()),
        }
    }
}

// =============================================================================
// Order (embedded line items)
// =============================================================================

/// Immutable line-item snapshot
///
/// `flower` is nullable so the line survives catalogue deletion; the
/// name and unit price snapshots keep history readable regardless.
/// `subtotal` is stored (not recomputed) for audit stability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub flower: Option<FlowerId>,
    pub flower_name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

/// Order entity. Line items are embedded so one CREATE persists the
/// whole order atomically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<OrderId>,
    #[serde(with = "serde_helpers::record_id")]
    pub user: UserId,
    /// Snapshot of the total at placement time, == sum of subtotals
    pub total_price: Decimal,
    pub status: OrderStatus,
    pub delivery_address: Option<String>,
    pub items: Vec<OrderItem>,
    /// Set once at placement, immutable
    pub ordered_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_can_be_confirmed_or_cancelled() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Confirmed));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn confirmed_can_be_delivered_or_cancelled() {
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Delivered));
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Confirmed.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn terminal_states_have_no_outgoing_transitions() {
        for terminal in [OrderStatus::Delivered, OrderStatus::Cancelled] {
            assert!(terminal.is_terminal());
            for next in [
                OrderStatus::Pending,
                OrderStatus::Confirmed,
                OrderStatus::Delivered,
                OrderStatus::Cancelled,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn parse_is_case_insensitive_and_rejects_unknown() {
        assert_eq!("pending".parse::<OrderStatus>(), Ok(OrderStatus::Pending));
        assert_eq!("CONFIRMED".parse::<OrderStatus>(), Ok(OrderStatus::Confirmed));
        assert_eq!("Delivered".parse::<OrderStatus>(), Ok(OrderStatus::Delivered));
        assert!("SHIPPED".parse::<OrderStatus>().is_err());
        assert!("".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn status_serializes_as_screaming_snake_literal() {
        assert_eq!(
            serde_json::to_value(OrderStatus::Pending).unwrap(),
            serde_json::json!("PENDING")
        );
        let status: OrderStatus = serde_json::from_value(serde_json::json!("CANCELLED")).unwrap();
        assert_eq!(status, OrderStatus::Cancelled);
    }
}
