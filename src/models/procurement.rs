//! Supplier and purchase order DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A supplier in the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub contact: String,
}

/// Purchase order lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseOrderStatus {
    Ordered,
    Received,
    Complaint,
    Resolved,
}

impl PurchaseOrderStatus {
    /// Orders that count as money spent on stock.
    pub fn is_spend(&self) -> bool {
        matches!(self, PurchaseOrderStatus::Ordered | PurchaseOrderStatus::Received)
    }
}

/// A purchase order for packaging or label stock, counted in packs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    pub id: String,
    pub item_id: String,
    pub item_name: String,
    pub supplier: String,
    /// Number of packs.
    pub quantity: i64,
    pub total_units: i64,
    pub total_cost: f64,
    pub status: PurchaseOrderStatus,
    pub date_ordered: DateTime<Utc>,
    #[serde(default)]
    pub complaint_reason: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
}

/// DTO for creating a purchase order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPurchaseOrder {
    pub item_id: String,
    pub packs: i64,
    pub supplier: String,
}

/// Fixed outcomes offered when closing a complaint.
pub mod resolution {
    pub const REPLACEMENT: &str = "Replacement Received";
    pub const REFUND: &str = "Refund Processed";
    pub const CLOSED: &str = "Closed (No Action)";

    pub const ALL: [&str; 3] = [REPLACEMENT, REFUND, CLOSED];
}
