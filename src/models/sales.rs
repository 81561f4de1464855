//! Customer, finished goods and sales DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A customer record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub address: String,
}

/// Packed product in stock, ready for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishedGood {
    pub id: String,
    pub recipe_name: String,
    pub packaging_type: String,
    pub quantity: i64,
    #[serde(default)]
    pub selling_price: Option<f64>,
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Cod,
    CreditCard,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [PaymentMethod::Cash, PaymentMethod::Cod, PaymentMethod::CreditCard];

    pub fn name(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Cod => "COD",
            PaymentMethod::CreditCard => "Card",
        }
    }
}

/// Sale lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaleStatus {
    Invoiced,
    Delivered,
}

impl SaleStatus {
    pub fn name(&self) -> &'static str {
        match self {
            SaleStatus::Invoiced => "INVOICED",
            SaleStatus::Delivered => "DELIVERED",
        }
    }
}

/// One invoice line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub recipe_name: String,
    pub packaging_type: String,
    pub quantity: i64,
    pub unit_price: f64,
}

impl SaleItem {
    pub fn line_total(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

/// An invoiced sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesRecord {
    pub id: String,
    pub invoice_id: String,
    pub customer_id: String,
    pub customer_name: String,
    #[serde(default)]
    pub customer_email: String,
    #[serde(default)]
    pub customer_phone: String,
    pub items: Vec<SaleItem>,
    pub total_amount: f64,
    pub payment_method: PaymentMethod,
    pub status: SaleStatus,
    pub date_created: DateTime<Utc>,
}

impl SalesRecord {
    pub fn is_delivered(&self) -> bool {
        self.status == SaleStatus::Delivered
    }
}

/// DTO for creating a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSale {
    pub customer_id: String,
    /// Any finished good of the product group; stock is drawn across the group.
    pub good_id: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub payment_method: PaymentMethod,
}
