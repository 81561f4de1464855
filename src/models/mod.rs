//! Data models for procurement, sales, cost logs, batches and recipes.

pub mod batch;
pub mod costs;
pub mod inventory;
pub mod procurement;
pub mod recipe;
pub mod sales;

pub use batch::{BatchStatus, BatchUpdate, MushroomBatch, ProcessConfig};
pub use costs::{CostUpdate, DailyCostMetrics, Rates, RevenuePoint};
pub use inventory::{InventoryItem, ItemSubtype, ItemType};
pub use procurement::{NewPurchaseOrder, PurchaseOrder, PurchaseOrderStatus, Supplier};
pub use recipe::{Recipe, RecipeType};
pub use sales::{Customer, FinishedGood, NewSale, PaymentMethod, SaleItem, SaleStatus, SalesRecord};
