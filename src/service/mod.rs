//! Data service seam.
//!
//! Every screen talks to the business data through [`DataService`]. The
//! remote backend speaks JSON over HTTP; the local backend keeps the same
//! collections in a JSON file and applies the stock and costing rules itself.

pub mod http;
pub mod local;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{AppConfig, ServiceMode};
use crate::error::{AppError, Result};
use crate::models::{
    BatchStatus, BatchUpdate, CostUpdate, Customer, DailyCostMetrics, FinishedGood, InventoryItem, MushroomBatch,
    NewPurchaseOrder, NewSale, PurchaseOrder, Rates, Recipe, RevenuePoint, SaleStatus, SalesRecord, Supplier,
};

pub use http::HttpService;
pub use local::LocalService;

/// Envelope every service call answers with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ServiceResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }

    /// Unwrap the payload, turning `success: false` into a service error.
    pub fn into_result(self) -> Result<T> {
        if !self.success {
            return Err(AppError::service(
                self.message.unwrap_or_else(|| "Request failed".to_string()),
            ));
        }
        self.data
            .ok_or_else(|| AppError::service("Service returned no data"))
    }

    /// Like [`into_result`](Self::into_result) for calls that return nothing useful.
    pub fn into_unit(self) -> Result<()> {
        if self.success {
            Ok(())
        } else {
            Err(AppError::service(
                self.message.unwrap_or_else(|| "Request failed".to_string()),
            ))
        }
    }
}

/// Operations the finance and processing screens need.
#[async_trait]
pub trait DataService: Send + Sync {
    /// True when talking to the shared remote service.
    fn is_remote(&self) -> bool;

    // Inventory and procurement
    async fn inventory(&self) -> Result<Vec<InventoryItem>>;
    async fn add_inventory_item(&self, item: InventoryItem) -> Result<InventoryItem>;
    async fn purchase_orders(&self) -> Result<Vec<PurchaseOrder>>;
    async fn create_purchase_order(&self, order: NewPurchaseOrder) -> Result<PurchaseOrder>;
    /// QC passed: stock is added to the ordered item.
    async fn receive_purchase_order(&self, id: &str) -> Result<PurchaseOrder>;
    async fn complain_purchase_order(&self, id: &str, reason: &str) -> Result<PurchaseOrder>;
    async fn resolve_complaint(&self, id: &str, resolution: &str) -> Result<PurchaseOrder>;
    async fn suppliers(&self) -> Result<Vec<Supplier>>;
    async fn add_supplier(&self, supplier: Supplier) -> Result<Supplier>;
    async fn delete_supplier(&self, id: &str) -> Result<()>;

    // Sales
    async fn customers(&self) -> Result<Vec<Customer>>;
    async fn add_customer(&self, customer: Customer) -> Result<Customer>;
    async fn finished_goods(&self) -> Result<Vec<FinishedGood>>;
    async fn sales(&self) -> Result<Vec<SalesRecord>>;
    async fn create_sale(&self, sale: NewSale) -> Result<SalesRecord>;
    async fn update_sale_status(&self, id: &str, status: SaleStatus) -> Result<SalesRecord>;

    // Costs
    async fn daily_costs(&self) -> Result<Vec<DailyCostMetrics>>;
    async fn update_daily_cost(&self, id: &str, update: CostUpdate) -> Result<DailyCostMetrics>;
    /// Delivered revenue per day for the last seven days, oldest first.
    async fn weekly_revenue(&self) -> Result<Vec<RevenuePoint>>;
    async fn rates(&self) -> Result<Rates>;
    async fn set_rates(&self, rates: Rates) -> Result<Rates>;

    // Processing
    async fn batches(&self) -> Result<Vec<MushroomBatch>>;
    async fn update_batch_status(&self, id: &str, status: BatchStatus, update: BatchUpdate) -> Result<MushroomBatch>;
    async fn recipes(&self) -> Result<Vec<Recipe>>;
    /// Insert or replace by id.
    async fn save_recipe(&self, recipe: Recipe) -> Result<Recipe>;
    async fn delete_recipe(&self, id: &str) -> Result<()>;
}

/// Build the backend selected in the config.
pub fn connect(config: &AppConfig) -> Result<Arc<dyn DataService>> {
    match config.service.mode {
        ServiceMode::Remote => {
            tracing::info!("Using remote data service at {}", config.service.base_url);
            Ok(Arc::new(HttpService::new(&config.service)?))
        }
        ServiceMode::Local => {
            let path = config.local_store_path();
            tracing::info!("Using local data store at {}", path.display());
            Ok(Arc::new(LocalService::open(path)?))
        }
    }
}
