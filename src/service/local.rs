//! Offline data service backed by a single JSON document.
//!
//! The whole document is held in memory behind a `RwLock` and written back
//! after every mutation. Writes go to a sibling temp file first and are then
//! renamed over the store so a crash never leaves half a document behind.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::DataService;
use crate::error::{AppError, Result};
use crate::models::{
    BatchStatus, BatchUpdate, CostUpdate, Customer, DailyCostMetrics, FinishedGood, InventoryItem, MushroomBatch,
    NewPurchaseOrder, NewSale, PurchaseOrder, PurchaseOrderStatus, Rates, Recipe, RevenuePoint, SaleItem, SaleStatus,
    SalesRecord, Supplier,
};

/// Everything the local store persists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreData {
    pub inventory: Vec<InventoryItem>,
    pub purchase_orders: Vec<PurchaseOrder>,
    pub suppliers: Vec<Supplier>,
    pub customers: Vec<Customer>,
    pub finished_goods: Vec<FinishedGood>,
    pub sales: Vec<SalesRecord>,
    pub daily_costs: Vec<DailyCostMetrics>,
    pub rates: Rates,
    pub batches: Vec<MushroomBatch>,
    pub recipes: Vec<Recipe>,
    /// Suffix that keeps generated ids unique within one millisecond.
    seq: u64,
}

impl StoreData {
    fn next_id(&mut self, prefix: &str) -> String {
        self.seq += 1;
        format!("{prefix}-{}{:03}", Utc::now().timestamp_millis(), self.seq % 1000)
    }

    fn order_mut(&mut self, id: &str) -> Result<&mut PurchaseOrder> {
        self.purchase_orders
            .iter_mut()
            .find(|po| po.id == id)
            .ok_or_else(|| AppError::not_found(format!("Purchase order {id}")))
    }

    fn create_order(&mut self, order: NewPurchaseOrder) -> Result<PurchaseOrder> {
        if order.packs < 1 {
            return Err(AppError::validation("Quantity must be at least 1 pack"));
        }
        let id = self.next_id("po");
        let item = self
            .inventory
            .iter()
            .find(|i| i.id == order.item_id)
            .ok_or_else(|| AppError::not_found(format!("Inventory item {}", order.item_id)))?;

        let po = PurchaseOrder {
            id,
            item_id: item.id.clone(),
            item_name: item.name.clone(),
            supplier: order.supplier,
            quantity: order.packs,
            total_units: order.packs * item.units_per_pack(),
            total_cost: order.packs as f64 * item.unit_cost,
            status: PurchaseOrderStatus::Ordered,
            date_ordered: Utc::now(),
            complaint_reason: None,
            resolution: None,
        };
        self.purchase_orders.push(po.clone());
        Ok(po)
    }

    fn receive_order(&mut self, id: &str) -> Result<PurchaseOrder> {
        let po = self.order_mut(id)?;
        if po.status != PurchaseOrderStatus::Ordered {
            return Err(AppError::validation(format!("Order {id} is not awaiting delivery")));
        }
        po.status = PurchaseOrderStatus::Received;
        let po = po.clone();

        match self.inventory.iter_mut().find(|i| i.id == po.item_id) {
            Some(item) => item.quantity += po.total_units,
            None => warn!("Received order {} for unknown item {}", po.id, po.item_id),
        }
        Ok(po)
    }

    fn complain_order(&mut self, id: &str, reason: &str) -> Result<PurchaseOrder> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::validation("Complaint reason is required"));
        }
        let po = self.order_mut(id)?;
        if po.status != PurchaseOrderStatus::Ordered {
            return Err(AppError::validation(format!("Order {id} is not awaiting delivery")));
        }
        po.status = PurchaseOrderStatus::Complaint;
        po.complaint_reason = Some(reason.to_string());
        Ok(po.clone())
    }

    fn resolve_order(&mut self, id: &str, resolution: &str) -> Result<PurchaseOrder> {
        let po = self.order_mut(id)?;
        if po.status != PurchaseOrderStatus::Complaint {
            return Err(AppError::validation(format!("Order {id} has no open complaint")));
        }
        po.status = PurchaseOrderStatus::Resolved;
        po.resolution = Some(resolution.to_string());
        Ok(po.clone())
    }

    /// Draw stock across the product group in stored order.
    fn create_sale(&mut self, sale: NewSale) -> Result<SalesRecord> {
        if sale.quantity < 1 {
            return Err(AppError::validation("Quantity must be at least 1"));
        }
        if !sale.unit_price.is_finite() || sale.unit_price < 0.0 {
            return Err(AppError::validation("Price cannot be negative"));
        }
        let customer = self
            .customers
            .iter()
            .find(|c| c.id == sale.customer_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Customer {}", sale.customer_id)))?;
        let (recipe_name, packaging_type) = self
            .finished_goods
            .iter()
            .find(|g| g.id == sale.good_id)
            .map(|g| (g.recipe_name.clone(), g.packaging_type.clone()))
            .ok_or_else(|| AppError::not_found(format!("Product {}", sale.good_id)))?;

        let in_group = |g: &FinishedGood| g.recipe_name == recipe_name && g.packaging_type == packaging_type;
        let available: i64 = self
            .finished_goods
            .iter()
            .filter(|g| in_group(g) && g.quantity > 0)
            .map(|g| g.quantity)
            .sum();
        if available < sale.quantity {
            return Err(AppError::service(format!(
                "Insufficient stock: {available} available, {} requested",
                sale.quantity
            )));
        }

        let mut remaining = sale.quantity;
        for good in self.finished_goods.iter_mut().filter(|g| in_group(g) && g.quantity > 0) {
            let take = remaining.min(good.quantity);
            good.quantity -= take;
            remaining -= take;
            if remaining == 0 {
                break;
            }
        }

        let item = SaleItem {
            recipe_name,
            packaging_type,
            quantity: sale.quantity,
            unit_price: sale.unit_price,
        };
        let total_amount = item.line_total();
        let id = self.next_id("sale");
        let record = SalesRecord {
            invoice_id: format!("INV-{}", id.trim_start_matches("sale-")),
            id,
            customer_id: customer.id,
            customer_name: customer.name,
            customer_email: customer.email,
            customer_phone: customer.contact,
            items: vec![item],
            total_amount,
            payment_method: sale.payment_method,
            status: SaleStatus::Invoiced,
            date_created: Utc::now(),
        };
        self.sales.push(record.clone());
        Ok(record)
    }

    fn update_batch(&mut self, id: &str, status: BatchStatus, update: &BatchUpdate, today: NaiveDate) -> Result<MushroomBatch> {
        let batch = self
            .batches
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| AppError::not_found(format!("Batch {id}")))?;
        batch.apply(status, update);
        let batch = batch.clone();

        if status == BatchStatus::DryingComplete {
            let wastage_kg = update.processing_wastage_kg.unwrap_or(0.0);
            if wastage_kg > 0.0 {
                self.log_wastage(&batch, wastage_kg, today);
            }
        }
        Ok(batch)
    }

    /// Charge processing wastage to the batch's cost row for `today`.
    fn log_wastage(&mut self, batch: &MushroomBatch, wastage_kg: f64, today: NaiveDate) {
        let cost = wastage_kg * self.rates.raw_material_rate;
        let existing = self
            .daily_costs
            .iter()
            .position(|c| c.date == today && c.reference_id == batch.id);

        let index = match existing {
            Some(index) => index,
            None => {
                let id = self.next_id("cost");
                self.daily_costs.push(DailyCostMetrics {
                    id,
                    date: today,
                    reference_id: batch.id.clone(),
                    weight_processed: batch.input_weight_kg(),
                    processing_hours: 0.0,
                    raw_material_cost: 0.0,
                    packaging_cost: 0.0,
                    labor_cost: 0.0,
                    wastage_cost: 0.0,
                    total_cost: 0.0,
                });
                self.daily_costs.len() - 1
            }
        };

        let row = &mut self.daily_costs[index];
        row.wastage_cost += cost;
        row.recompute_total();
        debug!("Logged {wastage_kg}kg wastage for batch {} as {cost:.2}", batch.id);
    }
}

/// Delivered revenue per day for the seven days ending `today`, oldest first.
pub fn weekly_revenue_at(sales: &[SalesRecord], today: NaiveDate) -> Vec<RevenuePoint> {
    (0..7u64)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .map(|date| RevenuePoint {
            date,
            amount: sales
                .iter()
                .filter(|s| s.is_delivered() && s.date_created.date_naive() == date)
                .map(|s| s.total_amount)
                .sum(),
        })
        .collect()
}

/// JSON-file backed [`DataService`].
pub struct LocalService {
    path: PathBuf,
    data: RwLock<StoreData>,
}

impl LocalService {
    /// Open the store at `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let data: StoreData = serde_json::from_str(&content)?;
            info!(
                "Loaded local store: {} batches, {} recipes, {} orders",
                data.batches.len(),
                data.recipes.len(),
                data.purchase_orders.len()
            );
            data
        } else {
            info!("No local store at {}, starting empty", path.display());
            StoreData::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    /// Open a store pre-filled with `data` (used by tests).
    pub fn with_data(path: impl Into<PathBuf>, data: StoreData) -> Self {
        Self {
            path: path.into(),
            data: RwLock::new(data),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, data: &StoreData) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let content = serde_json::to_vec_pretty(data)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    async fn read<T>(&self, f: impl FnOnce(&StoreData) -> T + Send) -> T {
        let data = self.data.read().await;
        f(&data)
    }

    /// Apply a mutation and write the document back on success.
    async fn write<T>(&self, f: impl FnOnce(&mut StoreData) -> Result<T> + Send) -> Result<T> {
        let mut data = self.data.write().await;
        let mut draft = data.clone();
        let value = f(&mut draft)?;
        self.persist(&draft).await?;
        *data = draft;
        Ok(value)
    }
}

#[async_trait]
impl DataService for LocalService {
    fn is_remote(&self) -> bool {
        false
    }

    async fn inventory(&self) -> Result<Vec<InventoryItem>> {
        Ok(self.read(|d| d.inventory.clone()).await)
    }

    async fn add_inventory_item(&self, item: InventoryItem) -> Result<InventoryItem> {
        self.write(|d| {
            d.inventory.push(item.clone());
            Ok(item)
        })
        .await
    }

    async fn purchase_orders(&self) -> Result<Vec<PurchaseOrder>> {
        Ok(self.read(|d| d.purchase_orders.clone()).await)
    }

    async fn create_purchase_order(&self, order: NewPurchaseOrder) -> Result<PurchaseOrder> {
        self.write(|d| d.create_order(order)).await
    }

    async fn receive_purchase_order(&self, id: &str) -> Result<PurchaseOrder> {
        self.write(|d| d.receive_order(id)).await
    }

    async fn complain_purchase_order(&self, id: &str, reason: &str) -> Result<PurchaseOrder> {
        self.write(|d| d.complain_order(id, reason)).await
    }

    async fn resolve_complaint(&self, id: &str, resolution: &str) -> Result<PurchaseOrder> {
        self.write(|d| d.resolve_order(id, resolution)).await
    }

    async fn suppliers(&self) -> Result<Vec<Supplier>> {
        Ok(self.read(|d| d.suppliers.clone()).await)
    }

    async fn add_supplier(&self, supplier: Supplier) -> Result<Supplier> {
        self.write(|d| {
            if supplier.name.trim().is_empty() {
                return Err(AppError::validation("Supplier name is required"));
            }
            d.suppliers.push(supplier.clone());
            Ok(supplier)
        })
        .await
    }

    async fn delete_supplier(&self, id: &str) -> Result<()> {
        self.write(|d| {
            let before = d.suppliers.len();
            d.suppliers.retain(|s| s.id != id);
            if d.suppliers.len() == before {
                return Err(AppError::not_found(format!("Supplier {id}")));
            }
            Ok(())
        })
        .await
    }

    async fn customers(&self) -> Result<Vec<Customer>> {
        Ok(self.read(|d| d.customers.clone()).await)
    }

    async fn add_customer(&self, customer: Customer) -> Result<Customer> {
        self.write(|d| {
            if customer.name.trim().is_empty() || customer.email.trim().is_empty() {
                return Err(AppError::validation("Customer name and email are required"));
            }
            d.customers.push(customer.clone());
            Ok(customer)
        })
        .await
    }

    async fn finished_goods(&self) -> Result<Vec<FinishedGood>> {
        Ok(self.read(|d| d.finished_goods.clone()).await)
    }

    async fn sales(&self) -> Result<Vec<SalesRecord>> {
        Ok(self.read(|d| d.sales.clone()).await)
    }

    async fn create_sale(&self, sale: NewSale) -> Result<SalesRecord> {
        self.write(|d| d.create_sale(sale)).await
    }

    async fn update_sale_status(&self, id: &str, status: SaleStatus) -> Result<SalesRecord> {
        self.write(|d| {
            let sale = d
                .sales
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or_else(|| AppError::not_found(format!("Sale {id}")))?;
            sale.status = status;
            Ok(sale.clone())
        })
        .await
    }

    async fn daily_costs(&self) -> Result<Vec<DailyCostMetrics>> {
        Ok(self.read(|d| d.daily_costs.clone()).await)
    }

    async fn update_daily_cost(&self, id: &str, update: CostUpdate) -> Result<DailyCostMetrics> {
        self.write(|d| {
            let row = d
                .daily_costs
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or_else(|| AppError::not_found(format!("Cost row {id}")))?;
            row.apply(&update);
            Ok(row.clone())
        })
        .await
    }

    async fn weekly_revenue(&self) -> Result<Vec<RevenuePoint>> {
        let today = Utc::now().date_naive();
        Ok(self.read(|d| weekly_revenue_at(&d.sales, today)).await)
    }

    async fn rates(&self) -> Result<Rates> {
        Ok(self.read(|d| d.rates).await)
    }

    async fn set_rates(&self, rates: Rates) -> Result<Rates> {
        self.write(|d| {
            if rates.labor_rate < 0.0 || rates.raw_material_rate < 0.0 {
                return Err(AppError::validation("Rates cannot be negative"));
            }
            d.rates = rates;
            Ok(rates)
        })
        .await
    }

    async fn batches(&self) -> Result<Vec<MushroomBatch>> {
        Ok(self.read(|d| d.batches.clone()).await)
    }

    async fn update_batch_status(&self, id: &str, status: BatchStatus, update: BatchUpdate) -> Result<MushroomBatch> {
        let today = Utc::now().date_naive();
        self.write(|d| d.update_batch(id, status, &update, today)).await
    }

    async fn recipes(&self) -> Result<Vec<Recipe>> {
        Ok(self.read(|d| d.recipes.clone()).await)
    }

    async fn save_recipe(&self, recipe: Recipe) -> Result<Recipe> {
        self.write(|d| {
            match d.recipes.iter_mut().find(|r| r.id == recipe.id) {
                Some(existing) => *existing = recipe.clone(),
                None => d.recipes.push(recipe.clone()),
            }
            Ok(recipe)
        })
        .await
    }

    async fn delete_recipe(&self, id: &str) -> Result<()> {
        self.write(|d| {
            let before = d.recipes.len();
            d.recipes.retain(|r| r.id != id);
            if d.recipes.len() == before {
                return Err(AppError::not_found(format!("Recipe {id}")));
            }
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ItemSubtype, ItemType, PaymentMethod, ProcessConfig};
    use chrono::{DateTime, TimeZone};

    fn pouch() -> InventoryItem {
        InventoryItem {
            id: "inv-1".to_string(),
            name: "Red Pouch".to_string(),
            item_type: ItemType::Packaging,
            subtype: Some(ItemSubtype::Pouch),
            quantity: 10,
            threshold: 50,
            unit: "units".to_string(),
            unit_cost: 45.0,
            supplier: Some("PackCo".to_string()),
            pack_size: Some(100),
        }
    }

    fn good(id: &str, qty: i64) -> FinishedGood {
        FinishedGood {
            id: id.to_string(),
            recipe_name: "Garlic".to_string(),
            packaging_type: "POUCH".to_string(),
            quantity: qty,
            selling_price: Some(18.0),
        }
    }

    fn batch() -> MushroomBatch {
        MushroomBatch {
            id: "B-1".to_string(),
            source_farm: "Hilltop".to_string(),
            net_weight_kg: 5.0,
            remaining_weight_kg: None,
            status: BatchStatus::Processing,
            process_config: Some(ProcessConfig::new(Utc::now(), 60, 120, 300)),
            selected_recipe_name: Some("Garlic".to_string()),
            recipe_type: None,
            quality_check_passed: None,
            processing_wastage_kg: None,
            wastage_reason: None,
        }
    }

    fn seeded(dir: &tempfile::TempDir) -> LocalService {
        let data = StoreData {
            inventory: vec![pouch()],
            customers: vec![Customer {
                id: "cust-1".to_string(),
                name: "Cafe".to_string(),
                email: "cafe@example.com".to_string(),
                contact: "012".to_string(),
                address: String::new(),
            }],
            finished_goods: vec![good("fg-1", 3), good("fg-2", 0), good("fg-3", 5)],
            batches: vec![batch()],
            ..Default::default()
        };
        LocalService::with_data(dir.path().join("store.json"), data)
    }

    #[tokio::test]
    async fn test_order_lifecycle_adds_stock() {
        let dir = tempfile::tempdir().unwrap();
        let svc = seeded(&dir);

        let po = svc
            .create_purchase_order(NewPurchaseOrder {
                item_id: "inv-1".to_string(),
                packs: 2,
                supplier: "PackCo".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(po.total_units, 200);
        assert_eq!(po.total_cost, 90.0);
        assert_eq!(po.status, PurchaseOrderStatus::Ordered);

        let received = svc.receive_purchase_order(&po.id).await.unwrap();
        assert_eq!(received.status, PurchaseOrderStatus::Received);
        assert_eq!(svc.inventory().await.unwrap()[0].quantity, 210);

        // a received order cannot be received twice
        assert!(svc.receive_purchase_order(&po.id).await.is_err());
    }

    #[tokio::test]
    async fn test_complaint_then_resolve() {
        let dir = tempfile::tempdir().unwrap();
        let svc = seeded(&dir);
        let po = svc
            .create_purchase_order(NewPurchaseOrder {
                item_id: "inv-1".to_string(),
                packs: 1,
                supplier: "PackCo".to_string(),
            })
            .await
            .unwrap();

        assert!(svc.complain_purchase_order(&po.id, "  ").await.is_err());
        let po = svc.complain_purchase_order(&po.id, "torn boxes").await.unwrap();
        assert_eq!(po.complaint_reason.as_deref(), Some("torn boxes"));

        let po = svc.resolve_complaint(&po.id, "Refund Processed").await.unwrap();
        assert_eq!(po.status, PurchaseOrderStatus::Resolved);
        assert_eq!(svc.inventory().await.unwrap()[0].quantity, 10);
    }

    #[tokio::test]
    async fn test_sale_draws_stock_across_group() {
        let dir = tempfile::tempdir().unwrap();
        let svc = seeded(&dir);

        let sale = svc
            .create_sale(NewSale {
                customer_id: "cust-1".to_string(),
                good_id: "fg-1".to_string(),
                quantity: 6,
                unit_price: 18.0,
                payment_method: PaymentMethod::Cod,
            })
            .await
            .unwrap();

        assert_eq!(sale.total_amount, 108.0);
        assert_eq!(sale.status, SaleStatus::Invoiced);
        assert_eq!(sale.customer_phone, "012");
        assert!(sale.invoice_id.starts_with("INV-"));

        let stock: Vec<i64> = svc.finished_goods().await.unwrap().iter().map(|g| g.quantity).collect();
        assert_eq!(stock, vec![0, 0, 2]);
    }

    #[tokio::test]
    async fn test_sale_rejects_insufficient_stock() {
        let dir = tempfile::tempdir().unwrap();
        let svc = seeded(&dir);

        let err = svc
            .create_sale(NewSale {
                customer_id: "cust-1".to_string(),
                good_id: "fg-1".to_string(),
                quantity: 9,
                unit_price: 18.0,
                payment_method: PaymentMethod::Cash,
            })
            .await
            .unwrap_err();

        assert!(err.to_string().starts_with("Insufficient stock"));
        assert_eq!(svc.finished_goods().await.unwrap()[0].quantity, 3);
    }

    #[tokio::test]
    async fn test_completed_batch_logs_wastage() {
        let dir = tempfile::tempdir().unwrap();
        let svc = seeded(&dir);

        let update = BatchUpdate {
            quality_check_passed: Some(true),
            processing_wastage_kg: Some(0.5),
            wastage_reason: Some("Burnt".to_string()),
            ..Default::default()
        };
        let done = svc
            .update_batch_status("B-1", BatchStatus::DryingComplete, update)
            .await
            .unwrap();
        assert_eq!(done.status, BatchStatus::DryingComplete);

        let costs = svc.daily_costs().await.unwrap();
        assert_eq!(costs.len(), 1);
        assert_eq!(costs[0].reference_id, "B-1");
        assert_eq!(costs[0].wastage_cost, 4.0);
        assert_eq!(costs[0].total_cost, 4.0);
    }

    #[tokio::test]
    async fn test_recipe_upsert_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let svc = seeded(&dir);
        let mut recipe = Recipe {
            id: "r-1".to_string(),
            name: "Garlic".to_string(),
            ..Recipe::placeholder()
        };

        svc.save_recipe(recipe.clone()).await.unwrap();
        recipe.cook_time_minutes = 12.0;
        svc.save_recipe(recipe).await.unwrap();

        let recipes = svc.recipes().await.unwrap();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].cook_time_minutes, 12.0);

        svc.delete_recipe("r-1").await.unwrap();
        assert!(svc.recipes().await.unwrap().is_empty());
        assert!(matches!(svc.delete_recipe("r-1").await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let svc = LocalService::open(&path).unwrap();
        svc.set_rates(Rates {
            labor_rate: 14.0,
            raw_material_rate: 9.0,
        })
        .await
        .unwrap();
        svc.add_supplier(Supplier {
            id: "sup-1".to_string(),
            name: "PackCo".to_string(),
            address: String::new(),
            contact: String::new(),
        })
        .await
        .unwrap();
        drop(svc);

        let reopened = LocalService::open(&path).unwrap();
        assert_eq!(reopened.rates().await.unwrap().labor_rate, 14.0);
        assert_eq!(reopened.suppliers().await.unwrap().len(), 1);
        assert!(!reopened.is_remote());
    }

    #[tokio::test]
    async fn test_failed_write_leaves_state_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let svc = seeded(&dir);

        assert!(svc.delete_supplier("missing").await.is_err());
        assert!(!svc.path().exists());
    }

    #[test]
    fn test_weekly_revenue_window() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let at = |day: u32| -> DateTime<Utc> { Utc.with_ymd_and_hms(2025, 3, day, 9, 0, 0).unwrap() };
        let sale = |day: u32, amount: f64, status: SaleStatus| SalesRecord {
            id: format!("s-{day}"),
            invoice_id: String::new(),
            customer_id: String::new(),
            customer_name: String::new(),
            customer_email: String::new(),
            customer_phone: String::new(),
            items: Vec::new(),
            total_amount: amount,
            payment_method: PaymentMethod::Cash,
            status,
            date_created: at(day),
        };
        let sales = vec![
            sale(10, 50.0, SaleStatus::Delivered),
            sale(10, 25.0, SaleStatus::Delivered),
            sale(9, 99.0, SaleStatus::Invoiced),
            sale(4, 10.0, SaleStatus::Delivered),
            sale(3, 70.0, SaleStatus::Delivered),
        ];

        let points = weekly_revenue_at(&sales, today);

        assert_eq!(points.len(), 7);
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
        assert_eq!(points[0].amount, 10.0);
        assert_eq!(points[5].amount, 0.0);
        assert_eq!(points[6].amount, 75.0);
    }
}
