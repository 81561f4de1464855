//! Application state and async operation plumbing.

use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use eframe::egui;
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::finance::drafts::{complaint_reason, update_rates};
use crate::finance::{
    AvailableGood, CostDraft, CustomerDraft, FinancialSummary, OrderDraft, PieSlice, SaleDraft, SupplierDraft,
    available_goods, build_slices,
};
use crate::models::{
    BatchStatus, Customer, DailyCostMetrics, FinishedGood, InventoryItem, MushroomBatch, PurchaseOrder, Rates, Recipe,
    RecipeType, RevenuePoint, SaleStatus, SalesRecord, Supplier,
};
use crate::processing::{
    PlanSettings, QcForm, RecipeDraft, ensure_recipes, find_duplicates, floor_batches, plan_speed_up, plan_start,
    plan_switch,
};
use crate::service::DataService;

use super::components::colors;
use super::{dashboard, finance_dialogs, finance_panel, processing_panel};

/// Current panel being displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Dashboard,
    Finance,
    Processing,
}

impl Panel {
    pub fn name(&self) -> &'static str {
        match self {
            Panel::Dashboard => "Dashboard",
            Panel::Finance => "Finance",
            Panel::Processing => "Processing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FinanceTab {
    #[default]
    Procurement,
    Sales,
    Overview,
}

impl FinanceTab {
    pub const ALL: [FinanceTab; 3] = [FinanceTab::Procurement, FinanceTab::Sales, FinanceTab::Overview];

    pub fn name(&self) -> &'static str {
        match self {
            FinanceTab::Procurement => "Procurement",
            FinanceTab::Sales => "Sales & POS",
            FinanceTab::Overview => "Financial Overview",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingTab {
    #[default]
    Floor,
    Recipes,
}

/// Result of one finance refresh. `None` marks a dataset whose fetch failed.
#[derive(Debug, Default)]
pub struct FinanceSnapshot {
    pub inventory: Option<Vec<InventoryItem>>,
    pub orders: Option<Vec<PurchaseOrder>>,
    pub suppliers: Option<Vec<Supplier>>,
    pub customers: Option<Vec<Customer>>,
    pub finished_goods: Option<Vec<FinishedGood>>,
    pub sales: Option<Vec<SalesRecord>>,
    pub daily_costs: Option<Vec<DailyCostMetrics>>,
    pub weekly_revenue: Option<Vec<RevenuePoint>>,
    pub errors: Vec<String>,
}

/// Records behind the finance view.
#[derive(Debug, Clone, Default)]
pub struct FinanceData {
    pub inventory: Vec<InventoryItem>,
    pub orders: Vec<PurchaseOrder>,
    pub suppliers: Vec<Supplier>,
    pub customers: Vec<Customer>,
    pub finished_goods: Vec<FinishedGood>,
    pub sales: Vec<SalesRecord>,
    pub daily_costs: Vec<DailyCostMetrics>,
    pub weekly_revenue: Vec<RevenuePoint>,
    pub rates: Rates,
}

impl FinanceData {
    /// Take over every dataset that loaded; failed ones keep their previous value.
    pub fn merge(&mut self, snapshot: FinanceSnapshot) -> Vec<String> {
        if let Some(v) = snapshot.inventory {
            self.inventory = v;
        }
        if let Some(v) = snapshot.orders {
            self.orders = v;
        }
        if let Some(v) = snapshot.suppliers {
            self.suppliers = v;
        }
        if let Some(v) = snapshot.customers {
            self.customers = v;
        }
        if let Some(v) = snapshot.finished_goods {
            self.finished_goods = v;
        }
        if let Some(v) = snapshot.sales {
            self.sales = v;
        }
        if let Some(v) = snapshot.daily_costs {
            self.daily_costs = v;
        }
        if let Some(v) = snapshot.weekly_revenue {
            self.weekly_revenue = v;
        }
        snapshot.errors
    }

    pub fn summary(&self) -> FinancialSummary {
        FinancialSummary::compute(&self.orders, &self.daily_costs, &self.sales, &self.finished_goods)
    }

    /// Replace a record in place, or append it when it is new.
    fn upsert_order(&mut self, order: PurchaseOrder) {
        match self.orders.iter_mut().find(|o| o.id == order.id) {
            Some(slot) => *slot = order,
            None => self.orders.insert(0, order),
        }
    }

    fn upsert_sale(&mut self, sale: SalesRecord) {
        match self.sales.iter_mut().find(|s| s.id == sale.id) {
            Some(slot) => *slot = sale,
            None => self.sales.insert(0, sale),
        }
    }
}

/// Messages from async operations to the UI thread.
pub enum UiMessage {
    // Data loading
    FinanceLoaded(Box<FinanceSnapshot>),
    RatesLoaded(Rates),
    BatchesLoaded(Vec<MushroomBatch>),
    RecipesLoaded(Vec<Recipe>),
    LoadError(String),

    // CRUD operations
    OrderSaved(PurchaseOrder),
    SupplierSaved(Supplier),
    SupplierDeleted(String),
    CustomerSaved(Customer),
    SaleCreated(SalesRecord),
    SaleUpdated(SalesRecord),
    CostSaved(DailyCostMetrics),
    RatesSaved(Rates),
    BatchUpdated(MushroomBatch),
    BatchCompleted(MushroomBatch),
    RecipeSaved(Recipe),
    RecipeDeleted(String),
    RecipesRemoved(usize),
    OperationFailed(String),
}

/// Recipe editor state; numeric fields are kept as typed.
#[derive(Debug, Default, Clone)]
pub struct RecipeForm {
    pub id: Option<String>,
    pub name: String,
    pub recipe_type: RecipeType,
    pub base_weight: String,
    pub cook_time: String,
    pub temperature: String,
    pub notes: String,
    pub image_url: String,
    pub is_open: bool,
    pub is_editing: bool,
}

impl RecipeForm {
    /// Reset the form to default values.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Open a blank editor with the usual starting values.
    pub fn create() -> Self {
        Self {
            base_weight: "0.5".to_string(),
            cook_time: "10".to_string(),
            temperature: "160".to_string(),
            is_open: true,
            ..Default::default()
        }
    }

    /// Create a form pre-filled for editing an existing recipe.
    pub fn edit(recipe: &Recipe) -> Self {
        Self {
            id: Some(recipe.id.clone()),
            name: recipe.name.clone(),
            recipe_type: recipe.recipe_type,
            base_weight: recipe.base_weight_kg.to_string(),
            cook_time: recipe.cook_time_minutes.to_string(),
            temperature: recipe.temperature.to_string(),
            notes: recipe.notes.clone(),
            image_url: recipe.image_url.clone(),
            is_open: true,
            is_editing: true,
        }
    }

    pub fn to_draft(&self) -> RecipeDraft {
        let number = |text: &str| text.trim().parse::<f64>().ok().filter(|v| v.is_finite());
        RecipeDraft {
            id: self.id.clone(),
            name: self.name.clone(),
            recipe_type: self.recipe_type,
            base_weight_kg: number(&self.base_weight),
            cook_time_minutes: number(&self.cook_time),
            temperature: number(&self.temperature),
            notes: self.notes.clone(),
            image_url: self.image_url.clone(),
        }
    }
}

/// What the recipe picker is choosing a recipe for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipePick {
    Start(String),
    Switch(String),
}

impl RecipePick {
    pub fn batch_id(&self) -> &str {
        match self {
            RecipePick::Start(id) | RecipePick::Switch(id) => id,
        }
    }
}

/// Open finance dialog.
#[derive(Debug, Clone)]
pub enum FinanceDialog {
    NewOrder,
    ReceiveOrder(String),
    Complaint { order_id: String, reason: String },
    Resolve(String),
    AddSupplier,
    AddCustomer,
    Invoice(SalesRecord),
    EditCost,
    Rates { labor: String, raw: String },
}

/// Log level for activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Log entry for activity log.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
    pub level: LogLevel,
}

/// Delete confirmation target.
#[derive(Debug, Clone)]
pub enum DeleteTarget {
    Supplier(String, String),
    Recipe(String, String),
    AllRecipes,
}

/// Main application state.
pub struct App {
    pub config: AppConfig,
    service: Arc<dyn DataService>,
    rt: tokio::runtime::Runtime,
    tx: mpsc::UnboundedSender<UiMessage>,
    rx: mpsc::UnboundedReceiver<UiMessage>,

    // Navigation
    pub current_panel: Panel,
    pub finance_tab: FinanceTab,
    pub processing_tab: ProcessingTab,

    // Finance data and derived views
    pub finance: FinanceData,
    pub summary: FinancialSummary,
    pub pie_slices: Vec<PieSlice>,
    pub goods: Vec<AvailableGood>,
    pub finance_loading: bool,
    /// A refresh was requested while one was in flight.
    pub finance_refresh_pending: bool,

    // Processing data
    pub batches: Vec<MushroomBatch>,
    pub recipes: Vec<Recipe>,
    pub batches_loading: bool,

    // Forms
    pub order_form: OrderDraft,
    pub supplier_form: SupplierDraft,
    pub customer_form: CustomerDraft,
    pub sale_form: SaleDraft,
    pub cost_form: CostDraft,
    pub recipe_form: RecipeForm,
    pub qc_forms: HashMap<String, QcForm>,
    pub finance_dialog: Option<FinanceDialog>,
    pub recipe_pick: Option<RecipePick>,
    pub hovered_slice: Option<usize>,

    // Dialog state
    pub show_delete_confirm: bool,
    pub delete_target: Option<DeleteTarget>,
    pub error_message: Option<String>,
    pub success_message: Option<String>,

    // Activity log
    pub log_messages: Vec<LogEntry>,
}

impl App {
    pub fn new(config: AppConfig, service: Arc<dyn DataService>, rt: tokio::runtime::Runtime) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let mut app = Self {
            config,
            service,
            rt,
            tx,
            rx,
            current_panel: Panel::default(),
            finance_tab: FinanceTab::default(),
            processing_tab: ProcessingTab::default(),
            finance: FinanceData::default(),
            summary: FinancialSummary::default(),
            pie_slices: Vec::new(),
            goods: Vec::new(),
            finance_loading: false,
            finance_refresh_pending: false,
            batches: Vec::new(),
            recipes: Vec::new(),
            batches_loading: false,
            order_form: OrderDraft::default(),
            supplier_form: SupplierDraft::default(),
            customer_form: CustomerDraft::default(),
            sale_form: SaleDraft::default(),
            cost_form: CostDraft::default(),
            recipe_form: RecipeForm::default(),
            qc_forms: HashMap::new(),
            finance_dialog: None,
            recipe_pick: None,
            hovered_slice: None,
            show_delete_confirm: false,
            delete_target: None,
            error_message: None,
            success_message: None,
            log_messages: Vec::new(),
        };

        app.log_info(format!("Connected to {} data", app.backend_name().to_lowercase()));
        app.refresh_all();
        app
    }

    /// Add a log entry.
    pub fn log(&mut self, message: impl Into<String>, level: LogLevel) {
        self.log_messages.push(LogEntry {
            timestamp: Local::now(),
            message: message.into(),
            level,
        });
        // Keep only last 100 entries
        if self.log_messages.len() > 100 {
            self.log_messages.remove(0);
        }
    }

    pub fn log_info(&mut self, message: impl Into<String>) {
        self.log(message, LogLevel::Info);
    }

    pub fn log_success(&mut self, message: impl Into<String>) {
        self.log(message, LogLevel::Success);
    }

    pub fn log_warning(&mut self, message: impl Into<String>) {
        self.log(message, LogLevel::Warning);
    }

    pub fn log_error(&mut self, message: impl Into<String>) {
        self.log(message, LogLevel::Error);
    }

    /// Clear the activity log.
    pub fn clear_log(&mut self) {
        self.log_messages.clear();
    }

    /// Badge text for the active backend.
    pub fn backend_name(&self) -> &'static str {
        if self.service.is_remote() { "Cloud" } else { "Local" }
    }

    pub fn currency(&self) -> &str {
        &self.config.finance.currency
    }

    pub fn qc_tolerance(&self) -> f64 {
        self.config.processing.qc_tolerance_kg
    }

    /// Input form for a batch card, created on first use.
    pub fn qc_form(&mut self, batch_id: &str) -> &mut QcForm {
        self.qc_forms.entry(batch_id.to_string()).or_default()
    }

    /// Run a service call and post its result back as a message.
    fn spawn_call<T, F>(&self, call: F, on_ok: impl FnOnce(T) -> UiMessage + Send + 'static)
    where
        T: Send + 'static,
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let tx = self.tx.clone();
        self.rt.spawn(async move {
            match call.await {
                Ok(value) => {
                    let _ = tx.send(on_ok(value));
                }
                Err(e) => {
                    tracing::warn!("Service call failed: {e}");
                    let _ = tx.send(UiMessage::OperationFailed(e.to_string()));
                }
            }
        });
    }

    /// Reload everything both views show.
    pub fn refresh_all(&mut self) {
        self.refresh_finance();
        self.load_rates();
        self.load_batches();
        self.load_recipes();
    }

    /// Fetch all finance datasets concurrently and apply them together.
    ///
    /// A call made while a fetch is running is queued and issued once that
    /// fetch lands.
    pub fn refresh_finance(&mut self) {
        if self.finance_loading {
            self.finance_refresh_pending = true;
            return;
        }
        self.finance_loading = true;
        self.finance_refresh_pending = false;

        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            let (inventory, orders, suppliers, customers, finished_goods, sales, daily_costs, weekly_revenue) = tokio::join!(
                service.inventory(),
                service.purchase_orders(),
                service.suppliers(),
                service.customers(),
                service.finished_goods(),
                service.sales(),
                service.daily_costs(),
                service.weekly_revenue(),
            );

            let mut snapshot = FinanceSnapshot::default();
            let errors = &mut snapshot.errors;
            let inventory = keep(inventory, "inventory", errors);
            let orders = keep(orders, "purchase orders", errors);
            let suppliers = keep(suppliers, "suppliers", errors);
            let customers = keep(customers, "customers", errors);
            let finished_goods = keep(finished_goods, "finished goods", errors);
            let sales = keep(sales, "sales", errors);
            let daily_costs = keep(daily_costs, "daily costs", errors);
            let weekly_revenue = keep(weekly_revenue, "weekly revenue", errors);

            snapshot.inventory = inventory;
            snapshot.orders = orders;
            snapshot.suppliers = suppliers;
            snapshot.customers = customers;
            snapshot.finished_goods = finished_goods;
            snapshot.sales = sales;
            snapshot.daily_costs = daily_costs;
            snapshot.weekly_revenue = weekly_revenue;

            let _ = tx.send(UiMessage::FinanceLoaded(Box::new(snapshot)));
        });
    }

    pub fn load_rates(&mut self) {
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            match service.rates().await {
                Ok(rates) => {
                    let _ = tx.send(UiMessage::RatesLoaded(rates));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::LoadError(format!("Failed to load rates: {e}")));
                }
            }
        });
    }

    pub fn load_batches(&mut self) {
        self.batches_loading = true;
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            match service.batches().await {
                Ok(batches) => {
                    let _ = tx.send(UiMessage::BatchesLoaded(batches));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::LoadError(format!("Failed to load batches: {e}")));
                }
            }
        });
    }

    pub fn load_recipes(&mut self) {
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            match service.recipes().await {
                Ok(recipes) => {
                    let _ = tx.send(UiMessage::RecipesLoaded(recipes));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::LoadError(format!("Failed to load recipes: {e}")));
                }
            }
        });
    }

    /// Recompute everything derived from the finance records.
    fn recompute_finance(&mut self) {
        self.summary = self.finance.summary();
        self.pie_slices = build_slices(&self.summary);
        self.goods = available_goods(&self.finance.finished_goods, self.config.finance.default_selling_price);
        if self.hovered_slice.is_some_and(|i| i >= self.pie_slices.len()) {
            self.hovered_slice = None;
        }
    }

    // --- Procurement -------------------------------------------------------

    pub fn create_order(&mut self) {
        let order = match self.order_form.build(&self.finance.inventory) {
            Ok(order) => order,
            Err(e) => {
                self.error_message = Some(e.to_string());
                return;
            }
        };
        self.log_info(format!("Placing order for {} packs", order.packs));
        self.finance_dialog = None;

        let service = Arc::clone(&self.service);
        self.spawn_call(
            async move { service.create_purchase_order(order).await },
            UiMessage::OrderSaved,
        );
    }

    /// QC passed: stock is received.
    pub fn receive_order(&mut self, id: String) {
        self.finance_dialog = None;
        let service = Arc::clone(&self.service);
        self.spawn_call(
            async move { service.receive_purchase_order(&id).await },
            UiMessage::OrderSaved,
        );
    }

    pub fn complain_order(&mut self, id: String, reason: &str) {
        let reason = match complaint_reason(reason) {
            Ok(reason) => reason,
            Err(e) => {
                self.error_message = Some(e.to_string());
                return;
            }
        };
        self.finance_dialog = None;
        let service = Arc::clone(&self.service);
        self.spawn_call(
            async move { service.complain_purchase_order(&id, &reason).await },
            UiMessage::OrderSaved,
        );
    }

    pub fn resolve_order(&mut self, id: String, resolution: &'static str) {
        self.finance_dialog = None;
        let service = Arc::clone(&self.service);
        self.spawn_call(
            async move { service.resolve_complaint(&id, resolution).await },
            UiMessage::OrderSaved,
        );
    }

    /// Register a supplier and its first stock item.
    pub fn add_supplier(&mut self) {
        let (supplier, item) = match self
            .supplier_form
            .build(self.config.finance.default_stock_threshold, Utc::now())
        {
            Ok(pair) => pair,
            Err(e) => {
                self.error_message = Some(e.to_string());
                return;
            }
        };
        self.finance_dialog = None;

        let service = Arc::clone(&self.service);
        self.spawn_call(
            async move {
                let supplier = service.add_supplier(supplier).await?;
                service.add_inventory_item(item).await?;
                Ok::<_, AppError>(supplier)
            },
            UiMessage::SupplierSaved,
        );
    }

    pub fn delete_supplier(&mut self, id: String) {
        let service = Arc::clone(&self.service);
        self.spawn_call(
            async move {
                service.delete_supplier(&id).await?;
                Ok::<_, AppError>(id)
            },
            UiMessage::SupplierDeleted,
        );
    }

    // --- Sales ---------------------------------------------------------------

    pub fn add_customer(&mut self) {
        let customer = match self.customer_form.build(Utc::now()) {
            Ok(customer) => customer,
            Err(e) => {
                self.error_message = Some(e.to_string());
                return;
            }
        };
        self.finance_dialog = None;

        let service = Arc::clone(&self.service);
        self.spawn_call(
            async move { service.add_customer(customer).await },
            UiMessage::CustomerSaved,
        );
    }

    pub fn create_sale(&mut self) {
        let sale = match self.sale_form.build(&self.goods) {
            Ok(sale) => sale,
            Err(e) => {
                self.error_message = Some(e.to_string());
                return;
            }
        };

        let service = Arc::clone(&self.service);
        self.spawn_call(async move { service.create_sale(sale).await }, UiMessage::SaleCreated);
    }

    pub fn mark_delivered(&mut self, id: String) {
        let service = Arc::clone(&self.service);
        self.spawn_call(
            async move { service.update_sale_status(&id, SaleStatus::Delivered).await },
            UiMessage::SaleUpdated,
        );
    }

    // --- Costs ---------------------------------------------------------------

    pub fn save_cost(&mut self) {
        let update = match self.cost_form.build() {
            Ok(update) => update,
            Err(e) => {
                self.error_message = Some(e.to_string());
                return;
            }
        };
        self.finance_dialog = None;

        let id = self.cost_form.id.clone();
        let service = Arc::clone(&self.service);
        self.spawn_call(
            async move { service.update_daily_cost(&id, update).await },
            UiMessage::CostSaved,
        );
    }

    pub fn save_rates(&mut self, labor: &str, raw: &str) {
        let rates = match update_rates(self.finance.rates, Some(labor), Some(raw)) {
            Ok(rates) => rates,
            Err(e) => {
                self.error_message = Some(e.to_string());
                return;
            }
        };
        self.finance_dialog = None;

        let service = Arc::clone(&self.service);
        self.spawn_call(async move { service.set_rates(rates).await }, UiMessage::RatesSaved);
    }

    /// Export the daily cost log to a file picked by the user.
    pub fn export_cost_log(&mut self) {
        let filename = crate::export::generate_export_filename("cost_log");
        let Some(path) = crate::export::show_save_dialog(&filename) else {
            return;
        };

        let currency = self.currency().to_string();
        match crate::export::export_cost_log_to_excel(&self.finance.daily_costs, &currency, &path) {
            Ok(()) => self.export_done(&path, "cost log"),
            Err(e) => self.export_failed(e),
        }
    }

    pub fn export_invoice(&mut self, sale: &SalesRecord) {
        let filename = format!("invoice_{}.xlsx", sale.invoice_id);
        let Some(path) = crate::export::show_save_dialog(&filename) else {
            return;
        };

        let currency = self.currency().to_string();
        match crate::export::export_invoice_to_excel(sale, &currency, &path) {
            Ok(()) => self.export_done(&path, "invoice"),
            Err(e) => self.export_failed(e),
        }
    }

    fn export_done(&mut self, path: &Path, what: &str) {
        self.success_message = Some(format!("Exported to: {}", path.display()));
        self.log_success(format!("Exported {what}: {}", path.display()));
    }

    fn export_failed(&mut self, e: impl std::fmt::Display) {
        self.error_message = Some(format!("Export failed: {e}"));
        self.log_error(format!("Export failed: {e}"));
    }

    // --- Processing ----------------------------------------------------------

    fn plan_settings(&self) -> PlanSettings {
        PlanSettings::from(&self.config.processing)
    }

    fn find_batch(&self, id: &str) -> Option<&MushroomBatch> {
        self.batches.iter().find(|b| b.id == id)
    }

    /// Open the recipe picker for a received batch.
    pub fn request_start(&mut self, batch_id: &str) {
        if let Err(e) = ensure_recipes(&self.recipes) {
            self.error_message = Some(e.to_string());
            return;
        }
        self.recipe_pick = Some(RecipePick::Start(batch_id.to_string()));
    }

    /// Apply the recipe chosen in the picker.
    pub fn pick_recipe(&mut self, pick: RecipePick, recipe_id: &str) {
        self.recipe_pick = None;
        let Some(recipe) = self.recipes.iter().find(|r| r.id == recipe_id).cloned() else {
            self.error_message = Some("Recipe not found".to_string());
            return;
        };
        let Some(batch) = self.find_batch(pick.batch_id()).cloned() else {
            self.error_message = Some("Batch not found".to_string());
            return;
        };

        let settings = self.plan_settings();
        let update = match pick {
            RecipePick::Start(_) => {
                self.log_info(format!("Starting batch {} with {}", batch.id, recipe.name));
                plan_start(&batch, &recipe, &settings, Utc::now())
            }
            RecipePick::Switch(_) => match plan_switch(&batch, &recipe, &settings) {
                Ok(update) => {
                    self.log_info(format!("Batch {} switched to {}", batch.id, recipe.name));
                    update
                }
                Err(e) => {
                    self.error_message = Some(e.to_string());
                    return;
                }
            },
        };

        let service = Arc::clone(&self.service);
        self.spawn_call(
            async move {
                service
                    .update_batch_status(&batch.id, BatchStatus::Processing, update)
                    .await
            },
            UiMessage::BatchUpdated,
        );
    }

    /// Skip the remaining timer so the batch is ready for QC.
    pub fn speed_up(&mut self, batch_id: &str) {
        let Some(batch) = self.find_batch(batch_id).cloned() else {
            return;
        };
        let update = match plan_speed_up(&batch, Utc::now()) {
            Ok(update) => update,
            Err(e) => {
                self.error_message = Some(e.to_string());
                return;
            }
        };

        let service = Arc::clone(&self.service);
        self.spawn_call(
            async move {
                service
                    .update_batch_status(&batch.id, BatchStatus::Processing, update)
                    .await
            },
            UiMessage::BatchUpdated,
        );
    }

    /// Validate the QC weights and finish the batch.
    ///
    /// Validation failures stay inline on the card; nothing is sent.
    pub fn complete_batch(&mut self, batch_id: &str) -> std::result::Result<(), String> {
        let Some(batch) = self.find_batch(batch_id).cloned() else {
            return Err("Batch not found".to_string());
        };
        let tolerance = self.qc_tolerance();
        let outcome = self
            .qc_form(batch_id)
            .validate(batch.input_weight_kg(), tolerance)
            .map_err(|e| e.to_string())?;

        self.log_info(format!(
            "QC for batch {}: {:.2}kg good, {:.2}kg wastage",
            batch.id, outcome.good_kg, outcome.wastage_kg
        ));

        let update = outcome.into_update();
        let service = Arc::clone(&self.service);
        self.spawn_call(
            async move {
                service
                    .update_batch_status(&batch.id, BatchStatus::DryingComplete, update)
                    .await
            },
            UiMessage::BatchCompleted,
        );
        Ok(())
    }

    pub fn save_recipe(&mut self) {
        let recipe = match self.recipe_form.to_draft().build(&self.recipes, Utc::now()) {
            Ok(recipe) => recipe,
            Err(e) => {
                self.error_message = Some(e.to_string());
                return;
            }
        };
        self.recipe_form.reset();

        let service = Arc::clone(&self.service);
        self.spawn_call(async move { service.save_recipe(recipe).await }, UiMessage::RecipeSaved);
    }

    pub fn delete_recipe(&mut self, id: String) {
        let service = Arc::clone(&self.service);
        self.spawn_call(
            async move {
                service.delete_recipe(&id).await?;
                Ok::<_, AppError>(id)
            },
            UiMessage::RecipeDeleted,
        );
    }

    /// Delete every recipe whose name repeats an earlier one.
    pub fn remove_duplicate_recipes(&mut self) {
        let ids = find_duplicates(&self.recipes);
        if ids.is_empty() {
            self.success_message = Some("No duplicates found".to_string());
            return;
        }
        self.delete_recipes(ids);
    }

    fn delete_recipes(&mut self, ids: Vec<String>) {
        let service = Arc::clone(&self.service);
        self.spawn_call(
            async move {
                for id in &ids {
                    service.delete_recipe(id).await?;
                }
                Ok::<_, AppError>(ids.len())
            },
            UiMessage::RecipesRemoved,
        );
    }

    /// Poll async operation results.
    fn poll_async_results(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                UiMessage::FinanceLoaded(snapshot) => {
                    self.finance_loading = false;
                    let errors = self.finance.merge(*snapshot);
                    self.recompute_finance();
                    if errors.is_empty() {
                        tracing::debug!("Finance data refreshed");
                    } else {
                        let message = errors.join("\n");
                        self.error_message = Some(message);
                        for e in errors {
                            self.log_warning(e);
                        }
                    }
                    if self.finance_refresh_pending {
                        self.refresh_finance();
                    }
                }
                UiMessage::RatesLoaded(rates) => {
                    self.finance.rates = rates;
                }
                UiMessage::BatchesLoaded(batches) => {
                    self.batches = floor_batches(batches);
                    self.batches_loading = false;
                    let ids: Vec<_> = self.batches.iter().map(|b| b.id.clone()).collect();
                    self.qc_forms.retain(|id, _| ids.contains(id));
                }
                UiMessage::RecipesLoaded(recipes) => {
                    self.recipes = recipes;
                }
                UiMessage::LoadError(e) => {
                    self.batches_loading = false;
                    self.error_message = Some(e.clone());
                    self.log_error(e);
                }
                UiMessage::OrderSaved(order) => {
                    self.log_success(format!("Order {} is {:?}", order.id, order.status));
                    self.order_form = OrderDraft::default();
                    self.finance.upsert_order(order);
                    self.recompute_finance();
                    // Receiving changes stock levels.
                    self.refresh_finance();
                }
                UiMessage::SupplierSaved(supplier) => {
                    self.success_message = Some(format!("Supplier '{}' added", supplier.name));
                    self.log_success(format!("Supplier added: {}", supplier.name));
                    self.supplier_form = SupplierDraft::default();
                    self.refresh_finance();
                }
                UiMessage::SupplierDeleted(id) => {
                    self.finance.suppliers.retain(|s| s.id != id);
                    self.log_success("Supplier deleted");
                }
                UiMessage::CustomerSaved(customer) => {
                    self.log_success(format!("Customer added: {}", customer.name));
                    self.sale_form.customer_id = Some(customer.id.clone());
                    self.customer_form = CustomerDraft::default();
                    self.finance.customers.push(customer);
                }
                UiMessage::SaleCreated(sale) => {
                    self.log_success(format!("Invoice {} created", sale.invoice_id));
                    self.sale_form.after_sale();
                    self.finance.upsert_sale(sale.clone());
                    self.finance_dialog = Some(FinanceDialog::Invoice(sale));
                    self.refresh_finance();
                }
                UiMessage::SaleUpdated(sale) => {
                    self.log_success(format!("Invoice {} delivered", sale.invoice_id));
                    if let Some(FinanceDialog::Invoice(shown)) = &mut self.finance_dialog
                        && shown.id == sale.id
                    {
                        *shown = sale.clone();
                    }
                    self.finance.upsert_sale(sale);
                    self.recompute_finance();
                    self.refresh_finance();
                }
                UiMessage::CostSaved(row) => {
                    self.log_success(format!("Cost log {} updated", row.reference_id));
                    if let Some(slot) = self.finance.daily_costs.iter_mut().find(|c| c.id == row.id) {
                        *slot = row;
                    }
                    self.cost_form = CostDraft::default();
                    self.recompute_finance();
                }
                UiMessage::RatesSaved(rates) => {
                    self.finance.rates = rates;
                    self.log_success(format!(
                        "Rates updated: labor {:.2}/hr, raw {:.2}/kg",
                        rates.labor_rate, rates.raw_material_rate
                    ));
                }
                UiMessage::BatchUpdated(batch) => {
                    match self.batches.iter_mut().find(|b| b.id == batch.id) {
                        Some(slot) => *slot = batch,
                        None => self.batches.push(batch),
                    }
                }
                UiMessage::BatchCompleted(batch) => {
                    self.batches.retain(|b| b.id != batch.id);
                    self.qc_forms.remove(&batch.id);
                    self.success_message = Some(format!("Batch {} completed", batch.id));
                    self.log_success(format!("Batch {} passed QC", batch.id));
                    // Wastage lands in the cost log.
                    self.refresh_finance();
                }
                UiMessage::RecipeSaved(recipe) => {
                    self.log_success(format!("Recipe saved: {}", recipe.name));
                    match self.recipes.iter_mut().find(|r| r.id == recipe.id) {
                        Some(slot) => *slot = recipe,
                        None => self.recipes.push(recipe),
                    }
                }
                UiMessage::RecipeDeleted(id) => {
                    self.recipes.retain(|r| r.id != id);
                    self.log_success("Recipe deleted");
                }
                UiMessage::RecipesRemoved(count) => {
                    self.success_message = Some(format!("Removed {count} recipe(s)"));
                    self.log_success(format!("Removed {count} recipe(s)"));
                    self.load_recipes();
                }
                UiMessage::OperationFailed(e) => {
                    self.error_message = Some(e.clone());
                    self.log_error(e);
                }
            }
        }
    }

    /// The floor timer only ticks while someone can see it.
    fn timer_visible(&self) -> bool {
        self.current_panel == Panel::Processing
            && self.processing_tab == ProcessingTab::Floor
            && self.batches.iter().any(|b| b.status == BatchStatus::Processing)
    }

    /// Render menu bar.
    fn show_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("View", |ui| {
                    for panel in [Panel::Dashboard, Panel::Finance, Panel::Processing] {
                        if ui.button(panel.name()).clicked() {
                            self.current_panel = panel;
                            ui.close();
                        }
                    }
                });
                ui.menu_button("Data", |ui| {
                    if ui.button("Refresh All").clicked() {
                        self.refresh_all();
                        ui.close();
                    }
                    if ui.button("Export Cost Log").clicked() {
                        self.export_cost_log();
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Clear Activity Log").clicked() {
                        self.clear_log();
                        ui.close();
                    }
                });
            });
        });
    }

    /// Render status bar (display only, no interaction).
    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .min_height(28.0)
            .show(ctx, |ui| {
                ui.disable();
                ui.horizontal(|ui| {
                    let (color, text) = if self.service.is_remote() {
                        (colors::SUCCESS, format!("Cloud: {}", self.config.service.base_url))
                    } else {
                        (colors::WARNING, "Local Mode".to_string())
                    };
                    ui.colored_label(color, text);

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if self.finance_loading || self.batches_loading {
                            ui.spinner();
                            ui.label("Loading...");
                        }
                    });
                });
            });
    }

    /// Render modal dialogs (error, success, delete confirmation).
    fn show_dialogs(&mut self, ctx: &egui::Context) {
        // Error dialog
        if let Some(ref error) = self.error_message.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::ERROR, error);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.error_message = None;
                    }
                });
        }

        // Success dialog
        if let Some(ref msg) = self.success_message.clone() {
            egui::Window::new("Success")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::SUCCESS, msg);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.success_message = None;
                    }
                });
        }

        // Delete confirmation dialog
        if self.show_delete_confirm
            && let Some(ref target) = self.delete_target.clone()
        {
            let (title, message) = match target {
                DeleteTarget::Supplier(_, name) => ("Delete Supplier", format!("Delete supplier '{name}'?")),
                DeleteTarget::Recipe(_, name) => ("Delete Recipe", format!("Delete recipe '{name}'?")),
                DeleteTarget::AllRecipes => (
                    "Clear Recipes",
                    format!("Delete all {} recipes? This cannot be undone.", self.recipes.len()),
                ),
            };

            egui::Window::new(title)
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(10.0);
                    ui.horizontal(|ui| {
                        if ui.button("Cancel").clicked() {
                            self.show_delete_confirm = false;
                            self.delete_target = None;
                        }
                        if ui.button("Delete").clicked() {
                            self.confirm_delete();
                            self.show_delete_confirm = false;
                            self.delete_target = None;
                        }
                    });
                });
        }
    }

    /// Execute the confirmed delete operation.
    fn confirm_delete(&mut self) {
        if let Some(target) = self.delete_target.take() {
            match target {
                DeleteTarget::Supplier(id, name) => {
                    self.log_info(format!("Deleting supplier: {name}"));
                    self.delete_supplier(id);
                }
                DeleteTarget::Recipe(id, name) => {
                    self.log_info(format!("Deleting recipe: {name}"));
                    self.delete_recipe(id);
                }
                DeleteTarget::AllRecipes => {
                    self.log_warning("Clearing the recipe library");
                    let ids = self.recipes.iter().map(|r| r.id.clone()).collect();
                    self.delete_recipes(ids);
                }
            }
        }
    }
}

/// Keep a fetched dataset, or record why it is missing.
fn keep<T>(result: Result<T>, what: &str, errors: &mut Vec<String>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Failed to load {what}: {e}");
            errors.push(format!("Failed to load {what}: {e}"));
            None
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_async_results();

        if self.timer_visible() {
            ctx.request_repaint_after(Duration::from_secs(1));
        } else if self.finance_loading || self.batches_loading {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        self.show_menu_bar(ctx);
        self.show_status_bar(ctx);

        // Finance and processing modals
        finance_dialogs::show(self, ctx);
        processing_panel::show_modals(self, ctx);

        // Modal dialogs (error, success, delete confirmation)
        self.show_dialogs(ctx);

        egui::CentralPanel::default().show(ctx, |ui| match self.current_panel {
            Panel::Dashboard => {
                if let Some(next) = dashboard::show(self, ui) {
                    self.current_panel = next;
                }
            }
            Panel::Finance => {
                if finance_panel::show(self, ui) {
                    self.current_panel = Panel::Dashboard;
                }
            }
            Panel::Processing => {
                if processing_panel::show(self, ui) {
                    self.current_panel = Panel::Dashboard;
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BatchUpdate, CostUpdate, NewPurchaseOrder, NewSale, PurchaseOrderStatus};
    use crate::service::LocalService;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::time::Instant;

    /// Local store whose supplier list arrives late, after the read was taken.
    struct LateSuppliers {
        inner: LocalService,
    }

    #[async_trait]
    impl DataService for LateSuppliers {
        fn is_remote(&self) -> bool {
            false
        }
        async fn inventory(&self) -> Result<Vec<InventoryItem>> {
            self.inner.inventory().await
        }
        async fn add_inventory_item(&self, item: InventoryItem) -> Result<InventoryItem> {
            self.inner.add_inventory_item(item).await
        }
        async fn purchase_orders(&self) -> Result<Vec<PurchaseOrder>> {
            self.inner.purchase_orders().await
        }
        async fn create_purchase_order(&self, order: NewPurchaseOrder) -> Result<PurchaseOrder> {
            self.inner.create_purchase_order(order).await
        }
        async fn receive_purchase_order(&self, id: &str) -> Result<PurchaseOrder> {
            self.inner.receive_purchase_order(id).await
        }
        async fn complain_purchase_order(&self, id: &str, reason: &str) -> Result<PurchaseOrder> {
            self.inner.complain_purchase_order(id, reason).await
        }
        async fn resolve_complaint(&self, id: &str, resolution: &str) -> Result<PurchaseOrder> {
            self.inner.resolve_complaint(id, resolution).await
        }
        async fn suppliers(&self) -> Result<Vec<Supplier>> {
            let suppliers = self.inner.suppliers().await;
            tokio::time::sleep(Duration::from_millis(300)).await;
            suppliers
        }
        async fn add_supplier(&self, supplier: Supplier) -> Result<Supplier> {
            self.inner.add_supplier(supplier).await
        }
        async fn delete_supplier(&self, id: &str) -> Result<()> {
            self.inner.delete_supplier(id).await
        }
        async fn customers(&self) -> Result<Vec<Customer>> {
            self.inner.customers().await
        }
        async fn add_customer(&self, customer: Customer) -> Result<Customer> {
            self.inner.add_customer(customer).await
        }
        async fn finished_goods(&self) -> Result<Vec<FinishedGood>> {
            self.inner.finished_goods().await
        }
        async fn sales(&self) -> Result<Vec<SalesRecord>> {
            self.inner.sales().await
        }
        async fn create_sale(&self, sale: NewSale) -> Result<SalesRecord> {
            self.inner.create_sale(sale).await
        }
        async fn update_sale_status(&self, id: &str, status: SaleStatus) -> Result<SalesRecord> {
            self.inner.update_sale_status(id, status).await
        }
        async fn daily_costs(&self) -> Result<Vec<DailyCostMetrics>> {
            self.inner.daily_costs().await
        }
        async fn update_daily_cost(&self, id: &str, update: CostUpdate) -> Result<DailyCostMetrics> {
            self.inner.update_daily_cost(id, update).await
        }
        async fn weekly_revenue(&self) -> Result<Vec<RevenuePoint>> {
            self.inner.weekly_revenue().await
        }
        async fn rates(&self) -> Result<Rates> {
            self.inner.rates().await
        }
        async fn set_rates(&self, rates: Rates) -> Result<Rates> {
            self.inner.set_rates(rates).await
        }
        async fn batches(&self) -> Result<Vec<MushroomBatch>> {
            self.inner.batches().await
        }
        async fn update_batch_status(&self, id: &str, status: BatchStatus, update: BatchUpdate) -> Result<MushroomBatch> {
            self.inner.update_batch_status(id, status, update).await
        }
        async fn recipes(&self) -> Result<Vec<Recipe>> {
            self.inner.recipes().await
        }
        async fn save_recipe(&self, recipe: Recipe) -> Result<Recipe> {
            self.inner.save_recipe(recipe).await
        }
        async fn delete_recipe(&self, id: &str) -> Result<()> {
            self.inner.delete_recipe(id).await
        }
    }

    fn supplier(id: &str) -> Supplier {
        Supplier {
            id: id.to_string(),
            name: format!("Supplier {id}"),
            address: String::new(),
            contact: String::new(),
        }
    }

    fn order(id: &str, status: PurchaseOrderStatus, cost: f64) -> PurchaseOrder {
        PurchaseOrder {
            id: id.to_string(),
            item_id: "inv-1".to_string(),
            item_name: "Pouch".to_string(),
            supplier: "PackCo".to_string(),
            quantity: 1,
            total_units: 100,
            total_cost: cost,
            status,
            date_ordered: Utc::now(),
            complaint_reason: None,
            resolution: None,
        }
    }

    #[test]
    fn test_merge_keeps_failed_datasets() {
        let mut data = FinanceData {
            suppliers: vec![supplier("sup-1")],
            orders: vec![order("po-1", PurchaseOrderStatus::Ordered, 45.0)],
            ..Default::default()
        };

        let snapshot = FinanceSnapshot {
            orders: Some(vec![]),
            suppliers: None,
            errors: vec!["Failed to load suppliers: timeout".to_string()],
            ..Default::default()
        };
        let errors = data.merge(snapshot);

        assert_eq!(errors.len(), 1);
        assert_eq!(data.suppliers.len(), 1);
        assert!(data.orders.is_empty());
    }

    #[test]
    fn test_merge_replaces_loaded_datasets() {
        let mut data = FinanceData::default();
        let snapshot = FinanceSnapshot {
            weekly_revenue: Some(vec![RevenuePoint {
                date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
                amount: 90.0,
            }]),
            ..Default::default()
        };

        assert!(data.merge(snapshot).is_empty());
        assert_eq!(data.weekly_revenue.len(), 1);
    }

    #[test]
    fn test_upsert_order_replaces_in_place() {
        let mut data = FinanceData {
            orders: vec![
                order("po-1", PurchaseOrderStatus::Ordered, 45.0),
                order("po-2", PurchaseOrderStatus::Ordered, 20.0),
            ],
            ..Default::default()
        };

        data.upsert_order(order("po-2", PurchaseOrderStatus::Received, 20.0));
        data.upsert_order(order("po-3", PurchaseOrderStatus::Ordered, 10.0));

        assert_eq!(data.orders.len(), 3);
        assert_eq!(data.orders[0].id, "po-3");
        assert_eq!(data.orders[2].status, PurchaseOrderStatus::Received);
    }

    #[test]
    fn test_summary_uses_current_records() {
        let data = FinanceData {
            orders: vec![
                order("po-1", PurchaseOrderStatus::Received, 45.0),
                order("po-2", PurchaseOrderStatus::Complaint, 99.0),
            ],
            ..Default::default()
        };
        assert_eq!(data.summary().procurement, 45.0);
    }

    #[test]
    fn test_recipe_form_round_trip_to_draft() {
        let recipe = Recipe {
            id: "r-1".to_string(),
            name: "Garlic".to_string(),
            recipe_type: RecipeType::Dried,
            base_weight_kg: 1.0,
            cook_time_minutes: 45.0,
            temperature: 70.0,
            notes: String::new(),
            image_url: String::new(),
        };
        let form = RecipeForm::edit(&recipe);
        assert!(form.is_editing);

        let draft = form.to_draft();
        assert_eq!(draft.id.as_deref(), Some("r-1"));
        assert_eq!(draft.cook_time_minutes, Some(45.0));
    }

    #[test]
    fn test_recipe_form_blank_numbers_become_none() {
        let form = RecipeForm {
            name: "Plain".to_string(),
            base_weight: String::new(),
            cook_time: "abc".to_string(),
            ..Default::default()
        };
        let draft = form.to_draft();
        assert_eq!(draft.base_weight_kg, None);
        assert_eq!(draft.cook_time_minutes, None);
    }

    #[test]
    fn test_refresh_during_fetch_runs_after_it_lands() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalService::open(dir.path().join("store.json")).unwrap();
        let service: Arc<dyn DataService> = Arc::new(LateSuppliers { inner: store });
        let rt = tokio::runtime::Runtime::new().unwrap();

        let mut app = App::new(AppConfig::default(), Arc::clone(&service), rt);
        assert!(app.finance_loading);

        // the startup fetch has read the empty supplier list by now
        std::thread::sleep(Duration::from_millis(50));
        app.rt.block_on(service.add_supplier(supplier("sup-1"))).unwrap();
        app.refresh_finance();
        assert!(app.finance_refresh_pending);

        let deadline = Instant::now() + Duration::from_secs(5);
        while (app.finance_loading || app.finance_refresh_pending) && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(20));
            app.poll_async_results();
        }

        assert!(!app.finance_loading);
        assert!(!app.finance_refresh_pending);
        assert_eq!(app.finance.suppliers.len(), 1);
    }

    #[test]
    fn test_recipe_pick_batch_id() {
        assert_eq!(RecipePick::Start("b-1".to_string()).batch_id(), "b-1");
        assert_eq!(RecipePick::Switch("b-2".to_string()).batch_id(), "b-2");
    }
}
