//! Remote data service over HTTP/JSON.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use super::{DataService, ServiceResponse};
use crate::config::ServiceConfig;
use crate::error::{AppError, Result};
use crate::models::{
    BatchStatus, BatchUpdate, CostUpdate, Customer, DailyCostMetrics, FinishedGood, InventoryItem, MushroomBatch,
    NewPurchaseOrder, NewSale, PurchaseOrder, Rates, Recipe, RevenuePoint, SaleStatus, SalesRecord, Supplier,
};

/// Client for the shared ShroomTrack service.
pub struct HttpService {
    client: Client,
    base_url: String,
}

impl HttpService {
    /// Build a client from the `[service]` config section.
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let token = config.api_token.trim();
        if !token.is_empty() {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| AppError::config(format!("Invalid API token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{base}{path}", base = self.base_url)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        debug!("GET {path}");
        let response = self.client.get(self.url(path)).send().await?;
        decode(response).await
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        debug!("POST {path}");
        let response = self.client.post(self.url(path)).json(body).send().await?;
        decode(response).await
    }

    async fn put<B: Serialize + Sync, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        debug!("PUT {path}");
        let response = self.client.put(self.url(path)).json(body).send().await?;
        decode(response).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        debug!("DELETE {path}");
        let response = self.client.delete(self.url(path)).send().await?;
        let status = response.status();
        let body = response.text().await?;
        parse_envelope::<serde_json::Value>(status, &body)?.into_unit()
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;
    parse_envelope::<T>(status, &body)?.into_result()
}

/// Parse the response envelope, falling back to the HTTP status when the body is not one.
fn parse_envelope<T: DeserializeOwned>(status: reqwest::StatusCode, body: &str) -> Result<ServiceResponse<T>> {
    match serde_json::from_str::<ServiceResponse<T>>(body) {
        Ok(envelope) => Ok(envelope),
        Err(_) if !status.is_success() => Err(AppError::service(format!("Service returned {status}"))),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl DataService for HttpService {
    fn is_remote(&self) -> bool {
        true
    }

    async fn inventory(&self) -> Result<Vec<InventoryItem>> {
        self.get("/inventory").await
    }

    async fn add_inventory_item(&self, item: InventoryItem) -> Result<InventoryItem> {
        self.post("/inventory", &item).await
    }

    async fn purchase_orders(&self) -> Result<Vec<PurchaseOrder>> {
        self.get("/purchase-orders").await
    }

    async fn create_purchase_order(&self, order: NewPurchaseOrder) -> Result<PurchaseOrder> {
        self.post("/purchase-orders", &order).await
    }

    async fn receive_purchase_order(&self, id: &str) -> Result<PurchaseOrder> {
        self.post(&format!("/purchase-orders/{id}/receive"), &json!({ "qcPassed": true }))
            .await
    }

    async fn complain_purchase_order(&self, id: &str, reason: &str) -> Result<PurchaseOrder> {
        self.post(&format!("/purchase-orders/{id}/complaint"), &json!({ "reason": reason }))
            .await
    }

    async fn resolve_complaint(&self, id: &str, resolution: &str) -> Result<PurchaseOrder> {
        self.post(&format!("/purchase-orders/{id}/resolve"), &json!({ "resolution": resolution }))
            .await
    }

    async fn suppliers(&self) -> Result<Vec<Supplier>> {
        self.get("/suppliers").await
    }

    async fn add_supplier(&self, supplier: Supplier) -> Result<Supplier> {
        self.post("/suppliers", &supplier).await
    }

    async fn delete_supplier(&self, id: &str) -> Result<()> {
        self.delete(&format!("/suppliers/{id}")).await
    }

    async fn customers(&self) -> Result<Vec<Customer>> {
        self.get("/customers").await
    }

    async fn add_customer(&self, customer: Customer) -> Result<Customer> {
        self.post("/customers", &customer).await
    }

    async fn finished_goods(&self) -> Result<Vec<FinishedGood>> {
        self.get("/finished-goods").await
    }

    async fn sales(&self) -> Result<Vec<SalesRecord>> {
        self.get("/sales").await
    }

    async fn create_sale(&self, sale: NewSale) -> Result<SalesRecord> {
        self.post("/sales", &sale).await
    }

    async fn update_sale_status(&self, id: &str, status: SaleStatus) -> Result<SalesRecord> {
        self.put(&format!("/sales/{id}/status"), &json!({ "status": status }))
            .await
    }

    async fn daily_costs(&self) -> Result<Vec<DailyCostMetrics>> {
        self.get("/daily-costs").await
    }

    async fn update_daily_cost(&self, id: &str, update: CostUpdate) -> Result<DailyCostMetrics> {
        self.put(&format!("/daily-costs/{id}"), &update).await
    }

    async fn weekly_revenue(&self) -> Result<Vec<RevenuePoint>> {
        self.get("/revenue/weekly").await
    }

    async fn rates(&self) -> Result<Rates> {
        self.get("/rates").await
    }

    async fn set_rates(&self, rates: Rates) -> Result<Rates> {
        self.put("/rates", &rates).await
    }

    async fn batches(&self) -> Result<Vec<MushroomBatch>> {
        self.get("/batches").await
    }

    async fn update_batch_status(&self, id: &str, status: BatchStatus, update: BatchUpdate) -> Result<MushroomBatch> {
        self.put(&format!("/batches/{id}/status"), &StatusChange { status, update })
            .await
    }

    async fn recipes(&self) -> Result<Vec<Recipe>> {
        self.get("/recipes").await
    }

    async fn save_recipe(&self, recipe: Recipe) -> Result<Recipe> {
        self.post("/recipes", &recipe).await
    }

    async fn delete_recipe(&self, id: &str) -> Result<()> {
        self.delete(&format!("/recipes/{id}")).await
    }
}

/// Body of a batch status change: the status plus the partial update fields.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusChange {
    status: BatchStatus,
    #[serde(flatten)]
    update: BatchUpdate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn service(base_url: &str, token: &str) -> HttpService {
        HttpService::new(&ServiceConfig {
            base_url: base_url.to_string(),
            api_token: token.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        let svc = service("http://localhost:8080/api/", "");
        assert_eq!(svc.url("/recipes"), "http://localhost:8080/api/recipes");
    }

    #[test]
    fn test_token_with_newline_rejected() {
        let result = HttpService::new(&ServiceConfig {
            api_token: "abc\ndef".to_string(),
            ..Default::default()
        });
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_parse_envelope_success() {
        let body = serde_json::to_string(&ServiceResponse::ok(Rates::default())).unwrap();
        let rates = parse_envelope::<Rates>(StatusCode::OK, &body)
            .unwrap()
            .into_result()
            .unwrap();
        assert_eq!(rates.labor_rate, 12.5);
    }

    #[test]
    fn test_parse_envelope_failure_message() {
        let body = serde_json::to_string(&ServiceResponse::<Rates>::failure("Insufficient stock")).unwrap();
        let err = parse_envelope::<Rates>(StatusCode::BAD_REQUEST, &body)
            .unwrap()
            .into_result()
            .unwrap_err();
        assert_eq!(err.to_string(), "Insufficient stock");
    }

    #[test]
    fn test_parse_envelope_non_json_error() {
        let err = parse_envelope::<Rates>(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>").unwrap_err();
        assert_eq!(err.to_string(), "Service returned 502 Bad Gateway");
    }

    #[test]
    fn test_status_change_body_is_flat() {
        let body = StatusChange {
            status: BatchStatus::DryingComplete,
            update: BatchUpdate {
                quality_check_passed: Some(true),
                processing_wastage_kg: Some(0.4),
                ..Default::default()
            },
        };
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["status"], "DRYING_COMPLETE");
        assert_eq!(json["qualityCheckPassed"], true);
        assert_eq!(json["processingWastageKg"], 0.4);
        assert!(json.get("processConfig").is_none());
    }
}
