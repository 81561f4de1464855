//! Daily cost log, revenue trend and rate DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the daily production cost log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCostMetrics {
    pub id: String,
    pub date: NaiveDate,
    /// Batch or PO this row was logged against.
    #[serde(default)]
    pub reference_id: String,
    #[serde(default)]
    pub weight_processed: f64,
    #[serde(default)]
    pub processing_hours: f64,
    pub raw_material_cost: f64,
    pub packaging_cost: f64,
    pub labor_cost: f64,
    pub wastage_cost: f64,
    pub total_cost: f64,
}

impl DailyCostMetrics {
    /// Apply edited amounts and recompute the row total.
    pub fn apply(&mut self, update: &CostUpdate) {
        self.raw_material_cost = update.raw_material_cost;
        self.packaging_cost = update.packaging_cost;
        self.labor_cost = update.labor_cost;
        self.wastage_cost = update.wastage_cost;
        self.recompute_total();
    }

    pub fn recompute_total(&mut self) {
        self.total_cost = self.raw_material_cost + self.packaging_cost + self.labor_cost + self.wastage_cost;
    }
}

/// DTO for editing a cost row.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostUpdate {
    pub raw_material_cost: f64,
    pub packaging_cost: f64,
    pub labor_cost: f64,
    pub wastage_cost: f64,
}

impl From<&DailyCostMetrics> for CostUpdate {
    fn from(row: &DailyCostMetrics) -> Self {
        Self {
            raw_material_cost: row.raw_material_cost,
            packaging_cost: row.packaging_cost,
            labor_cost: row.labor_cost,
            wastage_cost: row.wastage_cost,
        }
    }
}

/// Revenue collected on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenuePoint {
    pub date: NaiveDate,
    pub amount: f64,
}

/// Rates used to cost labor hours and raw mushrooms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rates {
    /// Per hour.
    pub labor_rate: f64,
    /// Per kg.
    pub raw_material_rate: f64,
}

impl Default for Rates {
    fn default() -> Self {
        Self {
            labor_rate: 12.50,
            raw_material_rate: 8.00,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_recomputes_total() {
        let mut row = DailyCostMetrics {
            id: "c-1".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            reference_id: "B-7".to_string(),
            weight_processed: 12.0,
            processing_hours: 2.0,
            raw_material_cost: 96.0,
            packaging_cost: 0.0,
            labor_cost: 25.0,
            wastage_cost: 0.0,
            total_cost: 121.0,
        };
        row.apply(&CostUpdate {
            raw_material_cost: 90.0,
            packaging_cost: 5.0,
            labor_cost: 25.0,
            wastage_cost: 4.0,
        });

        assert_eq!(row.total_cost, 124.0);
    }

    #[test]
    fn test_date_wire_format() {
        let point: RevenuePoint = serde_json::from_str(r#"{"date":"2025-03-04","amount":120.5}"#).unwrap();
        assert_eq!(point.date, NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
    }
}
