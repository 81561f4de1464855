//! Headline finance numbers derived from the fetched records.

use crate::models::{DailyCostMetrics, FinishedGood, PurchaseOrder, SalesRecord};

/// Aggregated spend, revenue and unit cost.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FinancialSummary {
    /// Packaging purchases on orders still ORDERED or RECEIVED.
    pub procurement: f64,
    pub raw_material: f64,
    pub labor: f64,
    pub wastage: f64,
    /// Delivered sales only.
    pub revenue: f64,
    /// procurement + raw material + labor. Wastage is a loss, not cash out.
    pub cash_outflow: f64,
    pub net_profit: f64,
    pub units_produced: i64,
    pub avg_cost_per_unit: f64,
}

impl FinancialSummary {
    pub fn compute(
        orders: &[PurchaseOrder],
        costs: &[DailyCostMetrics],
        sales: &[SalesRecord],
        goods: &[FinishedGood],
    ) -> Self {
        let procurement = orders
            .iter()
            .filter(|po| po.status.is_spend())
            .map(|po| po.total_cost)
            .sum::<f64>();

        let raw_material = costs.iter().map(|c| c.raw_material_cost).sum::<f64>();
        let labor = costs.iter().map(|c| c.labor_cost).sum::<f64>();
        let wastage = costs.iter().map(|c| c.wastage_cost).sum::<f64>();

        let revenue = sales
            .iter()
            .filter(|s| s.is_delivered())
            .map(|s| s.total_amount)
            .sum::<f64>();

        let cash_outflow = procurement + raw_material + labor;
        let units_produced = goods.iter().map(|g| g.quantity).sum::<i64>();
        let avg_cost_per_unit = if units_produced > 0 {
            cash_outflow / units_produced as f64
        } else {
            0.0
        };

        Self {
            procurement,
            raw_material,
            labor,
            wastage,
            revenue,
            cash_outflow,
            net_profit: revenue - cash_outflow,
            units_produced,
            avg_cost_per_unit,
        }
    }

    /// Everything the pie chart divides up.
    pub fn total_expense(&self) -> f64 {
        self.procurement + self.raw_material + self.labor + self.wastage
    }

    pub fn is_profitable(&self) -> bool {
        self.net_profit >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PaymentMethod, PurchaseOrderStatus, SaleStatus};
    use chrono::{NaiveDate, Utc};

    fn order(status: PurchaseOrderStatus, cost: f64) -> PurchaseOrder {
        PurchaseOrder {
            id: format!("po-{cost}"),
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

    fn cost(raw: f64, labor: f64, wastage: f64) -> DailyCostMetrics {
        DailyCostMetrics {
            id: "c".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            reference_id: String::new(),
            weight_processed: 0.0,
            processing_hours: 0.0,
            raw_material_cost: raw,
            packaging_cost: 7.0,
            labor_cost: labor,
            wastage_cost: wastage,
            total_cost: raw + labor + wastage + 7.0,
        }
    }

    fn sale(status: SaleStatus, amount: f64) -> SalesRecord {
        SalesRecord {
            id: "s".to_string(),
            invoice_id: "INV-1".to_string(),
            customer_id: "cust-1".to_string(),
            customer_name: "Cafe".to_string(),
            customer_email: String::new(),
            customer_phone: String::new(),
            items: Vec::new(),
            total_amount: amount,
            payment_method: PaymentMethod::Cash,
            status,
            date_created: Utc::now(),
        }
    }

    fn good(quantity: i64) -> FinishedGood {
        FinishedGood {
            id: "fg".to_string(),
            recipe_name: "Garlic".to_string(),
            packaging_type: "POUCH".to_string(),
            quantity,
            selling_price: None,
        }
    }

    #[test]
    fn test_compute_aggregates() {
        let orders = vec![
            order(PurchaseOrderStatus::Ordered, 100.0),
            order(PurchaseOrderStatus::Received, 50.0),
            order(PurchaseOrderStatus::Complaint, 999.0),
            order(PurchaseOrderStatus::Resolved, 999.0),
        ];
        let costs = vec![cost(80.0, 25.0, 4.0), cost(20.0, 25.0, 6.0)];
        let sales = vec![sale(SaleStatus::Delivered, 300.0), sale(SaleStatus::Invoiced, 500.0)];
        let goods = vec![good(30), good(20)];

        let s = FinancialSummary::compute(&orders, &costs, &sales, &goods);

        assert_eq!(s.procurement, 150.0);
        assert_eq!(s.raw_material, 100.0);
        assert_eq!(s.labor, 50.0);
        assert_eq!(s.wastage, 10.0);
        assert_eq!(s.revenue, 300.0);
        assert_eq!(s.cash_outflow, 300.0);
        assert_eq!(s.net_profit, 0.0);
        assert!(s.is_profitable());
        assert_eq!(s.units_produced, 50);
        assert_eq!(s.avg_cost_per_unit, 6.0);
        assert_eq!(s.total_expense(), 310.0);
    }

    #[test]
    fn test_empty_inputs() {
        let s = FinancialSummary::compute(&[], &[], &[], &[]);
        assert_eq!(s, FinancialSummary::default());
        assert_eq!(s.avg_cost_per_unit, 0.0);
    }

    #[test]
    fn test_loss_when_nothing_delivered() {
        let s = FinancialSummary::compute(
            &[order(PurchaseOrderStatus::Ordered, 40.0)],
            &[],
            &[sale(SaleStatus::Invoiced, 100.0)],
            &[],
        );
        assert_eq!(s.net_profit, -40.0);
        assert!(!s.is_profitable());
    }
}
