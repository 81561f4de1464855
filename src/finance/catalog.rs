//! Derived lists shown on the finance tabs.

use crate::models::{FinishedGood, InventoryItem, PurchaseOrder, PurchaseOrderStatus, RevenuePoint};

/// A sellable product group: finished goods sharing recipe and packaging.
#[derive(Debug, Clone, PartialEq)]
pub struct AvailableGood {
    /// `recipe|packaging`
    pub key: String,
    /// Id of the first finished good seen in the group.
    pub id: String,
    pub label: String,
    pub total_qty: i64,
    pub price: f64,
}

impl AvailableGood {
    pub fn option_text(&self, currency: &str) -> String {
        format!(
            "{} (Stock: {}) - {currency} {:.2}",
            self.label, self.total_qty, self.price
        )
    }
}

/// Group in-stock finished goods, keeping first-seen order.
pub fn available_goods(goods: &[FinishedGood], default_price: f64) -> Vec<AvailableGood> {
    let mut groups: Vec<AvailableGood> = Vec::new();
    for good in goods.iter().filter(|g| g.quantity > 0) {
        let key = format!("{}|{}", good.recipe_name, good.packaging_type);
        match groups.iter_mut().find(|g| g.key == key) {
            Some(group) => group.total_qty += good.quantity,
            None => groups.push(AvailableGood {
                key,
                id: good.id.clone(),
                label: format!("{} ({})", good.recipe_name, good.packaging_type),
                total_qty: good.quantity,
                price: good
                    .selling_price
                    .filter(|p| *p > 0.0)
                    .unwrap_or(default_price),
            }),
        }
    }
    groups
}

pub fn low_stock(items: &[InventoryItem]) -> Vec<&InventoryItem> {
    items.iter().filter(|i| i.is_low_stock()).collect()
}

pub fn orders_with_status(orders: &[PurchaseOrder], status: PurchaseOrderStatus) -> Vec<&PurchaseOrder> {
    orders.iter().filter(|po| po.status == status).collect()
}

/// Orders awaiting delivery.
pub fn active_orders(orders: &[PurchaseOrder]) -> Vec<&PurchaseOrder> {
    orders_with_status(orders, PurchaseOrderStatus::Ordered)
}

pub fn complaints(orders: &[PurchaseOrder]) -> Vec<&PurchaseOrder> {
    orders_with_status(orders, PurchaseOrderStatus::Complaint)
}

/// Units a PO for `packs` of `item` will deliver.
pub fn po_units(item: &InventoryItem, packs: i64) -> i64 {
    packs.max(0) * item.units_per_pack()
}

/// Running total shown on the POS form.
pub fn sale_total(unit_price: f64, quantity: i64) -> f64 {
    if quantity <= 0 || !unit_price.is_finite() {
        0.0
    } else {
        unit_price * quantity as f64
    }
}

/// One bar of the weekly revenue chart.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendBar {
    /// `MM-DD`
    pub label: String,
    pub amount: f64,
    /// Bar height relative to the best day, 0..=100.
    pub height_pct: f64,
}

pub fn trend_bars(points: &[RevenuePoint]) -> Vec<TrendBar> {
    let max = points.iter().map(|p| p.amount).fold(1.0_f64, f64::max);
    points
        .iter()
        .map(|p| TrendBar {
            label: p.date.format("%m-%d").to_string(),
            amount: p.amount,
            height_pct: (p.amount / max * 100.0).clamp(0.0, 100.0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn good(id: &str, recipe: &str, pack: &str, qty: i64, price: Option<f64>) -> FinishedGood {
        FinishedGood {
            id: id.to_string(),
            recipe_name: recipe.to_string(),
            packaging_type: pack.to_string(),
            quantity: qty,
            selling_price: price,
        }
    }

    #[test]
    fn test_available_goods_grouping() {
        let goods = vec![
            good("fg-1", "Garlic", "POUCH", 0, Some(20.0)),
            good("fg-2", "Garlic", "POUCH", 10, None),
            good("fg-3", "Chili", "TIN", 5, Some(22.5)),
            good("fg-4", "Garlic", "POUCH", 4, Some(30.0)),
        ];
        let groups = available_goods(&goods, 15.0);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, "Garlic|POUCH");
        assert_eq!(groups[0].id, "fg-2");
        assert_eq!(groups[0].total_qty, 14);
        assert_eq!(groups[0].price, 15.0);
        assert_eq!(groups[0].label, "Garlic (POUCH)");
        assert_eq!(groups[1].price, 22.5);
        assert_eq!(groups[1].option_text("RM"), "Chili (TIN) (Stock: 5) - RM 22.50");
    }

    #[test]
    fn test_sale_total() {
        assert_eq!(sale_total(15.0, 3), 45.0);
        assert_eq!(sale_total(15.0, 0), 0.0);
        assert_eq!(sale_total(f64::NAN, 2), 0.0);
    }

    #[test]
    fn test_po_units() {
        let item: InventoryItem = serde_json::from_str(
            r#"{"id":"i","name":"Pouch","type":"PACKAGING","quantity":0,"threshold":50,"unit":"units","unitCost":45.0,"packSize":100}"#,
        )
        .unwrap();
        assert_eq!(po_units(&item, 3), 300);
        assert_eq!(po_units(&item, -1), 0);
    }

    #[test]
    fn test_trend_bars() {
        let points = vec![
            RevenuePoint {
                date: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
                amount: 50.0,
            },
            RevenuePoint {
                date: NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(),
                amount: 200.0,
            },
        ];
        let bars = trend_bars(&points);

        assert_eq!(bars[0].label, "03-04");
        assert_eq!(bars[0].height_pct, 25.0);
        assert_eq!(bars[1].height_pct, 100.0);
    }

    #[test]
    fn test_trend_bars_all_zero() {
        let points = vec![RevenuePoint {
            date: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
            amount: 0.0,
        }];
        assert_eq!(trend_bars(&points)[0].height_pct, 0.0);
    }
}
