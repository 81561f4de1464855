//! Validation of finance form input before it reaches the data service.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::catalog::AvailableGood;
use crate::models::{
    CostUpdate, Customer, InventoryItem, ItemSubtype, ItemType, NewPurchaseOrder, NewSale, PaymentMethod, Rates,
    Supplier,
};

pub const GENERIC_SUPPLIER: &str = "Generic Supplier";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("{0} must be a number")]
    NotANumber(&'static str),

    #[error("{0} must be at least {1}")]
    TooSmall(&'static str, i64),

    #[error("{0} cannot be negative")]
    Negative(&'static str),

    #[error("Please select customer and product.")]
    MissingSaleParty,
}

fn required(value: &str, field: &'static str) -> Result<String, DraftError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(DraftError::Required(field))
    } else {
        Ok(trimmed.to_string())
    }
}

fn parse_count(text: &str, field: &'static str, min: i64) -> Result<i64, DraftError> {
    let value = text
        .trim()
        .parse::<i64>()
        .map_err(|_| DraftError::NotANumber(field))?;
    if value < min {
        return Err(DraftError::TooSmall(field, min));
    }
    Ok(value)
}

pub(crate) fn parse_money(text: &str, field: &'static str) -> Result<f64, DraftError> {
    let value = text
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(DraftError::NotANumber(field))?;
    if value < 0.0 {
        return Err(DraftError::Negative(field));
    }
    Ok(value)
}

/// New purchase order input.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub item_id: Option<String>,
    pub packs: String,
}

impl Default for OrderDraft {
    fn default() -> Self {
        Self {
            item_id: None,
            packs: "1".to_string(),
        }
    }
}

impl OrderDraft {
    pub fn build(&self, inventory: &[InventoryItem]) -> Result<NewPurchaseOrder, DraftError> {
        let item = self
            .item_id
            .as_deref()
            .and_then(|id| inventory.iter().find(|i| i.id == id))
            .ok_or(DraftError::Required("Item"))?;
        let packs = parse_count(&self.packs, "Quantity", 1)?;

        Ok(NewPurchaseOrder {
            item_id: item.id.clone(),
            packs,
            supplier: item
                .supplier
                .clone()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| GENERIC_SUPPLIER.to_string()),
        })
    }
}

/// A supplier registered together with the first item it supplies.
#[derive(Debug, Clone, PartialEq)]
pub struct SupplierDraft {
    pub name: String,
    pub contact: String,
    pub address: String,
    pub item_name: String,
    pub item_type: ItemType,
    pub item_subtype: ItemSubtype,
    pub pack_size: String,
    pub unit_cost: String,
}

impl Default for SupplierDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            contact: String::new(),
            address: String::new(),
            item_name: String::new(),
            item_type: ItemType::Packaging,
            item_subtype: ItemSubtype::Pouch,
            pack_size: "100".to_string(),
            unit_cost: "45".to_string(),
        }
    }
}

impl SupplierDraft {
    pub fn build(&self, threshold: i64, now: DateTime<Utc>) -> Result<(Supplier, InventoryItem), DraftError> {
        let name = required(&self.name, "Supplier name")?;
        let item_name = required(&self.item_name, "Item name")?;
        let pack_size = parse_count(&self.pack_size, "Pack size", 1)?;
        let unit_cost = parse_money(&self.unit_cost, "Cost")?;
        let stamp = now.timestamp_millis();

        let supplier = Supplier {
            id: format!("sup-{stamp}"),
            name: name.clone(),
            address: self.address.trim().to_string(),
            contact: self.contact.trim().to_string(),
        };
        let item = InventoryItem {
            id: format!("inv-{stamp}"),
            name: item_name,
            item_type: self.item_type,
            subtype: Some(self.item_subtype),
            quantity: 0,
            threshold,
            unit: "units".to_string(),
            unit_cost,
            supplier: Some(name),
            pack_size: Some(pack_size),
        };
        Ok((supplier, item))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerDraft {
    pub name: String,
    pub email: String,
    pub contact: String,
    pub address: String,
}

impl CustomerDraft {
    pub fn build(&self, now: DateTime<Utc>) -> Result<Customer, DraftError> {
        Ok(Customer {
            id: format!("cust-{}", now.timestamp_millis()),
            name: required(&self.name, "Customer name")?,
            email: required(&self.email, "Email")?,
            contact: self.contact.trim().to_string(),
            address: self.address.trim().to_string(),
        })
    }
}

/// POS terminal input.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleDraft {
    pub customer_id: Option<String>,
    /// Key of the selected product group.
    pub good_key: Option<String>,
    pub quantity: String,
    pub unit_price: String,
    pub payment_method: PaymentMethod,
}

impl Default for SaleDraft {
    fn default() -> Self {
        Self {
            customer_id: None,
            good_key: None,
            quantity: "1".to_string(),
            unit_price: "15.00".to_string(),
            payment_method: PaymentMethod::Cash,
        }
    }
}

impl SaleDraft {
    /// Select a product group and take over its list price.
    pub fn select_good(&mut self, good: &AvailableGood) {
        self.good_key = Some(good.key.clone());
        self.unit_price = format!("{:.2}", good.price);
    }

    pub fn selected<'a>(&self, goods: &'a [AvailableGood]) -> Option<&'a AvailableGood> {
        let key = self.good_key.as_deref()?;
        goods.iter().find(|g| g.key == key)
    }

    pub fn build(&self, goods: &[AvailableGood]) -> Result<NewSale, DraftError> {
        let customer_id = self
            .customer_id
            .clone()
            .filter(|c| !c.is_empty())
            .ok_or(DraftError::MissingSaleParty)?;
        let good = self.selected(goods).ok_or(DraftError::MissingSaleParty)?;
        let quantity = parse_count(&self.quantity, "Quantity", 1)?;
        let unit_price = parse_money(&self.unit_price, "Price")?;

        Ok(NewSale {
            customer_id,
            good_id: good.id.clone(),
            quantity,
            unit_price,
            payment_method: self.payment_method,
        })
    }

    /// Clear product and quantity after a sale, keeping the customer.
    pub fn after_sale(&mut self) {
        self.good_key = None;
        self.quantity = "1".to_string();
    }
}

/// Edit of one daily cost row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CostDraft {
    pub id: String,
    pub reference_id: String,
    pub raw_material_cost: String,
    pub packaging_cost: String,
    pub labor_cost: String,
    pub wastage_cost: String,
}

impl CostDraft {
    pub fn edit(row: &crate::models::DailyCostMetrics) -> Self {
        Self {
            id: row.id.clone(),
            reference_id: row.reference_id.clone(),
            raw_material_cost: format!("{:.2}", row.raw_material_cost),
            packaging_cost: format!("{:.2}", row.packaging_cost),
            labor_cost: format!("{:.2}", row.labor_cost),
            wastage_cost: format!("{:.2}", row.wastage_cost),
        }
    }

    pub fn build(&self) -> Result<CostUpdate, DraftError> {
        Ok(CostUpdate {
            raw_material_cost: parse_money(&self.raw_material_cost, "Raw material")?,
            packaging_cost: parse_money(&self.packaging_cost, "Packaging")?,
            labor_cost: parse_money(&self.labor_cost, "Labor")?,
            wastage_cost: parse_money(&self.wastage_cost, "Wastage")?,
        })
    }

    /// Total the row will show after saving, if the input parses.
    pub fn preview_total(&self) -> Option<f64> {
        self.build()
            .ok()
            .map(|u| u.raw_material_cost + u.packaging_cost + u.labor_cost + u.wastage_cost)
    }
}

/// Apply an edited rate text to the current rates.
pub fn update_rates(current: Rates, labor: Option<&str>, raw: Option<&str>) -> Result<Rates, DraftError> {
    let mut rates = current;
    if let Some(text) = labor {
        rates.labor_rate = parse_money(text, "Labor rate")?;
    }
    if let Some(text) = raw {
        rates.raw_material_rate = parse_money(text, "Raw material rate")?;
    }
    Ok(rates)
}

/// Complaint text is mandatory.
pub fn complaint_reason(text: &str) -> Result<String, DraftError> {
    required(text, "Complaint reason")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::catalog::available_goods;
    use crate::models::{DailyCostMetrics, FinishedGood};
    use chrono::NaiveDate;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_700_000_000_000).unwrap()
    }

    fn item(id: &str, supplier: Option<&str>) -> InventoryItem {
        InventoryItem {
            id: id.to_string(),
            name: "Red Pouch".to_string(),
            item_type: ItemType::Packaging,
            subtype: Some(ItemSubtype::Pouch),
            quantity: 0,
            threshold: 50,
            unit: "units".to_string(),
            unit_cost: 45.0,
            supplier: supplier.map(str::to_string),
            pack_size: Some(100),
        }
    }

    #[test]
    fn test_order_uses_item_supplier() {
        let inventory = vec![item("inv-1", Some("PackCo")), item("inv-2", None)];
        let mut draft = OrderDraft {
            item_id: Some("inv-1".to_string()),
            packs: "3".to_string(),
        };
        let po = draft.build(&inventory).unwrap();
        assert_eq!(po.supplier, "PackCo");
        assert_eq!(po.packs, 3);

        draft.item_id = Some("inv-2".to_string());
        assert_eq!(draft.build(&inventory).unwrap().supplier, GENERIC_SUPPLIER);
    }

    #[test]
    fn test_order_rejects_bad_input() {
        let inventory = vec![item("inv-1", None)];
        assert_eq!(OrderDraft::default().build(&inventory), Err(DraftError::Required("Item")));

        let draft = OrderDraft {
            item_id: Some("inv-1".to_string()),
            packs: "0".to_string(),
        };
        assert_eq!(draft.build(&inventory), Err(DraftError::TooSmall("Quantity", 1)));
    }

    #[test]
    fn test_supplier_creates_item() {
        let draft = SupplierDraft {
            name: " PackCo ".to_string(),
            item_name: "Red Pouch".to_string(),
            ..Default::default()
        };
        let (supplier, item) = draft.build(50, now()).unwrap();

        assert_eq!(supplier.id, "sup-1700000000000");
        assert_eq!(supplier.name, "PackCo");
        assert_eq!(item.id, "inv-1700000000000");
        assert_eq!(item.quantity, 0);
        assert_eq!(item.threshold, 50);
        assert_eq!(item.unit, "units");
        assert_eq!(item.unit_cost, 45.0);
        assert_eq!(item.pack_size, Some(100));
        assert_eq!(item.supplier.as_deref(), Some("PackCo"));
    }

    #[test]
    fn test_supplier_requires_item_name() {
        let draft = SupplierDraft {
            name: "PackCo".to_string(),
            ..Default::default()
        };
        assert_eq!(draft.build(50, now()), Err(DraftError::Required("Item name")));
    }

    #[test]
    fn test_customer_requires_name_and_email() {
        let mut draft = CustomerDraft {
            name: "Cafe".to_string(),
            ..Default::default()
        };
        assert_eq!(draft.build(now()), Err(DraftError::Required("Email")));

        draft.email = "cafe@example.com".to_string();
        let customer = draft.build(now()).unwrap();
        assert_eq!(customer.id, "cust-1700000000000");
    }

    #[test]
    fn test_sale_draft() {
        let goods = available_goods(
            &[FinishedGood {
                id: "fg-1".to_string(),
                recipe_name: "Garlic".to_string(),
                packaging_type: "POUCH".to_string(),
                quantity: 8,
                selling_price: Some(18.0),
            }],
            15.0,
        );
        let mut draft = SaleDraft::default();
        assert_eq!(draft.build(&goods), Err(DraftError::MissingSaleParty));

        draft.customer_id = Some("cust-1".to_string());
        draft.select_good(&goods[0]);
        assert_eq!(draft.unit_price, "18.00");

        draft.quantity = "2".to_string();
        let sale = draft.build(&goods).unwrap();
        assert_eq!(sale.good_id, "fg-1");
        assert_eq!(sale.quantity, 2);
        assert_eq!(sale.unit_price, 18.0);

        draft.after_sale();
        assert_eq!(draft.good_key, None);
        assert_eq!(draft.customer_id.as_deref(), Some("cust-1"));
    }

    #[test]
    fn test_sale_rejects_negative_price() {
        let goods = available_goods(
            &[FinishedGood {
                id: "fg-1".to_string(),
                recipe_name: "Garlic".to_string(),
                packaging_type: "POUCH".to_string(),
                quantity: 8,
                selling_price: None,
            }],
            15.0,
        );
        let mut draft = SaleDraft {
            customer_id: Some("cust-1".to_string()),
            ..Default::default()
        };
        draft.select_good(&goods[0]);
        draft.unit_price = "-2".to_string();
        assert_eq!(draft.build(&goods), Err(DraftError::Negative("Price")));
    }

    #[test]
    fn test_cost_draft_round_trip() {
        let row = DailyCostMetrics {
            id: "c-1".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            reference_id: "B-7".to_string(),
            weight_processed: 0.0,
            processing_hours: 0.0,
            raw_material_cost: 96.0,
            packaging_cost: 0.0,
            labor_cost: 25.0,
            wastage_cost: 0.0,
            total_cost: 121.0,
        };
        let mut draft = CostDraft::edit(&row);
        draft.wastage_cost = "4".to_string();

        assert_eq!(draft.preview_total(), Some(125.0));
        assert_eq!(draft.build().unwrap().wastage_cost, 4.0);

        draft.labor_cost = "x".to_string();
        assert_eq!(draft.build(), Err(DraftError::NotANumber("Labor")));
    }

    #[test]
    fn test_update_rates() {
        let rates = update_rates(Rates::default(), Some("14"), None).unwrap();
        assert_eq!(rates.labor_rate, 14.0);
        assert_eq!(rates.raw_material_rate, 8.0);

        assert_eq!(
            update_rates(Rates::default(), None, Some("-1")),
            Err(DraftError::Negative("Raw material rate"))
        );
    }

    #[test]
    fn test_complaint_reason_required() {
        assert_eq!(complaint_reason("  "), Err(DraftError::Required("Complaint reason")));
        assert_eq!(complaint_reason(" torn boxes ").unwrap(), "torn boxes");
    }
}
