//! Inventory item DTOs.

use serde::{Deserialize, Serialize};

/// Stock category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemType {
    #[default]
    Packaging,
    Label,
    Raw,
}

impl ItemType {
    pub const ALL: [ItemType; 3] = [ItemType::Packaging, ItemType::Label, ItemType::Raw];

    pub fn name(&self) -> &'static str {
        match self {
            ItemType::Packaging => "Packaging",
            ItemType::Label => "Label",
            ItemType::Raw => "Raw",
        }
    }
}

/// Packaging form factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemSubtype {
    #[default]
    Pouch,
    Tin,
    Sticker,
}

impl ItemSubtype {
    pub const ALL: [ItemSubtype; 3] = [ItemSubtype::Pouch, ItemSubtype::Tin, ItemSubtype::Sticker];

    pub fn name(&self) -> &'static str {
        match self {
            ItemSubtype::Pouch => "Pouch",
            ItemSubtype::Tin => "Tin",
            ItemSubtype::Sticker => "Sticker",
        }
    }
}

/// A stocked consumable (pouches, tins, labels, raw stock).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    #[serde(default)]
    pub subtype: Option<ItemSubtype>,
    pub quantity: i64,
    pub threshold: i64,
    pub unit: String,
    /// Cost of one pack.
    pub unit_cost: f64,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub pack_size: Option<i64>,
}

impl InventoryItem {
    /// Stock fell below the reorder threshold.
    pub fn is_low_stock(&self) -> bool {
        self.quantity < self.threshold
    }

    /// Units per pack, 1 when the supplier never told us.
    pub fn units_per_pack(&self) -> i64 {
        self.pack_size.filter(|s| *s > 0).unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        let json = r#"{
            "id": "inv-1",
            "name": "Red Pouch",
            "type": "PACKAGING",
            "subtype": "POUCH",
            "quantity": 20,
            "threshold": 50,
            "unit": "units",
            "unitCost": 45.0,
            "supplier": "PackCo",
            "packSize": 100
        }"#;
        let item: InventoryItem = serde_json::from_str(json).unwrap();

        assert_eq!(item.item_type, ItemType::Packaging);
        assert_eq!(item.subtype, Some(ItemSubtype::Pouch));
        assert_eq!(item.units_per_pack(), 100);
        assert!(item.is_low_stock());
    }

    #[test]
    fn test_units_per_pack_defaults_to_one() {
        let json = r#"{"id":"i","name":"n","type":"LABEL","quantity":50,"threshold":50,"unit":"units","unitCost":1.0}"#;
        let item: InventoryItem = serde_json::from_str(json).unwrap();

        assert_eq!(item.units_per_pack(), 1);
        assert!(!item.is_low_stock());
    }
}
