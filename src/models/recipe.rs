//! Processing recipe DTOs.

use serde::{Deserialize, Serialize};

/// What the cook stage does to the product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecipeType {
    /// Fried in oil.
    #[default]
    Chips,
    /// Dehydrated in a heat chamber.
    Dried,
}

impl RecipeType {
    pub const ALL: [RecipeType; 2] = [RecipeType::Chips, RecipeType::Dried];

    pub fn name(&self) -> &'static str {
        match self {
            RecipeType::Chips => "CHIPS",
            RecipeType::Dried => "DRIED",
        }
    }
}

/// A standard operating procedure for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub recipe_type: RecipeType,
    /// Weight the cook time is written for.
    pub base_weight_kg: f64,
    pub cook_time_minutes: f64,
    /// Degrees Celsius.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub image_url: String,
}

pub(crate) fn default_temperature() -> f64 {
    160.0
}

impl Recipe {
    /// Stand-in shown when a batch references no known recipe.
    pub fn placeholder() -> Self {
        Self {
            id: String::new(),
            name: "Unknown".to_string(),
            recipe_type: RecipeType::Chips,
            base_weight_kg: 0.5,
            cook_time_minutes: 0.0,
            temperature: default_temperature(),
            notes: String::new(),
            image_url: String::new(),
        }
    }

    /// Short tag shown on recipe cards.
    pub fn short_id(&self) -> &str {
        let start = self
            .id
            .char_indices()
            .rev()
            .nth(3)
            .map(|(i, _)| i)
            .unwrap_or(0);
        &self.id[start..]
    }
}
