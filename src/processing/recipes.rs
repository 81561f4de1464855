//! Recipe library rules and floor filtering.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{MushroomBatch, Recipe, RecipeType};
use crate::models::recipe::default_temperature;

pub const DEFAULT_BASE_WEIGHT_KG: f64 = 0.5;
pub const DEFAULT_COOK_MINUTES: f64 = 10.0;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecipeError {
    #[error("Recipe name is required")]
    NameRequired,

    #[error("A recipe with this name already exists!")]
    Duplicate,
}

/// Values captured by the recipe editor before defaults are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeDraft {
    /// Set when editing an existing recipe.
    pub id: Option<String>,
    pub name: String,
    pub recipe_type: RecipeType,
    pub base_weight_kg: Option<f64>,
    pub cook_time_minutes: Option<f64>,
    pub temperature: Option<f64>,
    pub notes: String,
    pub image_url: String,
}

impl RecipeDraft {
    /// Validate against the current library and fill in defaults.
    pub fn build(&self, library: &[Recipe], now: DateTime<Utc>) -> Result<Recipe, RecipeError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(RecipeError::NameRequired);
        }
        if is_duplicate_name(library, name, self.id.as_deref()) {
            return Err(RecipeError::Duplicate);
        }

        Ok(Recipe {
            id: self.id.clone().unwrap_or_else(|| new_recipe_id(now)),
            name: name.to_string(),
            recipe_type: self.recipe_type,
            base_weight_kg: positive_or(self.base_weight_kg, DEFAULT_BASE_WEIGHT_KG),
            cook_time_minutes: positive_or(self.cook_time_minutes, DEFAULT_COOK_MINUTES),
            temperature: positive_or(self.temperature, default_temperature()),
            notes: self.notes.trim().to_string(),
            image_url: self.image_url.trim().to_string(),
        })
    }
}

impl From<&Recipe> for RecipeDraft {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: Some(recipe.id.clone()),
            name: recipe.name.clone(),
            recipe_type: recipe.recipe_type,
            base_weight_kg: Some(recipe.base_weight_kg),
            cook_time_minutes: Some(recipe.cook_time_minutes),
            temperature: Some(recipe.temperature),
            notes: recipe.notes.clone(),
            image_url: recipe.image_url.clone(),
        }
    }
}

fn positive_or(value: Option<f64>, default: f64) -> f64 {
    value.filter(|v| v.is_finite() && *v > 0.0).unwrap_or(default)
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Case-insensitive name clash, ignoring the recipe being edited.
pub fn is_duplicate_name(library: &[Recipe], name: &str, editing_id: Option<&str>) -> bool {
    let wanted = normalize(name);
    library
        .iter()
        .any(|r| normalize(&r.name) == wanted && Some(r.id.as_str()) != editing_id)
}

/// Ids of recipes whose normalized name was already seen. The first of each name is kept.
pub fn find_duplicates(library: &[Recipe]) -> Vec<String> {
    let mut seen = HashSet::new();
    library
        .iter()
        .filter(|r| !seen.insert(normalize(&r.name)))
        .map(|r| r.id.clone())
        .collect()
}

pub fn new_recipe_id(now: DateTime<Utc>) -> String {
    format!("r-{}", now.timestamp_millis())
}

/// Batches that belong on the processing floor, in service order.
pub fn floor_batches(batches: Vec<MushroomBatch>) -> Vec<MushroomBatch> {
    batches.into_iter().filter(|b| b.status.is_on_floor()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BatchStatus;

    fn recipe(id: &str, name: &str) -> Recipe {
        Recipe {
            id: id.to_string(),
            name: name.to_string(),
            ..Recipe::placeholder()
        }
    }

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_735_689_600_123).unwrap()
    }

    #[test]
    fn test_build_applies_defaults() {
        let draft = RecipeDraft {
            name: "  Garlic Chips ".to_string(),
            base_weight_kg: Some(0.0),
            ..Default::default()
        };
        let recipe = draft.build(&[], now()).unwrap();

        assert_eq!(recipe.id, "r-1735689600123");
        assert_eq!(recipe.name, "Garlic Chips");
        assert_eq!(recipe.recipe_type, RecipeType::Chips);
        assert_eq!(recipe.base_weight_kg, 0.5);
        assert_eq!(recipe.cook_time_minutes, 10.0);
        assert_eq!(recipe.temperature, 160.0);
    }

    #[test]
    fn test_build_requires_name() {
        let draft = RecipeDraft {
            name: "   ".to_string(),
            ..Default::default()
        };
        assert_eq!(draft.build(&[], now()), Err(RecipeError::NameRequired));
    }

    #[test]
    fn test_duplicate_name_rejected_case_insensitive() {
        let library = vec![recipe("r-1", "Garlic Chips")];
        let draft = RecipeDraft {
            name: "GARLIC chips".to_string(),
            ..Default::default()
        };
        let err = draft.build(&library, now()).unwrap_err();
        assert_eq!(err.to_string(), "A recipe with this name already exists!");
    }

    #[test]
    fn test_editing_keeps_own_name() {
        let library = vec![recipe("r-1", "Garlic Chips"), recipe("r-2", "Chili")];
        let mut draft = RecipeDraft::from(&library[0]);
        draft.cook_time_minutes = Some(14.0);

        let updated = draft.build(&library, now()).unwrap();
        assert_eq!(updated.id, "r-1");
        assert_eq!(updated.cook_time_minutes, 14.0);

        draft.name = "chili".to_string();
        assert_eq!(draft.build(&library, now()), Err(RecipeError::Duplicate));
    }

    #[test]
    fn test_find_duplicates_keeps_first() {
        let library = vec![
            recipe("r-1", "Garlic"),
            recipe("r-2", " garlic "),
            recipe("r-3", "Chili"),
            recipe("r-4", "GARLIC"),
        ];
        assert_eq!(find_duplicates(&library), vec!["r-2".to_string(), "r-4".to_string()]);
        assert!(find_duplicates(&library[2..3]).is_empty());
    }

    #[test]
    fn test_floor_batches_filter() {
        let make = |id: &str, status| MushroomBatch {
            id: id.to_string(),
            source_farm: "Farm".to_string(),
            net_weight_kg: 1.0,
            remaining_weight_kg: None,
            status,
            process_config: None,
            selected_recipe_name: None,
            recipe_type: None,
            quality_check_passed: None,
            processing_wastage_kg: None,
            wastage_reason: None,
        };
        let batches = vec![
            make("a", BatchStatus::Received),
            make("b", BatchStatus::DryingComplete),
            make("c", BatchStatus::Processing),
            make("d", BatchStatus::Packaged),
        ];
        let ids: Vec<_> = floor_batches(batches).into_iter().map(|b| b.id).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }
}
