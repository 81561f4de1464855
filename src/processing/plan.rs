//! Timer plans for starting, switching and skipping batch runs.

use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;

use crate::config::ProcessingConfig;
use crate::models::{BatchUpdate, MushroomBatch, ProcessConfig, Recipe};

/// Reasons a timer plan cannot be built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("Please create a recipe first!")]
    NoRecipes,

    #[error("Batch {0} is not processing")]
    NotProcessing(String),
}

/// Durations and defaults used to size a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanSettings {
    pub drain_secs: u64,
    pub wash_secs_per_base: u64,
    pub default_base_weight_kg: f64,
}

impl From<&ProcessingConfig> for PlanSettings {
    fn from(config: &ProcessingConfig) -> Self {
        Self {
            drain_secs: config.drain_duration_secs,
            wash_secs_per_base: config.wash_secs_per_base,
            default_base_weight_kg: config.default_base_weight_kg,
        }
    }
}

impl Default for PlanSettings {
    fn default() -> Self {
        (&ProcessingConfig::default()).into()
    }
}

impl PlanSettings {
    /// How many recipe base weights the batch holds.
    fn ratio(&self, batch: &MushroomBatch, recipe: &Recipe) -> f64 {
        let base = if recipe.base_weight_kg > 0.0 {
            recipe.base_weight_kg
        } else {
            self.default_base_weight_kg
        };
        batch.net_weight_kg / base
    }

    fn wash_secs(&self, ratio: f64) -> u64 {
        ceil_secs(ratio * self.wash_secs_per_base as f64)
    }

    fn cook_secs(&self, ratio: f64, recipe: &Recipe) -> u64 {
        ceil_secs(ratio * recipe.cook_time_minutes * 60.0)
    }
}

fn ceil_secs(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.ceil() as u64
    } else {
        0
    }
}

/// Build the update that moves a received batch into processing.
pub fn plan_start(
    batch: &MushroomBatch,
    recipe: &Recipe,
    settings: &PlanSettings,
    now: DateTime<Utc>,
) -> BatchUpdate {
    let ratio = settings.ratio(batch, recipe);
    let config = ProcessConfig::new(
        now,
        settings.wash_secs(ratio),
        settings.drain_secs,
        settings.cook_secs(ratio, recipe),
    );

    BatchUpdate {
        process_config: Some(config),
        selected_recipe_name: Some(recipe.name.clone()),
        recipe_type: Some(recipe.name.clone()),
        ..Default::default()
    }
}

/// Swap the recipe of a running batch; only the cook span is resized.
pub fn plan_switch(batch: &MushroomBatch, recipe: &Recipe, settings: &PlanSettings) -> Result<BatchUpdate, PlanError> {
    let current = batch
        .process_config
        .ok_or_else(|| PlanError::NotProcessing(batch.id.clone()))?;

    let ratio = settings.ratio(batch, recipe);
    let config = ProcessConfig::new(
        current.start_time,
        current.wash_duration_seconds,
        current.drain_duration_seconds,
        settings.cook_secs(ratio, recipe),
    );

    Ok(BatchUpdate {
        process_config: Some(config),
        selected_recipe_name: Some(recipe.name.clone()),
        recipe_type: Some(recipe.name.clone()),
        ..Default::default()
    })
}

/// Push the start time back so the run reads as complete at `now`.
pub fn plan_speed_up(batch: &MushroomBatch, now: DateTime<Utc>) -> Result<BatchUpdate, PlanError> {
    let current = batch
        .process_config
        .ok_or_else(|| PlanError::NotProcessing(batch.id.clone()))?;

    let total = i64::try_from(current.total_duration_seconds).unwrap_or(i64::MAX / 2_000);
    let config = ProcessConfig {
        start_time: now - TimeDelta::seconds(total) - TimeDelta::seconds(1),
        ..current
    };

    Ok(BatchUpdate {
        process_config: Some(config),
        ..Default::default()
    })
}

/// Recipe a card should display for `batch`.
pub fn active_recipe(batch: &MushroomBatch, recipes: &[Recipe]) -> Recipe {
    batch
        .selected_recipe_name
        .as_deref()
        .and_then(|name| recipes.iter().find(|r| r.name == name))
        .or_else(|| recipes.first())
        .cloned()
        .unwrap_or_else(Recipe::placeholder)
}

/// Guard for the start action.
pub fn ensure_recipes(recipes: &[Recipe]) -> Result<(), PlanError> {
    if recipes.is_empty() {
        Err(PlanError::NoRecipes)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BatchStatus, RecipeType};
    use crate::processing::stage::{Stage, status_at};

    fn batch(net: f64) -> MushroomBatch {
        MushroomBatch {
            id: "B-9".to_string(),
            source_farm: "Valley Farm".to_string(),
            net_weight_kg: net,
            remaining_weight_kg: None,
            status: BatchStatus::Received,
            process_config: None,
            selected_recipe_name: None,
            recipe_type: None,
            quality_check_passed: None,
            processing_wastage_kg: None,
            wastage_reason: None,
        }
    }

    fn recipe(name: &str, base: f64, cook_minutes: f64) -> Recipe {
        Recipe {
            id: format!("r-{name}"),
            name: name.to_string(),
            recipe_type: RecipeType::Chips,
            base_weight_kg: base,
            cook_time_minutes: cook_minutes,
            temperature: 160.0,
            notes: String::new(),
            image_url: String::new(),
        }
    }

    fn start() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_700_000_000_000).unwrap()
    }

    #[test]
    fn test_start_scales_with_weight() {
        let update = plan_start(&batch(1.0), &recipe("Garlic", 0.5, 12.0), &PlanSettings::default(), start());
        let config = update.process_config.unwrap();

        assert_eq!(config.start_time, start());
        assert_eq!(config.wash_duration_seconds, 120);
        assert_eq!(config.drain_duration_seconds, 120);
        assert_eq!(config.cook_duration_seconds, 1440);
        assert_eq!(config.total_duration_seconds, 1680);
        assert_eq!(update.selected_recipe_name.as_deref(), Some("Garlic"));
    }

    #[test]
    fn test_start_rounds_up_partial_seconds() {
        let update = plan_start(&batch(0.7), &recipe("Plain", 0.5, 1.0), &PlanSettings::default(), start());
        let config = update.process_config.unwrap();

        // 1.4 base weights: wash 84s, cook 84s
        assert_eq!(config.wash_duration_seconds, 84);
        assert_eq!(config.cook_duration_seconds, 84);
    }

    #[test]
    fn test_zero_base_weight_uses_default() {
        let update = plan_start(&batch(1.0), &recipe("Odd", 0.0, 10.0), &PlanSettings::default(), start());
        assert_eq!(update.process_config.unwrap().cook_duration_seconds, 1200);
    }

    #[test]
    fn test_switch_keeps_start_and_wash() {
        let settings = PlanSettings::default();
        let mut b = batch(1.0);
        b.apply(
            BatchStatus::Processing,
            &plan_start(&b, &recipe("Garlic", 0.5, 12.0), &settings, start()),
        );

        let update = plan_switch(&b, &recipe("Chili", 1.0, 5.0), &settings).unwrap();
        let config = update.process_config.unwrap();

        assert_eq!(config.start_time, start());
        assert_eq!(config.wash_duration_seconds, 120);
        assert_eq!(config.cook_duration_seconds, 300);
        assert_eq!(config.total_duration_seconds, 540);
        assert_eq!(update.selected_recipe_name.as_deref(), Some("Chili"));
    }

    #[test]
    fn test_switch_requires_running_batch() {
        let err = plan_switch(&batch(1.0), &recipe("Chili", 1.0, 5.0), &PlanSettings::default()).unwrap_err();
        assert_eq!(err, PlanError::NotProcessing("B-9".to_string()));
    }

    #[test]
    fn test_speed_up_completes_run() {
        let settings = PlanSettings::default();
        let mut b = batch(1.0);
        b.apply(
            BatchStatus::Processing,
            &plan_start(&b, &recipe("Garlic", 0.5, 12.0), &settings, start()),
        );

        let now = start() + TimeDelta::seconds(30);
        let update = plan_speed_up(&b, now).unwrap();
        let config = update.process_config.unwrap();

        assert_eq!(status_at(&config, now).stage, Stage::Complete);
        assert_eq!(config.cook_duration_seconds, 1440);
    }

    #[test]
    fn test_active_recipe_fallbacks() {
        let recipes = vec![recipe("Garlic", 0.5, 12.0), recipe("Chili", 0.5, 8.0)];
        let mut b = batch(1.0);

        assert_eq!(active_recipe(&b, &recipes).name, "Garlic");

        b.selected_recipe_name = Some("Chili".to_string());
        assert_eq!(active_recipe(&b, &recipes).name, "Chili");

        b.selected_recipe_name = Some("Gone".to_string());
        assert_eq!(active_recipe(&b, &recipes).name, "Garlic");

        assert_eq!(active_recipe(&b, &[]).name, "Unknown");
    }

    #[test]
    fn test_ensure_recipes() {
        assert_eq!(ensure_recipes(&[]), Err(PlanError::NoRecipes));
        assert!(ensure_recipes(&[recipe("Garlic", 0.5, 12.0)]).is_ok());
    }
}
