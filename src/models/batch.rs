//! Production batch DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a batch is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchStatus {
    Received,
    Processing,
    DryingComplete,
    Packaged,
}

impl BatchStatus {
    /// Batches shown on the processing floor.
    pub fn is_on_floor(&self) -> bool {
        matches!(self, BatchStatus::Received | BatchStatus::Processing)
    }
}

/// Timer configuration captured when processing starts.
///
/// Stage and countdown are always derived from `start_time` and the wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessConfig {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start_time: DateTime<Utc>,
    pub wash_duration_seconds: u64,
    pub drain_duration_seconds: u64,
    pub cook_duration_seconds: u64,
    pub total_duration_seconds: u64,
}

impl ProcessConfig {
    pub fn new(start_time: DateTime<Utc>, wash: u64, drain: u64, cook: u64) -> Self {
        Self {
            start_time,
            wash_duration_seconds: wash,
            drain_duration_seconds: drain,
            cook_duration_seconds: cook,
            total_duration_seconds: wash + drain + cook,
        }
    }
}

/// A lot of raw mushrooms moving through the floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MushroomBatch {
    pub id: String,
    pub source_farm: String,
    pub net_weight_kg: f64,
    /// Set when part of the lot was already consumed.
    #[serde(default)]
    pub remaining_weight_kg: Option<f64>,
    pub status: BatchStatus,
    #[serde(default)]
    pub process_config: Option<ProcessConfig>,
    #[serde(default)]
    pub selected_recipe_name: Option<String>,
    #[serde(default)]
    pub recipe_type: Option<String>,
    #[serde(default)]
    pub quality_check_passed: Option<bool>,
    #[serde(default)]
    pub processing_wastage_kg: Option<f64>,
    #[serde(default)]
    pub wastage_reason: Option<String>,
}

impl MushroomBatch {
    /// Weight that went into the current run.
    pub fn input_weight_kg(&self) -> f64 {
        self.remaining_weight_kg
            .filter(|w| *w > 0.0)
            .unwrap_or(self.net_weight_kg)
    }

    /// Timer config, only while the batch is processing.
    pub fn active_config(&self) -> Option<&ProcessConfig> {
        match self.status {
            BatchStatus::Processing => self.process_config.as_ref(),
            _ => None,
        }
    }

    /// Apply a status change plus partial field updates.
    pub fn apply(&mut self, status: BatchStatus, update: &BatchUpdate) {
        self.status = status;
        if let Some(config) = update.process_config {
            self.process_config = Some(config);
        }
        if let Some(name) = &update.selected_recipe_name {
            self.selected_recipe_name = Some(name.clone());
        }
        if let Some(recipe_type) = &update.recipe_type {
            self.recipe_type = Some(recipe_type.clone());
        }
        if let Some(passed) = update.quality_check_passed {
            self.quality_check_passed = Some(passed);
        }
        if let Some(wastage) = update.processing_wastage_kg {
            self.processing_wastage_kg = Some(wastage);
        }
        if let Some(reason) = &update.wastage_reason {
            self.wastage_reason = Some(reason.clone());
        }
    }
}

/// Partial update sent with a batch status change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_config: Option<ProcessConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_recipe_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_check_passed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_wastage_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wastage_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch() -> MushroomBatch {
        MushroomBatch {
            id: "B-1".to_string(),
            source_farm: "Hilltop".to_string(),
            net_weight_kg: 5.0,
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

    #[test]
    fn test_input_weight_prefers_remaining() {
        let mut b = batch();
        assert_eq!(b.input_weight_kg(), 5.0);

        b.remaining_weight_kg = Some(3.5);
        assert_eq!(b.input_weight_kg(), 3.5);

        b.remaining_weight_kg = Some(0.0);
        assert_eq!(b.input_weight_kg(), 5.0);
    }

    #[test]
    fn test_start_time_is_epoch_millis_on_the_wire() {
        let start = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        let config = ProcessConfig::new(start, 60, 120, 300);
        let json = serde_json::to_value(config).unwrap();

        assert_eq!(json["startTime"], 1_700_000_000_123_i64);
        assert_eq!(json["totalDurationSeconds"], 480);
    }

    #[test]
    fn test_apply_keeps_untouched_fields() {
        let mut b = batch();
        b.selected_recipe_name = Some("Garlic".to_string());

        b.apply(
            BatchStatus::DryingComplete,
            &BatchUpdate {
                quality_check_passed: Some(true),
                processing_wastage_kg: Some(0.2),
                ..Default::default()
            },
        );

        assert_eq!(b.status, BatchStatus::DryingComplete);
        assert_eq!(b.selected_recipe_name.as_deref(), Some("Garlic"));
        assert_eq!(b.processing_wastage_kg, Some(0.2));
        assert!(!b.status.is_on_floor());
        assert!(b.active_config().is_none());
    }

    #[test]
    fn test_update_omits_unset_fields() {
        let update = BatchUpdate {
            selected_recipe_name: Some("Garlic".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"selectedRecipeName":"Garlic"}"#);
    }
}
