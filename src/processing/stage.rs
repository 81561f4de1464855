//! Batch stage derivation.
//!
//! A processing batch never stores a countdown. Its stage, time left and
//! progress are recomputed from [`ProcessConfig`] and the wall clock on
//! every tick.

use chrono::{DateTime, Utc};

use crate::models::{ProcessConfig, RecipeType};

/// Floor stage of a processing batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Wash,
    Drain,
    Cook,
    /// Terminal; waiting for QC.
    Complete,
}

impl Stage {
    /// Headline shown on the timer card.
    pub fn label(&self, recipe_type: RecipeType) -> &'static str {
        match (self, recipe_type) {
            (Stage::Wash, _) => "WASHING CYCLE",
            (Stage::Drain, _) => "DRAINING / AIR DRY",
            (Stage::Cook, RecipeType::Chips) => "FRYING PROCESS",
            (Stage::Cook, RecipeType::Dried) => "DEHYDRATION",
            (Stage::Complete, _) => "CYCLE COMPLETE",
        }
    }

    /// Safety banner for operators near the line.
    pub fn warning(&self, recipe_type: RecipeType) -> &'static str {
        match (self, recipe_type) {
            (Stage::Wash, _) => "CAUTION: ROTATING DRUM ACTIVE",
            (Stage::Drain, _) => "HIGH VELOCITY AIRFLOW",
            (Stage::Cook, RecipeType::Chips) => "DANGER: HOT OIL 160°C",
            (Stage::Cook, RecipeType::Dried) => "HEAT CHAMBER SEALED",
            (Stage::Complete, _) => "SAFE TO UNLOAD",
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Stage::Complete)
    }
}

/// Snapshot of a batch timer at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageStatus {
    pub stage: Stage,
    /// Whole seconds since the run started (never negative).
    pub elapsed_secs: u64,
    /// Seconds until the current stage ends; 0 once complete.
    pub time_left_secs: u64,
    /// Percent through the current stage, 0..=100.
    pub progress: f64,
}

/// Classify an elapsed time against the three stage durations.
///
/// Boundaries are cumulative: `[0, w)` wash, `[w, w+d)` drain,
/// `[w+d, w+d+c)` cook, anything later is complete. Zero-length
/// stages are skipped.
pub fn classify(elapsed_secs: u64, wash_secs: u64, drain_secs: u64, cook_secs: u64) -> StageStatus {
    let drain_start = wash_secs;
    let cook_start = wash_secs + drain_secs;
    let finish = cook_start + cook_secs;

    let (stage, span_start, span_end) = if elapsed_secs < drain_start {
        (Stage::Wash, 0, drain_start)
    } else if elapsed_secs < cook_start {
        (Stage::Drain, drain_start, cook_start)
    } else if elapsed_secs < finish {
        (Stage::Cook, cook_start, finish)
    } else {
        return StageStatus {
            stage: Stage::Complete,
            elapsed_secs,
            time_left_secs: 0,
            progress: 100.0,
        };
    };

    // span_end > elapsed >= span_start, so the span is never empty here
    let span = (span_end - span_start) as f64;
    StageStatus {
        stage,
        elapsed_secs,
        time_left_secs: span_end - elapsed_secs,
        progress: (elapsed_secs - span_start) as f64 / span * 100.0,
    }
}

/// Derive the status of a running batch at `now`.
pub fn status_at(config: &ProcessConfig, now: DateTime<Utc>) -> StageStatus {
    classify(
        elapsed_secs(config.start_time, now),
        config.wash_duration_seconds,
        config.drain_duration_seconds,
        config.cook_duration_seconds,
    )
}

/// Whole seconds between `start` and `now`, clamped at zero for clock skew.
pub fn elapsed_secs(start: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let millis = (now - start).num_milliseconds();
    if millis <= 0 { 0 } else { (millis / 1000) as u64 }
}

/// Countdown text, `m:ss`.
pub fn format_countdown(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
