//! Processing floor logic: batch timers, QC and the recipe library.

pub mod plan;
pub mod qc;
pub mod recipes;
pub mod stage;

pub use plan::{PlanError, PlanSettings, active_recipe, ensure_recipes, plan_speed_up, plan_start, plan_switch};
pub use qc::{QcError, QcForm, QcOutcome, WastageReason};
pub use recipes::{RecipeDraft, RecipeError, find_duplicates, floor_batches};
pub use stage::{Stage, StageStatus, format_countdown, status_at};
