//! Quality check that gates batch completion.

use thiserror::Error;

use crate::models::BatchUpdate;

/// Why a batch lost weight during processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WastageReason {
    Discoloration,
    TextureIssue,
    Contamination,
    Burnt,
    Other,
}

impl WastageReason {
    pub const ALL: [WastageReason; 5] = [
        WastageReason::Discoloration,
        WastageReason::TextureIssue,
        WastageReason::Contamination,
        WastageReason::Burnt,
        WastageReason::Other,
    ];

    /// Value recorded on the batch.
    pub fn code(&self) -> &'static str {
        match self {
            WastageReason::Discoloration => "Discoloration",
            WastageReason::TextureIssue => "Texture Issue",
            WastageReason::Contamination => "Contamination",
            WastageReason::Burnt => "Burnt",
            WastageReason::Other => "Other",
        }
    }

    /// Text shown in the picker.
    pub fn label(&self) -> &'static str {
        match self {
            WastageReason::Discoloration => "Discoloration",
            WastageReason::TextureIssue => "Texture / Mushy",
            WastageReason::Contamination => "Contamination",
            WastageReason::Burnt => "Burnt / Overcooked",
            WastageReason::Other => "Other",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QcError {
    #[error("Enter the good weight")]
    MissingGoodWeight,

    #[error("{field} weight must be a non-negative number")]
    InvalidWeight { field: &'static str },

    #[error("Total weight ({total:.2}kg) must match Input ({input:.2}kg)")]
    WeightMismatch { total: f64, input: f64 },

    #[error("Select a reason for the wastage")]
    MissingReason,

    #[error("Please specify the wastage reason")]
    MissingCustomReason,
}

/// Raw QC form input as typed by the operator.
#[derive(Debug, Clone, PartialEq)]
pub struct QcForm {
    pub good_weight: String,
    pub wastage_weight: String,
    pub reason: Option<WastageReason>,
    pub custom_reason: String,
}

impl Default for QcForm {
    fn default() -> Self {
        Self {
            good_weight: String::new(),
            wastage_weight: "0".to_string(),
            reason: None,
            custom_reason: String::new(),
        }
    }
}

/// Accepted QC result for one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct QcOutcome {
    pub good_kg: f64,
    pub wastage_kg: f64,
    pub reason: Option<String>,
}

impl QcOutcome {
    /// Update sent with the DRYING_COMPLETE transition.
    pub fn into_update(self) -> BatchUpdate {
        BatchUpdate {
            quality_check_passed: Some(true),
            processing_wastage_kg: Some(self.wastage_kg),
            wastage_reason: self.reason,
            ..Default::default()
        }
    }
}

fn parse_weight(text: &str, field: &'static str) -> Result<Option<f64>, QcError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(Some(value)),
        _ => Err(QcError::InvalidWeight { field }),
    }
}

impl QcForm {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Wastage typed so far, used to decide whether the reason picker shows.
    pub fn wastage_entered(&self) -> f64 {
        self.wastage_weight.trim().parse::<f64>().unwrap_or(0.0)
    }

    pub fn needs_reason(&self) -> bool {
        self.wastage_entered() > 0.0
    }

    /// Whether the finish button is enabled.
    pub fn can_submit(&self) -> bool {
        if self.good_weight.trim().is_empty() {
            return false;
        }
        if !self.needs_reason() {
            return true;
        }
        match self.reason {
            None => false,
            Some(WastageReason::Other) => !self.custom_reason.trim().is_empty(),
            Some(_) => true,
        }
    }

    /// Check the entered weights against the batch input weight.
    pub fn validate(&self, input_kg: f64, tolerance_kg: f64) -> Result<QcOutcome, QcError> {
        let good_kg = parse_weight(&self.good_weight, "Good")?.ok_or(QcError::MissingGoodWeight)?;
        let wastage_kg = parse_weight(&self.wastage_weight, "Wastage")?.unwrap_or(0.0);

        let total = good_kg + wastage_kg;
        if (total - input_kg).abs() > tolerance_kg {
            return Err(QcError::WeightMismatch { total, input: input_kg });
        }

        let reason = if wastage_kg > 0.0 {
            match self.reason {
                None => return Err(QcError::MissingReason),
                Some(WastageReason::Other) => {
                    let custom = self.custom_reason.trim();
                    if custom.is_empty() {
                        return Err(QcError::MissingCustomReason);
                    }
                    Some(format!("Other: {custom}"))
                }
                Some(reason) => Some(reason.code().to_string()),
            }
        } else {
            None
        };

        Ok(QcOutcome {
            good_kg,
            wastage_kg,
            reason,
        })
    }
}
