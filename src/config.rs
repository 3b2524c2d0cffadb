//! Presentation configuration
//!
//! Static texts and defaults handed to the presentation layer alongside the
//! computed tables. Every field has a default, so a partial JSON document
//! only needs to name what it overrides.

use crate::catalog::ReturnVariant;
use crate::error::{PerformanceError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CenterConfig {
    /// Date the performance figures are reported as of
    #[serde(default = "default_as_of_date")]
    pub as_of_date: String,

    /// Download name of the CSV export
    #[serde(default = "default_export_filename")]
    pub export_filename: String,

    /// MIME type of the CSV export
    #[serde(default = "default_export_mime_type")]
    pub export_mime_type: String,

    /// Whether the standardized table starts visible
    #[serde(default = "default_true")]
    pub show_standardized: bool,

    /// Whether the non-standardized table starts visible
    #[serde(default = "default_true")]
    pub show_non_standardized: bool,

    /// Overrides every category's initial expansion state when set
    #[serde(default)]
    pub default_expanded: Option<bool>,

    #[serde(default = "default_standardized_label")]
    pub standardized_label: String,

    #[serde(default = "default_non_standardized_label")]
    pub non_standardized_label: String,

    #[serde(default = "default_standardized_explanation")]
    pub standardized_explanation: String,

    #[serde(default = "default_non_standardized_explanation")]
    pub non_standardized_explanation: String,

    /// Shown when the filters leave nothing to display
    #[serde(default = "default_empty_message")]
    pub empty_message: String,
}

impl Default for CenterConfig {
    fn default() -> Self {
        Self {
            as_of_date: default_as_of_date(),
            export_filename: default_export_filename(),
            export_mime_type: default_export_mime_type(),
            show_standardized: true,
            show_non_standardized: true,
            default_expanded: None,
            standardized_label: default_standardized_label(),
            non_standardized_label: default_non_standardized_label(),
            standardized_explanation: default_standardized_explanation(),
            non_standardized_explanation: default_non_standardized_explanation(),
            empty_message: default_empty_message(),
        }
    }
}

impl CenterConfig {
    /// Parse a (possibly partial) configuration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| PerformanceError::Config(e.to_string()))
    }

    /// Table heading for a return variant
    pub fn table_title(&self, variant: ReturnVariant) -> &str {
        match variant {
            ReturnVariant::Standardized => &self.standardized_label,
            ReturnVariant::NonStandardized => &self.non_standardized_label,
        }
    }

    /// Explanation paragraph for a return variant
    pub fn explanation(&self, variant: ReturnVariant) -> &str {
        match variant {
            ReturnVariant::Standardized => &self.standardized_explanation,
            ReturnVariant::NonStandardized => &self.non_standardized_explanation,
        }
    }

    /// The "as of" line shown above the disclaimer
    pub fn as_of_notice(&self) -> String {
        format!(
            "Performance data as of {}. Past performance is not a guarantee of future results.",
            self.as_of_date
        )
    }
}

fn default_true() -> bool { true }
fn default_as_of_date() -> String { "04/30/2025".to_string() }
fn default_export_filename() -> String { "performance_data.csv".to_string() }
fn default_export_mime_type() -> String { "text/csv;charset=utf-8".to_string() }

fn default_standardized_label() -> String {
    "Standardized Returns (Including Surrender Charges)".to_string()
}

fn default_non_standardized_label() -> String {
    "Non-Standardized Returns (Excluding Surrender Charges)".to_string()
}

fn default_standardized_explanation() -> String {
    "Include the effect of applicable surrender charges (contingent deferred sales charges) \
     that would apply if you terminated your contract at the end of the applicable time period."
        .to_string()
}

fn default_non_standardized_explanation() -> String {
    "Do not include the effect of surrender charges. If surrender charges were included, \
     returns would be lower."
        .to_string()
}

fn default_empty_message() -> String {
    "No funds match your current filter criteria. Please adjust your filters to see results."
        .to_string()
}
