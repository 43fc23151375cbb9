//! Application layer errors.
//!
//! These errors represent failures in orchestration, not catalog
//! consistency. Load failures are `CatalogLoadError` from `crate::domain`.

use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    /// A lookup by code found nothing.
    #[error("Indicator not found: {code}")]
    IndicatorNotFound {
        code: String,
        suggestions: Vec<String>,
    },

    /// A policy value is out of range.
    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::IndicatorNotFound { suggestions, .. } if !suggestions.is_empty() => {
                vec![format!("Did you mean: {}", suggestions.join(", "))]
            }
            Self::IndicatorNotFound { .. } => vec![
                "Try: istac-guard list --search <text> to browse the catalog".into(),
            ],
            Self::InvalidPolicy(_) => vec![
                "Limits in [validation] and [scanner] must be greater than zero".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::IndicatorNotFound { .. } => ErrorCategory::NotFound,
            Self::InvalidPolicy(_) => ErrorCategory::Configuration,
        }
    }
}
