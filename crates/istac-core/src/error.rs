//! Unified error handling for istac-core.
//!
//! This module provides a unified error type that wraps catalog-load and
//! application errors, with user-actionable suggestions.
//!
//! Validation rejections are *not* errors: they are
//! [`ValidationResult`](crate::domain::ValidationResult) values.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::CatalogLoadError;

/// Root error type for istac-core operations.
#[derive(Debug, Error, Clone)]
pub enum GuardError {
    /// The catalog or dimension definitions could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogLoadError),

    /// Errors from the application layer (orchestration failures).
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl GuardError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Catalog(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {message}"),
                "Run `istac-guard config list` to inspect the effective settings".into(),
            ],
            Self::Internal { .. } => vec!["This appears to be a bug in istac-guard".into()],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Catalog(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Consistency => ErrorCategory::Consistency,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// `true` if the error happened while loading the catalog.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Self::Catalog(_))
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Consistency,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type GuardResult<T> = Result<T, GuardError>;
