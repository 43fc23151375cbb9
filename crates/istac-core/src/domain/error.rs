// ============================================================================
// domain/error.rs - CATALOG LOAD ERRORS
// ============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Fatal, startup-time failure while building the catalog.
///
/// All errors are:
/// - Cloneable (the CLI logs and prints the same value)
/// - Categorizable (for exit codes)
/// - Actionable (provides suggestions)
///
/// The system must refuse to start when one of these is returned: running
/// with an inconsistent catalog would defeat every downstream check.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CatalogLoadError {
    // ========================================================================
    // Source errors
    // ========================================================================
    #[error("catalog source not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("failed to read {}: {reason}", path.display())]
    Io { path: PathBuf, reason: String },

    #[error("malformed catalog source at {location}: {reason}")]
    Malformed { location: String, reason: String },

    #[error("catalog source contains no indicators")]
    Empty,

    // ========================================================================
    // Consistency errors
    // ========================================================================
    #[error("duplicate indicator code '{code}' (first at {first}, again at {second})")]
    DuplicateCode {
        code: String,
        first: String,
        second: String,
    },

    #[error("'{name}' is both an indicator code and a dimension name")]
    NamespaceCollision { name: String },

    #[error("indicator '{code}' references unknown dimension '{dimension}'")]
    UnknownDimension { code: String, dimension: String },

    #[error("invalid dimension definition '{dimension}': {reason}")]
    InvalidDimensionSpec { dimension: String, reason: String },
}

impl CatalogLoadError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::SourceNotFound { path } => vec![
                format!("No file at {}", path.display()),
                "Set catalog.path in the configuration or ISTAC_GUARD__CATALOG__PATH".into(),
                "Omit the path to use the built-in catalog".into(),
            ],
            Self::Malformed { location, .. } => vec![
                format!("Fix the row at {location}"),
                "The catalog must be tab-separated with a 'code' header column".into(),
            ],
            Self::Empty => vec![
                "The catalog source has a header but no indicator rows".into(),
                "Export the indicator list again from the ISTAC API".into(),
            ],
            Self::DuplicateCode { code, .. } => vec![
                format!("Keep a single row for '{code}'"),
                "Codes are compared after removing accents, case and punctuation".into(),
            ],
            Self::NamespaceCollision { name } => vec![
                format!("Rename the indicator or the dimension alias '{name}'"),
                "Dimension names and indicator codes must never overlap".into(),
            ],
            Self::UnknownDimension { dimension, .. } => vec![
                format!("Declare '{dimension}' in the dimensions file"),
                "Or remove it from the indicator's dimension list".into(),
            ],
            Self::InvalidDimensionSpec { dimension, .. } => {
                vec![format!("Review the [[dimension]] entry for '{dimension}'")]
            }
            Self::Io { .. } => vec!["Check file permissions and encoding (UTF-8)".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::SourceNotFound { .. } => ErrorCategory::NotFound,
            Self::Malformed { .. } | Self::Empty => ErrorCategory::Validation,
            Self::DuplicateCode { .. }
            | Self::NamespaceCollision { .. }
            | Self::UnknownDimension { .. }
            | Self::InvalidDimensionSpec { .. } => ErrorCategory::Consistency,
            Self::Io { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Consistency,
    NotFound,
    Internal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_code_message_names_both_locations() {
        let err = CatalogLoadError::DuplicateCode {
            code: "POBLACION".into(),
            first: "catalog.tsv:2".into(),
            second: "catalog.tsv:9".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("catalog.tsv:2"));
        assert!(msg.contains("catalog.tsv:9"));
    }

    #[test]
    fn collision_is_a_consistency_error() {
        let err = CatalogLoadError::NamespaceCollision { name: "ISLA".into() };
        assert_eq!(err.category(), ErrorCategory::Consistency);
        assert!(err.suggestions().iter().any(|s| s.contains("ISLA")));
    }

    #[test]
    fn missing_source_is_not_found() {
        let err = CatalogLoadError::SourceNotFound {
            path: PathBuf::from("/nope/catalog.tsv"),
        };
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(err.to_string().contains("/nope/catalog.tsv"));
    }
}
