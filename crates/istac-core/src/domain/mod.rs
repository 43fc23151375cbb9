// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for istac-guard.
//!
//! Pure validation logic over an immutable catalog. Loading the catalog from
//! files is an adapter concern; everything here works on values already in
//! memory.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Immutable state**: `Catalog` and `DimensionRegistry` never change after build
//! - **Closed classifications**: outcomes are enums matched exhaustively
//!
pub mod catalog;
pub mod entities;
pub mod error;
pub mod normalize;
pub mod query;
pub mod resolver;
pub mod scanner;
pub mod selection;
pub mod suggest;
pub mod traceability;
pub mod validator;
pub mod value_objects;

// Re-exports for convenience
pub use catalog::Catalog;
pub use entities::{CatalogEntry, CatalogRecord, DimensionRegistry, DimensionSpec, ValuePattern};
pub use error::{CatalogLoadError, ErrorCategory};
pub use normalize::normalize;
pub use query::{DetectedDimension, QueryAnalysis, analyze_query};
pub use resolver::{AttributeKind, CompoundIdentifier, CompoundSegment, classify, decompose};
pub use scanner::{Finding, ScanPolicy, ScanReport, Verdict, scan, scan_with};
pub use selection::{Selection, SelectionError, SelectionStep, validate_selection};
pub use suggest::{EditDistanceRanker, MatchKind, Suggestion, SuggestionRanker, suggest};
pub use traceability::{TraceabilityVerdict, check_traceability};
pub use validator::{
    ValidationPolicy, ValidationRequest, ValidationResult, validate, validate_request,
};
pub use value_objects::{IndicatorCode, IndicatorStatus};
