//! Guard Service - the use-case façade over a loaded catalog.
//!
//! Every external interface of the engine goes through here: request
//! validation before a statistics call, output scanning after it, and the
//! read-only catalog queries the CLI exposes.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::{
    application::ApplicationError,
    domain::{
        Catalog, CatalogEntry, DimensionSpec, EditDistanceRanker, IndicatorCode, QueryAnalysis,
        ScanPolicy, ScanReport, Selection, SuggestionRanker, TraceabilityVerdict,
        ValidationPolicy, ValidationRequest, ValidationResult, analyze_query, check_traceability,
        scan_with, validate,
    },
    error::GuardResult,
};

/// Indicator metadata for display and export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndicatorInfo {
    pub code: String,
    pub display_name: String,
    pub topic: String,
    pub dimensions: Vec<String>,
    pub status: String,
}

impl From<&CatalogEntry> for IndicatorInfo {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            code: entry.code().to_string(),
            display_name: entry.display_name().to_string(),
            topic: entry.topic().to_string(),
            dimensions: entry.available_dimensions().to_vec(),
            status: entry.status().to_string(),
        }
    }
}

/// One dimension of an indicator, with everything a caller may filter by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimensionInfo {
    pub name: String,
    pub label: String,
    pub aliases: Vec<String>,
    pub allowed_values: Vec<String>,
}

impl From<&DimensionSpec> for DimensionInfo {
    fn from(spec: &DimensionSpec) -> Self {
        Self {
            name: spec.name().to_string(),
            label: spec.label().to_string(),
            aliases: spec.aliases().to_vec(),
            allowed_values: spec.allowed_values(),
        }
    }
}

/// Validation and scanning over one shared catalog.
///
/// Cheap to clone-by-`Arc` and safe to call from many threads at once.
pub struct GuardService {
    catalog: Arc<Catalog>,
    ranker: Box<dyn SuggestionRanker>,
    policy: ValidationPolicy,
    scan_policy: ScanPolicy,
}

impl GuardService {
    /// Create a service with the default ranker and policies.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            ranker: Box::new(EditDistanceRanker::default()),
            policy: ValidationPolicy::default(),
            scan_policy: ScanPolicy::default(),
        }
    }

    pub fn with_ranker(mut self, ranker: Box<dyn SuggestionRanker>) -> Self {
        self.ranker = ranker;
        self
    }

    /// Replace the validation policy.
    ///
    /// # Errors
    ///
    /// [`ApplicationError::InvalidPolicy`] if a limit is zero.
    pub fn with_policy(mut self, policy: ValidationPolicy) -> GuardResult<Self> {
        if policy.suggestion_limit == 0 {
            return Err(ApplicationError::InvalidPolicy(
                "suggestion_limit must be at least 1".into(),
            )
            .into());
        }
        if policy.max_listed_values == 0 {
            return Err(ApplicationError::InvalidPolicy(
                "max_listed_values must be at least 1".into(),
            )
            .into());
        }
        self.policy = policy;
        Ok(self)
    }

    /// Replace the scan policy.
    ///
    /// # Errors
    ///
    /// [`ApplicationError::InvalidPolicy`] if `min_token_len` is zero.
    pub fn with_scan_policy(mut self, scan_policy: ScanPolicy) -> GuardResult<Self> {
        if scan_policy.min_token_len == 0 {
            return Err(ApplicationError::InvalidPolicy(
                "min_token_len must be at least 1".into(),
            )
            .into());
        }
        self.scan_policy = scan_policy;
        Ok(self)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    // ── Pre-execution ─────────────────────────────────────────────────────────

    /// Validate an identifier and its filters before any external call.
    #[instrument(skip_all, fields(identifier = %identifier, filters = filters.len()))]
    pub fn validate_request(&self, identifier: &str, filters: &[(String, String)]) -> ValidationResult {
        let request = ValidationRequest {
            raw_identifier: identifier.to_string(),
            raw_filters: filters.to_vec(),
        };
        self.validate(&request)
    }

    pub fn validate(&self, request: &ValidationRequest) -> ValidationResult {
        let result = validate(&self.catalog, request, self.ranker.as_ref(), &self.policy);
        if result.is_accepted() {
            debug!(outcome = result.outcome(), "request accepted");
        } else {
            info!(outcome = result.outcome(), reason = %result, "request rejected");
        }
        result
    }

    /// Ranked catalog codes for a free-form identifier.
    pub fn suggest(&self, identifier: &str, limit: usize) -> Vec<IndicatorCode> {
        self.ranker
            .rank(&self.catalog, identifier, limit)
            .into_iter()
            .map(|s| s.code)
            .collect()
    }

    /// Open a candidate selection for `identifier`.
    ///
    /// Candidates are the suggestions attached to its rejection, or the
    /// ranked neighbours when the validator has none to offer. `None` when
    /// nothing is close enough to choose from.
    #[instrument(skip(self))]
    pub fn start_selection(&self, identifier: &str) -> Option<Selection> {
        let candidates = match self.validate_request(identifier, &[]) {
            ValidationResult::RejectedUnknownIndicator { suggestions, .. }
            | ValidationResult::RejectedDimensionAsIndicator { suggestions, .. }
                if !suggestions.is_empty() =>
            {
                suggestions
            }
            _ => self.suggest(identifier, self.policy.suggestion_limit),
        };
        debug!(candidates = candidates.len(), "selection opened");
        Selection::new(candidates)
    }

    // ── Post-execution ────────────────────────────────────────────────────────

    /// Re-check generated text for codes the catalog does not know.
    #[instrument(skip_all, fields(bytes = text.len()))]
    pub fn scan_text(&self, text: &str) -> ScanReport {
        let report = scan_with(&self.catalog, text, &self.scan_policy);
        if !report.is_clean() {
            info!(
                unverified = report.unverified().count(),
                "unverified codes in generated text"
            );
        }
        report
    }

    pub fn check_traceability(&self, text: &str) -> TraceabilityVerdict {
        check_traceability(text)
    }

    // ── Catalog queries ───────────────────────────────────────────────────────

    pub fn list(&self) -> Vec<IndicatorInfo> {
        self.catalog.all().iter().map(IndicatorInfo::from).collect()
    }

    pub fn search(&self, query: &str, limit: usize) -> Vec<IndicatorInfo> {
        self.catalog
            .search(query, limit)
            .into_iter()
            .map(IndicatorInfo::from)
            .collect()
    }

    /// Dimensions exposed by one indicator.
    ///
    /// # Errors
    ///
    /// [`ApplicationError::IndicatorNotFound`] with suggestions attached.
    pub fn dimensions_of(&self, code: &str) -> GuardResult<Vec<DimensionInfo>> {
        match self.catalog.dimensions_of(code) {
            Some(specs) => Ok(specs.into_iter().map(DimensionInfo::from).collect()),
            None => Err(ApplicationError::IndicatorNotFound {
                code: code.to_string(),
                suggestions: self
                    .suggest(code, self.policy.suggestion_limit)
                    .into_iter()
                    .map(IndicatorCode::into_string)
                    .collect(),
            }
            .into()),
        }
    }

    /// Split a natural-language query into indicator words and breakdowns.
    pub fn analyze_query(&self, text: &str) -> QueryAnalysis {
        analyze_query(self.catalog.dimensions(), text)
    }
}
