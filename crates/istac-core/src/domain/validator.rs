//! Pre-execution validation of indicator requests.
//!
//! [`validate`] turns a raw identifier plus raw filters into either an
//! [`ValidationResult::Accepted`] request with canonical names and values, or
//! a structured rejection that carries suggestions. It never calls out and
//! never mutates the catalog.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use strsim::levenshtein;
use tracing::{debug, warn};

use crate::domain::catalog::Catalog;
use crate::domain::entities::{CatalogEntry, DimensionSpec};
use crate::domain::normalize::normalize;
use crate::domain::resolver::{AttributeKind, CompoundIdentifier, classify, decompose};
use crate::domain::suggest::{EditDistanceRanker, SuggestionRanker};
use crate::domain::value_objects::IndicatorCode;

// ── Request & policy ──────────────────────────────────────────────────────────

/// An identifier and its filters exactly as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationRequest {
    pub raw_identifier: String,
    /// Dimension name → value, in input order.
    pub raw_filters: Vec<(String, String)>,
}

impl ValidationRequest {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            raw_identifier: identifier.into(),
            raw_filters: Vec::new(),
        }
    }

    pub fn with_filter(mut self, dimension: impl Into<String>, value: impl Into<String>) -> Self {
        self.raw_filters.push((dimension.into(), value.into()));
        self
    }
}

/// Limits applied while building rejections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationPolicy {
    pub suggestion_limit: usize,
    pub max_listed_values: usize,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            suggestion_limit: 5,
            max_listed_values: 20,
        }
    }
}

// ── Result ────────────────────────────────────────────────────────────────────

/// Outcome of validating one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ValidationResult {
    Accepted {
        resolved_code: IndicatorCode,
        resolved_filters: BTreeMap<String, String>,
        deprecated: bool,
    },
    RejectedUnknownIndicator {
        input: String,
        suggestions: Vec<IndicatorCode>,
        #[serde(skip_serializing_if = "Option::is_none")]
        decomposition: Option<CompoundIdentifier>,
    },
    RejectedDimensionAsIndicator {
        input: String,
        dimension: String,
        suggestions: Vec<IndicatorCode>,
    },
    RejectedInvalidDimension {
        indicator: IndicatorCode,
        dimension: String,
        suggestions: Vec<String>,
    },
    RejectedInvalidValue {
        dimension: String,
        value: String,
        allowed_values: Vec<String>,
        truncated: bool,
    },
    RejectedAmbiguous {
        input: String,
        candidates: Vec<String>,
    },
}

impl ValidationResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    /// Short machine name of the outcome (matches the serialized tag).
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Accepted { .. } => "accepted",
            Self::RejectedUnknownIndicator { .. } => "rejected_unknown_indicator",
            Self::RejectedDimensionAsIndicator { .. } => "rejected_dimension_as_indicator",
            Self::RejectedInvalidDimension { .. } => "rejected_invalid_dimension",
            Self::RejectedInvalidValue { .. } => "rejected_invalid_value",
            Self::RejectedAmbiguous { .. } => "rejected_ambiguous",
        }
    }

    /// Everything the caller could try instead, as plain strings.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Accepted { .. } => Vec::new(),
            Self::RejectedUnknownIndicator { suggestions, .. }
            | Self::RejectedDimensionAsIndicator { suggestions, .. } => {
                suggestions.iter().map(ToString::to_string).collect()
            }
            Self::RejectedInvalidDimension { suggestions, .. } => suggestions.clone(),
            Self::RejectedInvalidValue { allowed_values, .. } => allowed_values.clone(),
            Self::RejectedAmbiguous { candidates, .. } => candidates.clone(),
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted {
                resolved_code,
                resolved_filters,
                deprecated,
            } => {
                write!(f, "accepted: {resolved_code}")?;
                if !resolved_filters.is_empty() {
                    let filters: Vec<String> = resolved_filters
                        .iter()
                        .map(|(k, v)| format!("{k}={v}"))
                        .collect();
                    write!(f, " [{}]", filters.join(", "))?;
                }
                if *deprecated {
                    f.write_str(" (deprecated indicator)")?;
                }
                Ok(())
            }
            Self::RejectedUnknownIndicator {
                input,
                suggestions,
                decomposition,
            } => {
                write!(f, "'{input}' is not an indicator in the catalog")?;
                if let Some(compound) = decomposition {
                    write!(
                        f,
                        "; it combines indicator {} with dimension(s) {}: request {} and filter by them instead",
                        compound.base,
                        compound.dimension_names().join(", "),
                        compound.base
                    )?;
                }
                write_list(f, "; did you mean", suggestions)
            }
            Self::RejectedDimensionAsIndicator {
                input,
                dimension,
                suggestions,
            } => {
                write!(
                    f,
                    "'{input}' is a dimension ({dimension}), not an indicator; use it as a filter"
                )?;
                write_list(f, " of", suggestions)
            }
            Self::RejectedInvalidDimension {
                indicator,
                dimension,
                suggestions,
            } => {
                write!(f, "indicator {indicator} has no dimension '{dimension}'")?;
                write_list(f, "; available", suggestions)
            }
            Self::RejectedInvalidValue {
                dimension,
                value,
                allowed_values,
                truncated,
            } => {
                write!(f, "'{value}' is not a valid value for dimension {dimension}")?;
                write_list(f, "; allowed", allowed_values)?;
                if *truncated {
                    f.write_str(", ...")?;
                }
                Ok(())
            }
            Self::RejectedAmbiguous { input, candidates } => {
                write!(f, "'{input}' is ambiguous")?;
                write_list(f, "; it may refer to", candidates)
            }
        }
    }
}

fn write_list<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    items: &[T],
) -> fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    let joined: Vec<String> = items.iter().map(ToString::to_string).collect();
    write!(f, "{label}: {}", joined.join(", "))
}

// ── validate ──────────────────────────────────────────────────────────────────

/// Validate `request` against `catalog`.
pub fn validate(
    catalog: &Catalog,
    request: &ValidationRequest,
    ranker: &dyn SuggestionRanker,
    policy: &ValidationPolicy,
) -> ValidationResult {
    let raw = request.raw_identifier.as_str();
    let key = normalize(raw);

    if key.is_empty() {
        return ValidationResult::RejectedUnknownIndicator {
            input: raw.to_string(),
            suggestions: Vec::new(),
            decomposition: None,
        };
    }

    let Some(entry) = catalog.lookup(&key) else {
        return reject_identifier(catalog, raw, &key, ranker, policy);
    };

    let mut resolved_filters = BTreeMap::new();
    for (name, value) in &request.raw_filters {
        match classify(catalog, entry, name) {
            AttributeKind::Dimension(spec) => match spec.resolve_value(value) {
                Some(canonical) => {
                    resolved_filters.insert(spec.name().to_string(), canonical);
                }
                None => return reject_value(spec, value, policy),
            },
            AttributeKind::Ambiguous(specs) => {
                return ValidationResult::RejectedAmbiguous {
                    input: name.clone(),
                    candidates: specs.iter().map(|s| s.name().to_string()).collect(),
                };
            }
            AttributeKind::Indicator(_) | AttributeKind::Unknown => {
                return ValidationResult::RejectedInvalidDimension {
                    indicator: entry.code().clone(),
                    dimension: name.clone(),
                    suggestions: closest_dimensions(catalog, entry, name, policy.suggestion_limit),
                };
            }
        }
    }

    if entry.is_deprecated() {
        warn!(code = %entry.code(), "request uses a deprecated indicator");
    }

    ValidationResult::Accepted {
        resolved_code: entry.code().clone(),
        resolved_filters,
        deprecated: entry.is_deprecated(),
    }
}

/// [`validate`] with the default ranker and policy.
pub fn validate_request(
    catalog: &Catalog,
    identifier: &str,
    filters: &[(String, String)],
) -> ValidationResult {
    let request = ValidationRequest {
        raw_identifier: identifier.to_string(),
        raw_filters: filters.to_vec(),
    };
    validate(
        catalog,
        &request,
        &EditDistanceRanker::default(),
        &ValidationPolicy::default(),
    )
}

fn reject_identifier(
    catalog: &Catalog,
    raw: &str,
    key: &str,
    ranker: &dyn SuggestionRanker,
    policy: &ValidationPolicy,
) -> ValidationResult {
    let registry = catalog.dimensions();

    if registry.is_dimension_name(key) {
        let specs = registry.resolve(key);
        let names: Vec<&str> = specs.iter().map(|s| s.name()).collect();
        let suggestions = catalog
            .all()
            .iter()
            .filter(|e| names.iter().any(|n| e.exposes(n)))
            .take(policy.suggestion_limit)
            .map(|e| e.code().clone())
            .collect();
        debug!(input = raw, dimension = ?names, "dimension used as indicator");
        return ValidationResult::RejectedDimensionAsIndicator {
            input: raw.to_string(),
            dimension: names.join("|"),
            suggestions,
        };
    }

    let decomposition = decompose(catalog, key);
    let mut suggestions: Vec<IndicatorCode> = ranker
        .rank(catalog, key, policy.suggestion_limit)
        .into_iter()
        .map(|s| s.code)
        .collect();

    if let Some(compound) = &decomposition {
        suggestions.retain(|c| c != &compound.base);
        suggestions.insert(0, compound.base.clone());
        suggestions.truncate(policy.suggestion_limit);
        debug!(input = raw, %compound, "compound identifier rejected");
    }

    ValidationResult::RejectedUnknownIndicator {
        input: raw.to_string(),
        suggestions,
        decomposition,
    }
}

fn reject_value(spec: &DimensionSpec, value: &str, policy: &ValidationPolicy) -> ValidationResult {
    let mut allowed_values = spec.allowed_values();
    let truncated = allowed_values.len() > policy.max_listed_values;
    allowed_values.truncate(policy.max_listed_values);
    ValidationResult::RejectedInvalidValue {
        dimension: spec.name().to_string(),
        value: value.to_string(),
        allowed_values,
        truncated,
    }
}

/// Dimensions the entry exposes, closest to `attribute` first.
fn closest_dimensions(
    catalog: &Catalog,
    entry: &CatalogEntry,
    attribute: &str,
    limit: usize,
) -> Vec<String> {
    let key = normalize(attribute);
    let mut ranked: Vec<(usize, &str)> = catalog
        .dimensions()
        .iter()
        .filter(|spec| entry.exposes(spec.name()))
        .map(|spec| {
            let distance = std::iter::once(spec.key())
                .chain(spec.aliases().iter().map(String::as_str))
                .map(|term| levenshtein(&key, term))
                .min()
                .unwrap_or(usize::MAX);
            (distance, spec.name())
        })
        .collect();
    ranked.sort_unstable();
    ranked
        .into_iter()
        .take(limit)
        .map(|(_, name)| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{CatalogRecord, DimensionRegistry, ValuePattern};

    fn catalog() -> Catalog {
        let registry = DimensionRegistry::new(vec![
            DimensionSpec::new("geo", "Territorio")
                .with_aliases(["isla", "islas", "municipio"])
                .with_values(["ISLANDS", "MUNICIPALITIES", "REGIONS"])
                .with_value_alias("I", "ISLANDS")
                .with_value_alias("M", "MUNICIPALITIES")
                .with_pattern(ValuePattern::NumericRange { min: 35001, max: 38999 }),
            DimensionSpec::new("sex", "Sexo")
                .with_aliases(["sexo"])
                .with_values(["F", "M", "T"]),
            DimensionSpec::new("age", "Edad")
                .with_aliases(["edad", "años"])
                .with_values(["Y0T14", "Y15T64", "Y_GE65"]),
            DimensionSpec::new("time", "Periodo")
                .with_aliases(["periodo", "años"])
                .with_pattern(ValuePattern::Period),
        ])
        .unwrap();
        Catalog::build(
            vec![
                CatalogRecord::new("POBLACION", "Población").dimensions(["geo", "sex", "age", "time"]),
                CatalogRecord::new("TASA_PARO", "Tasa de paro").dimensions(["geo", "sex", "time"]),
                CatalogRecord::new("AFILIADOS", "Afiliados")
                    .dimensions(["geo", "time"])
                    .status("deprecated"),
            ],
            registry,
        )
        .unwrap()
    }

    fn run(catalog: &Catalog, request: ValidationRequest) -> ValidationResult {
        validate(
            catalog,
            &request,
            &EditDistanceRanker::default(),
            &ValidationPolicy::default(),
        )
    }

    #[test]
    fn accepts_with_canonical_filters() {
        let c = catalog();
        let result = run(
            &c,
            ValidationRequest::new("población")
                .with_filter("isla", "i")
                .with_filter("periodo", "2023q1"),
        );
        let ValidationResult::Accepted {
            resolved_code,
            resolved_filters,
            deprecated,
        } = result
        else {
            panic!("expected acceptance");
        };
        assert_eq!(resolved_code, "POBLACION");
        assert_eq!(resolved_filters.get("geo").map(String::as_str), Some("ISLANDS"));
        assert_eq!(resolved_filters.get("time").map(String::as_str), Some("2023Q1"));
        assert!(!deprecated);
    }

    #[test]
    fn padded_municipality_code_is_rejected() {
        let c = catalog();
        for padded in ["035001", "0038999", "00000000000000035001"] {
            let result = run(&c, ValidationRequest::new("POBLACION").with_filter("geo", padded));
            assert!(
                matches!(
                    result,
                    ValidationResult::RejectedInvalidValue { ref value, .. } if value == padded
                ),
                "{padded} -> {result}"
            );
        }

        let result = run(&c, ValidationRequest::new("POBLACION").with_filter("geo", "35001"));
        let ValidationResult::Accepted { resolved_filters, .. } = result else {
            panic!("expected acceptance");
        };
        assert_eq!(resolved_filters["geo"], "35001");
    }

    #[test]
    fn last_duplicate_filter_wins() {
        let c = catalog();
        let result = run(
            &c,
            ValidationRequest::new("POBLACION")
                .with_filter("geo", "ISLANDS")
                .with_filter("isla", "REGIONS"),
        );
        let ValidationResult::Accepted { resolved_filters, .. } = result else {
            panic!("expected acceptance");
        };
        assert_eq!(resolved_filters.len(), 1);
        assert_eq!(resolved_filters["geo"], "REGIONS");
    }

    #[test]
    fn deprecated_entries_are_flagged_but_accepted() {
        let c = catalog();
        let result = run(&c, ValidationRequest::new("AFILIADOS"));
        assert!(matches!(result, ValidationResult::Accepted { deprecated: true, .. }));
    }

    #[test]
    fn empty_identifier_is_unknown_without_suggestions() {
        let c = catalog();
        assert_eq!(
            run(&c, ValidationRequest::new("  ")),
            ValidationResult::RejectedUnknownIndicator {
                input: "  ".into(),
                suggestions: Vec::new(),
                decomposition: None,
            }
        );
    }

    #[test]
    fn compound_is_rejected_with_base_first() {
        let c = catalog();
        let result = run(&c, ValidationRequest::new("POBLACION_ISLA"));
        let ValidationResult::RejectedUnknownIndicator {
            suggestions,
            decomposition,
            ..
        } = &result
        else {
            panic!("expected unknown indicator, got {result:?}");
        };
        assert_eq!(suggestions[0], "POBLACION");
        assert_eq!(decomposition.as_ref().unwrap().dimension_names(), ["geo"]);
        assert!(result.to_string().contains("request POBLACION and filter"));
    }

    #[test]
    fn dimension_name_as_indicator() {
        let c = catalog();
        let result = run(&c, ValidationRequest::new("sexo"));
        assert_eq!(
            result,
            ValidationResult::RejectedDimensionAsIndicator {
                input: "sexo".into(),
                dimension: "sex".into(),
                suggestions: vec![
                    IndicatorCode::parse("POBLACION").unwrap(),
                    IndicatorCode::parse("TASA_PARO").unwrap(),
                ],
            }
        );
    }

    #[test]
    fn dimension_value_alone_is_unknown_indicator() {
        let c = catalog();
        let result = run(&c, ValidationRequest::new("ISLANDS"));
        assert!(matches!(result, ValidationResult::RejectedUnknownIndicator { .. }));
    }

    #[test]
    fn filter_not_exposed_suggests_exposed_dimensions() {
        let c = catalog();
        let result = run(&c, ValidationRequest::new("AFILIADOS").with_filter("sexo", "F"));
        let ValidationResult::RejectedInvalidDimension {
            indicator,
            dimension,
            suggestions,
        } = result
        else {
            panic!("expected invalid dimension");
        };
        assert_eq!(indicator, "AFILIADOS");
        assert_eq!(dimension, "sexo");
        assert_eq!(suggestions.len(), 2);
        assert!(suggestions.iter().all(|s| s == "geo" || s == "time"));
    }

    #[test]
    fn indicator_used_as_filter_is_invalid_dimension() {
        let c = catalog();
        let result = run(&c, ValidationRequest::new("POBLACION").with_filter("TASA_PARO", "1"));
        assert!(matches!(result, ValidationResult::RejectedInvalidDimension { .. }));
    }

    #[test]
    fn invalid_value_lists_allowed() {
        let c = catalog();
        let result = run(&c, ValidationRequest::new("POBLACION").with_filter("sex", "X"));
        assert_eq!(
            result,
            ValidationResult::RejectedInvalidValue {
                dimension: "sex".into(),
                value: "X".into(),
                allowed_values: vec!["F".into(), "M".into(), "T".into()],
                truncated: false,
            }
        );
    }

    #[test]
    fn allowed_values_are_truncated() {
        let c = catalog();
        let policy = ValidationPolicy {
            max_listed_values: 2,
            ..ValidationPolicy::default()
        };
        let request = ValidationRequest::new("POBLACION").with_filter("geo", "CONTINENTS");
        let result = validate(&c, &request, &EditDistanceRanker::default(), &policy);
        let ValidationResult::RejectedInvalidValue {
            allowed_values,
            truncated,
            ..
        } = result
        else {
            panic!("expected invalid value");
        };
        assert_eq!(allowed_values, ["ISLANDS", "MUNICIPALITIES"]);
        assert!(truncated);
    }

    #[test]
    fn shared_alias_filter_is_ambiguous() {
        let c = catalog();
        let result = run(&c, ValidationRequest::new("POBLACION").with_filter("años", "2020"));
        assert_eq!(
            result,
            ValidationResult::RejectedAmbiguous {
                input: "años".into(),
                candidates: vec!["age".into(), "time".into()],
            }
        );

        let result = run(&c, ValidationRequest::new("TASA_PARO").with_filter("años", "2020"));
        assert!(result.is_accepted());
    }

    #[test]
    fn results_serialize_with_outcome_tag() {
        let c = catalog();
        let result = run(&c, ValidationRequest::new("POBLACION").with_filter("geo", "35016"));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["outcome"], "accepted");
        assert_eq!(json["resolved_code"], "POBLACION");
        assert_eq!(json["resolved_filters"]["geo"], "35016");

        let json = serde_json::to_value(run(&c, ValidationRequest::new("XYZ"))).unwrap();
        assert_eq!(json["outcome"], "rejected_unknown_indicator");
        assert!(json.get("decomposition").is_none());
    }

    #[test]
    fn outcome_matches_serialized_tag() {
        let c = catalog();
        for request in [
            ValidationRequest::new("POBLACION"),
            ValidationRequest::new("isla"),
            ValidationRequest::new("POBLACION").with_filter("sex", "Q"),
        ] {
            let result = run(&c, request);
            let json = serde_json::to_value(&result).unwrap();
            assert_eq!(json["outcome"], result.outcome());
        }
    }

    #[test]
    fn convenience_entry_point_uses_defaults() {
        let c = catalog();
        let filters = vec![("geo".to_string(), "M".to_string())];
        assert!(validate_request(&c, "tasa paro", &filters).is_accepted());
    }
}
