//! Natural-language query analysis.
//!
//! Splits a user question into the part that names an indicator and the
//! breakdown dimensions it asks for, so that `"población por isla"` becomes
//! a request for `población` filtered by `geo` rather than a search for a
//! non-existent `POBLACION_ISLA` indicator.

use serde::Serialize;

use crate::domain::entities::DimensionRegistry;
use crate::domain::normalize::normalize;

/// Words that introduce a breakdown, normalized.
const BREAKDOWN_MARKERS: &[&str] = &[
    "POR",
    "SEGUN",
    "DESGLOSADO",
    "DESGLOSADA",
    "DESAGREGADO",
    "DESAGREGADA",
    "DISTRIBUIDO",
    "DISTRIBUIDA",
];

/// Words that join two dimension terms inside a breakdown.
const CONNECTORS: &[&str] = &["Y", "E", "O"];

/// Longest multi-word alias considered (`grupos de edad`).
const MAX_TERM_WORDS: usize = 3;

/// A dimension mentioned in the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectedDimension {
    /// The words as written (`isla`, `grupo de edad`).
    pub term: String,
    /// Canonical names the term resolves to.
    pub dimensions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryAnalysis {
    pub original_query: String,
    /// The query with dimension terms and breakdown phrases removed.
    pub indicator_query: String,
    pub dimensions: Vec<DetectedDimension>,
    pub has_breakdown: bool,
    /// First breakdown phrase found (`por isla y sexo`), empty if none.
    pub breakdown_phrase: String,
}

impl QueryAnalysis {
    /// Distinct canonical dimension names, first-seen order.
    pub fn dimension_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in self.dimensions.iter().flat_map(|d| &d.dimensions) {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
        names
    }
}

pub fn analyze_query(registry: &DimensionRegistry, text: &str) -> QueryAnalysis {
    let words: Vec<&str> = text.split_whitespace().collect();
    let keys: Vec<String> = words.iter().map(|w| normalize(w)).collect();
    let mut consumed = vec![false; words.len()];
    let mut dimensions: Vec<DetectedDimension> = Vec::new();
    let mut breakdown: Option<(usize, usize)> = None;

    let mut i = 0;
    while i < words.len() {
        if let Some((len, specs)) = term_at(registry, &keys, i) {
            record_term(&words, &mut dimensions, &mut consumed, i, len, specs);
            i += len;
            continue;
        }

        if is_marker(&keys[i]) {
            let mut j = i + 1;
            while j < words.len() && is_marker(&keys[j]) {
                j += 1;
            }
            if term_at(registry, &keys, j).is_some() {
                consumed[i..j].fill(true);
                let mut k = j;
                loop {
                    if let Some((len, specs)) = term_at(registry, &keys, k) {
                        record_term(&words, &mut dimensions, &mut consumed, k, len, specs);
                        k += len;
                    } else if k < words.len()
                        && CONNECTORS.contains(&keys[k].as_str())
                        && term_at(registry, &keys, k + 1).is_some()
                    {
                        consumed[k] = true;
                        k += 1;
                    } else {
                        break;
                    }
                }
                breakdown.get_or_insert((i, k));
                i = k;
                continue;
            }
        }

        i += 1;
    }

    let indicator_query = words
        .iter()
        .zip(&consumed)
        .filter(|(_, used)| !**used)
        .map(|(w, _)| *w)
        .collect::<Vec<_>>()
        .join(" ");

    let breakdown_phrase = breakdown
        .map(|(start, end)| {
            words[start..end]
                .iter()
                .map(|w| trim_punctuation(w))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();

    QueryAnalysis {
        original_query: text.to_string(),
        indicator_query: trim_punctuation(&indicator_query).to_string(),
        dimensions,
        has_breakdown: breakdown.is_some(),
        breakdown_phrase,
    }
}

fn record_term(
    words: &[&str],
    dimensions: &mut Vec<DetectedDimension>,
    consumed: &mut [bool],
    start: usize,
    len: usize,
    specs: Vec<String>,
) {
    consumed[start..start + len].fill(true);
    let term = words[start..start + len]
        .iter()
        .map(|w| trim_punctuation(w))
        .collect::<Vec<_>>()
        .join(" ");
    let key = normalize(&term);
    if !dimensions.iter().any(|d| normalize(&d.term) == key) {
        dimensions.push(DetectedDimension {
            term,
            dimensions: specs,
        });
    }
}

/// Longest dimension name or alias starting at word `start`.
///
/// Words that normalize to nothing (`—`, `...`) never take part in a term.
fn term_at(registry: &DimensionRegistry, keys: &[String], start: usize) -> Option<(usize, Vec<String>)> {
    (1..=MAX_TERM_WORDS)
        .rev()
        .filter(|len| start + len <= keys.len())
        .filter(|len| keys[start..start + len].iter().all(|k| !k.is_empty()))
        .find_map(|len| {
            let specs = registry.resolve(&keys[start..start + len].join("_"));
            (!specs.is_empty())
                .then(|| (len, specs.iter().map(|s| s.name().to_string()).collect()))
        })
}

fn is_marker(key: &str) -> bool {
    BREAKDOWN_MARKERS.contains(&key)
}

fn trim_punctuation(word: &str) -> &str {
    word.trim_matches(|c: char| !c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{DimensionSpec, ValuePattern};

    fn registry() -> DimensionRegistry {
        DimensionRegistry::new(vec![
            DimensionSpec::new("geo", "Territorio")
                .with_aliases(["isla", "islas", "municipio", "municipios"])
                .with_values(["ISLANDS"]),
            DimensionSpec::new("sex", "Sexo")
                .with_aliases(["sexo", "género", "hombres", "mujeres"])
                .with_values(["F", "M"]),
            DimensionSpec::new("age", "Edad")
                .with_aliases(["edad", "grupo de edad", "grupos de edad"])
                .with_values(["Y0T14"]),
            DimensionSpec::new("time", "Periodo")
                .with_aliases(["año", "trimestre"])
                .with_pattern(ValuePattern::Period),
        ])
        .unwrap()
    }

    #[test]
    fn splits_indicator_from_breakdown() {
        let analysis = analyze_query(&registry(), "población por isla");
        assert_eq!(analysis.indicator_query, "población");
        assert_eq!(analysis.dimension_names(), ["geo"]);
        assert_eq!(analysis.dimensions[0].term, "isla");
        assert!(analysis.has_breakdown);
        assert_eq!(analysis.breakdown_phrase, "por isla");
    }

    #[test]
    fn breakdown_with_several_dimensions() {
        let analysis = analyze_query(&registry(), "Tasa de paro según sexo y grupo de edad");
        assert_eq!(analysis.indicator_query, "Tasa de paro");
        assert_eq!(analysis.dimension_names(), ["sex", "age"]);
        assert_eq!(analysis.dimensions[1].term, "grupo de edad");
        assert_eq!(analysis.breakdown_phrase, "según sexo y grupo de edad");
    }

    #[test]
    fn marker_chain_and_punctuation() {
        let analysis = analyze_query(&registry(), "¿turistas desglosado por municipios?");
        assert_eq!(analysis.indicator_query, "turistas");
        assert_eq!(analysis.breakdown_phrase, "desglosado por municipios");
    }

    #[test]
    fn marker_without_dimension_stays_in_query() {
        let analysis = analyze_query(&registry(), "gasto por turista");
        assert_eq!(analysis.indicator_query, "gasto por turista");
        assert!(!analysis.has_breakdown);
        assert!(analysis.dimensions.is_empty());
        assert!(analysis.breakdown_phrase.is_empty());
    }

    #[test]
    fn loose_dimension_terms_are_detected_without_breakdown() {
        let analysis = analyze_query(&registry(), "población de mujeres");
        assert_eq!(analysis.dimension_names(), ["sex"]);
        assert!(!analysis.has_breakdown);
        assert_eq!(analysis.indicator_query, "población de");
    }

    #[test]
    fn repeated_terms_are_reported_once() {
        let analysis = analyze_query(&registry(), "población por isla, isla");
        assert_eq!(analysis.dimensions.len(), 1);
    }

    #[test]
    fn punctuation_words_are_not_part_of_a_term() {
        let analysis = analyze_query(&registry(), "población — isla");
        assert_eq!(analysis.dimensions.len(), 1);
        assert_eq!(analysis.dimensions[0].term, "isla");
        assert_eq!(analysis.indicator_query, "población");

        let analysis = analyze_query(&registry(), "paro ... grupo de edad");
        assert_eq!(analysis.dimensions[0].term, "grupo de edad");
        assert_eq!(analysis.indicator_query, "paro");
    }

    #[test]
    fn empty_query() {
        let analysis = analyze_query(&registry(), "   ");
        assert!(analysis.indicator_query.is_empty());
        assert!(!analysis.has_breakdown);
    }
}
