//! "Did you mean" ranking over the catalog.
//!
//! Ranking is a pure function behind [`SuggestionRanker`] so callers can swap
//! the heuristic without touching the validator.

use std::cmp::Ordering;

use serde::Serialize;
use strsim::levenshtein;

use crate::domain::catalog::Catalog;
use crate::domain::normalize::normalize;
use crate::domain::value_objects::IndicatorCode;

/// Default edit-distance bound.
pub const DEFAULT_MAX_DISTANCE: usize = 2;

/// Codes shorter than this are too generic to count as "embedded" in the input.
const MIN_EMBEDDED_CODE_LEN: usize = 4;

/// Why a code was suggested. Variants are ordered best-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// The input is contained in the code or its display name.
    Contains,
    /// The code is contained in the input (`POBLACION_ISLA` → `POBLACION`).
    Embedded,
    /// Within the edit-distance bound.
    EditDistance,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub code: IndicatorCode,
    pub kind: MatchKind,
    pub distance: usize,
}

impl Suggestion {
    fn rank_cmp(&self, other: &Self) -> Ordering {
        self.kind
            .cmp(&other.kind)
            .then(self.distance.cmp(&other.distance))
            .then_with(|| self.code.cmp(&other.code))
    }
}

/// Produces ranked candidate codes for an unresolvable input.
pub trait SuggestionRanker: Send + Sync {
    /// At most `limit` suggestions, best first. Must be deterministic.
    fn rank(&self, catalog: &Catalog, input: &str, limit: usize) -> Vec<Suggestion>;
}

/// Substring containment first, then Levenshtein distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditDistanceRanker {
    pub max_distance: usize,
}

impl EditDistanceRanker {
    pub const fn new(max_distance: usize) -> Self {
        Self { max_distance }
    }
}

impl Default for EditDistanceRanker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DISTANCE)
    }
}

impl SuggestionRanker for EditDistanceRanker {
    fn rank(&self, catalog: &Catalog, input: &str, limit: usize) -> Vec<Suggestion> {
        let key = normalize(input);
        if key.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut found: Vec<Suggestion> = catalog
            .all()
            .iter()
            .filter_map(|entry| {
                let code = entry.code().as_str();
                let distance = levenshtein(&key, code);
                let kind = if code.contains(&key) || normalize(entry.display_name()).contains(&key)
                {
                    MatchKind::Contains
                } else if code.len() >= MIN_EMBEDDED_CODE_LEN && key.contains(code) {
                    MatchKind::Embedded
                } else if distance <= self.max_distance {
                    MatchKind::EditDistance
                } else {
                    return None;
                };
                Some(Suggestion {
                    code: entry.code().clone(),
                    kind,
                    distance,
                })
            })
            .collect();

        found.sort_by(Suggestion::rank_cmp);
        found.truncate(limit);
        found
    }
}

/// Suggest up to `limit` catalog codes for `input` with the default ranker.
pub fn suggest(catalog: &Catalog, input: &str, limit: usize) -> Vec<IndicatorCode> {
    EditDistanceRanker::default()
        .rank(catalog, input, limit)
        .into_iter()
        .map(|s| s.code)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{CatalogRecord, DimensionRegistry, DimensionSpec};

    fn catalog() -> Catalog {
        let registry = DimensionRegistry::new(vec![
            DimensionSpec::new("geo", "Territorio")
                .with_aliases(["isla"])
                .with_values(["ISLANDS"]),
        ])
        .unwrap();
        Catalog::build(
            vec![
                CatalogRecord::new("POBLACION", "Población"),
                CatalogRecord::new("POBLACION_HOMBRES", "Población de hombres"),
                CatalogRecord::new("POBLACION_MUJERES", "Población de mujeres"),
                CatalogRecord::new("TASA_PARO", "Tasa de paro registrado"),
                CatalogRecord::new("TURISTAS", "Turistas recibidos"),
                CatalogRecord::new("PIB", "Producto interior bruto"),
            ],
            registry,
        )
        .unwrap()
    }

    fn codes(found: Vec<IndicatorCode>) -> Vec<String> {
        found.into_iter().map(IndicatorCode::into_string).collect()
    }

    #[test]
    fn containment_ranks_first_then_lexical() {
        let c = catalog();
        assert_eq!(
            codes(suggest(&c, "poblacion", 5)),
            ["POBLACION", "POBLACION_HOMBRES", "POBLACION_MUJERES"]
        );
    }

    #[test]
    fn display_name_containment_counts() {
        let c = catalog();
        assert_eq!(codes(suggest(&c, "paro registrado", 5)), ["TASA_PARO"]);
    }

    #[test]
    fn embedded_code_is_suggested() {
        let c = catalog();
        let found = EditDistanceRanker::default().rank(&c, "POBLACION_ISLA", 5);
        assert_eq!(found[0].code, "POBLACION");
        assert_eq!(found[0].kind, MatchKind::Embedded);
    }

    #[test]
    fn short_codes_are_not_embedded_matches() {
        let c = catalog();
        assert!(suggest(&c, "PIBE_CANARIO", 5).is_empty());
    }

    #[test]
    fn typos_within_distance() {
        let c = catalog();
        assert_eq!(codes(suggest(&c, "TURISTS", 5)), ["TURISTAS"]);
        assert_eq!(codes(suggest(&c, "TASA_PAROS", 5)), ["TASA_PARO"]);
        assert!(suggest(&c, "ALTURA_MONTANA", 5).is_empty());
    }

    #[test]
    fn limit_is_respected() {
        let c = catalog();
        assert_eq!(suggest(&c, "poblacion", 2).len(), 2);
        assert!(suggest(&c, "poblacion", 0).is_empty());
    }

    #[test]
    fn empty_input_yields_nothing() {
        let c = catalog();
        assert!(suggest(&c, "", 5).is_empty());
        assert!(suggest(&c, "  ¿? ", 5).is_empty());
    }

    #[test]
    fn custom_distance_bound() {
        let c = catalog();
        let strict = EditDistanceRanker::new(0);
        assert!(strict.rank(&c, "TURISTS", 5).is_empty());
    }

    #[test]
    fn every_suggestion_is_justified() {
        let c = catalog();
        let ranker = EditDistanceRanker::default();
        for input in ["pobl", "TASA", "turistaz", "PIB_2020", "xyz"] {
            let key = normalize(input);
            for s in ranker.rank(&c, input, 10) {
                let entry = c.get(&s.code).unwrap();
                let justified = s.code.as_str().contains(&key)
                    || normalize(entry.display_name()).contains(&key)
                    || key.contains(s.code.as_str())
                    || s.distance <= ranker.max_distance;
                assert!(justified, "{input} -> {}", s.code);
            }
        }
    }
}
