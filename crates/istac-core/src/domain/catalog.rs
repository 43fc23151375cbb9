//! The indicator catalog: an immutable, indexed set of [`CatalogEntry`].
//!
//! A [`Catalog`] is built once from [`CatalogRecord`]s and a
//! [`DimensionRegistry`] and never changes afterwards. It holds no interior
//! mutability, so it is `Send + Sync` and can be shared through an `Arc`.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::domain::entities::{CatalogEntry, CatalogRecord, DimensionRegistry, DimensionSpec};
use crate::domain::error::CatalogLoadError;
use crate::domain::normalize::normalize;
use crate::domain::value_objects::{IndicatorCode, IndicatorStatus};

#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    index: HashMap<IndicatorCode, usize>,
    registry: DimensionRegistry,
}

impl Catalog {
    /// Validate `records` against `registry` and index them.
    ///
    /// # Errors
    ///
    /// - [`CatalogLoadError::Empty`] if there are no records
    /// - [`CatalogLoadError::Malformed`] for an empty code or unreadable status
    /// - [`CatalogLoadError::DuplicateCode`] if two codes normalize to the same key
    /// - [`CatalogLoadError::NamespaceCollision`] if a code is a dimension name or alias
    /// - [`CatalogLoadError::UnknownDimension`] if a record lists an undeclared dimension
    pub fn build(
        records: Vec<CatalogRecord>,
        registry: DimensionRegistry,
    ) -> Result<Self, CatalogLoadError> {
        if records.is_empty() {
            return Err(CatalogLoadError::Empty);
        }

        let mut entries = Vec::with_capacity(records.len());
        let mut index: HashMap<IndicatorCode, usize> = HashMap::with_capacity(records.len());
        let mut locations: Vec<String> = Vec::with_capacity(records.len());

        for record in records {
            let code = IndicatorCode::parse(&record.code).ok_or_else(|| {
                CatalogLoadError::Malformed {
                    location: record.location.clone(),
                    reason: "empty indicator code".into(),
                }
            })?;

            if let Some(&first) = index.get(&code) {
                return Err(CatalogLoadError::DuplicateCode {
                    code: code.into_string(),
                    first: locations[first].clone(),
                    second: record.location,
                });
            }

            if registry.is_dimension_name(code.as_str()) {
                return Err(CatalogLoadError::NamespaceCollision {
                    name: code.into_string(),
                });
            }

            let status = match record.status.as_deref() {
                None => IndicatorStatus::Active,
                Some(raw) => raw
                    .parse::<IndicatorStatus>()
                    .map_err(|reason| CatalogLoadError::Malformed {
                        location: record.location.clone(),
                        reason,
                    })?,
            };

            let dimensions = match &record.dimensions {
                Some(listed) => canonical_dimensions(&registry, &code, listed)?,
                None => registry.default_dimensions().to_vec(),
            };

            let display_name = if record.display_name.trim().is_empty() {
                code.to_string()
            } else {
                record.display_name.trim().to_string()
            };

            index.insert(code.clone(), entries.len());
            locations.push(record.location);
            entries.push(CatalogEntry::new(
                code,
                display_name,
                record.topic.trim().to_string(),
                dimensions,
                status,
            ));
        }

        debug!(
            indicators = entries.len(),
            dimensions = registry.len(),
            "catalog indexed"
        );

        Ok(Self {
            entries,
            index,
            registry,
        })
    }

    /// Exact lookup after normalization.
    pub fn lookup(&self, code: &str) -> Option<&CatalogEntry> {
        self.index
            .get(normalize(code).as_str())
            .map(|&i| &self.entries[i])
    }

    pub fn get(&self, code: &IndicatorCode) -> Option<&CatalogEntry> {
        self.index.get(code).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, code: &str) -> bool {
        self.lookup(code).is_some()
    }

    /// Entries in source order.
    pub fn all(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimensions(&self) -> &DimensionRegistry {
        &self.registry
    }

    /// Specs exposed by one indicator, in registry order.
    pub fn dimensions_of(&self, code: &str) -> Option<Vec<&DimensionSpec>> {
        let entry = self.lookup(code)?;
        Some(
            self.registry
                .iter()
                .filter(|spec| entry.exposes(spec.name()))
                .collect(),
        )
    }

    /// Case- and accent-insensitive containment over code, display name and
    /// topic. An empty query matches everything.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&CatalogEntry> {
        let needle = normalize(query);
        self.entries
            .iter()
            .filter(|e| {
                needle.is_empty()
                    || e.code().as_str().contains(&needle)
                    || normalize(e.display_name()).contains(&needle)
                    || normalize(e.topic()).contains(&needle)
            })
            .take(limit)
            .collect()
    }

    /// Distinct non-empty topics in first-seen order.
    pub fn topics(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .map(CatalogEntry::topic)
            .filter(|t| !t.is_empty() && seen.insert(*t))
            .collect()
    }
}

/// Map listed names (canonical or alias) to canonical names in registry order.
fn canonical_dimensions(
    registry: &DimensionRegistry,
    code: &IndicatorCode,
    listed: &[String],
) -> Result<Vec<String>, CatalogLoadError> {
    let mut wanted = HashSet::new();
    for raw in listed.iter().filter(|d| !d.trim().is_empty()) {
        let spec = match registry.get(raw) {
            Some(spec) => spec,
            None => match registry.resolve(raw).as_slice() {
                [single] => *single,
                _ => {
                    return Err(CatalogLoadError::UnknownDimension {
                        code: code.to_string(),
                        dimension: raw.trim().to_string(),
                    });
                }
            },
        };
        wanted.insert(spec.name());
    }

    Ok(registry
        .iter()
        .filter(|spec| wanted.contains(spec.name()))
        .map(|spec| spec.name().to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ValuePattern;

    fn registry() -> DimensionRegistry {
        DimensionRegistry::new(vec![
            DimensionSpec::new("geo", "Territorio")
                .with_aliases(["isla", "municipio"])
                .with_values(["ISLANDS", "MUNICIPALITIES"]),
            DimensionSpec::new("sex", "Sexo")
                .with_aliases(["sexo"])
                .with_values(["F", "M", "_T"]),
            DimensionSpec::new("time", "Periodo").with_pattern(ValuePattern::Period),
        ])
        .unwrap()
        .with_default_dimensions(["geo", "time"])
        .unwrap()
    }

    fn records() -> Vec<CatalogRecord> {
        vec![
            CatalogRecord::new("POBLACION", "Población")
                .topic("Demografía")
                .dimensions(["time", "sexo", "geo"])
                .at("t:2"),
            CatalogRecord::new("tasa_paro", "Tasa de paro")
                .topic("Trabajo")
                .at("t:3"),
            CatalogRecord::new("AFILIADOS", "Afiliados a la Seguridad Social")
                .topic("Trabajo")
                .status("obsoleto")
                .at("t:4"),
        ]
    }

    #[test]
    fn builds_and_looks_up_by_normalized_key() {
        let catalog = Catalog::build(records(), registry()).unwrap();
        assert_eq!(catalog.len(), 3);
        assert!(catalog.lookup("población").is_some());
        assert!(catalog.lookup("Tasa paro").is_some());
        assert!(catalog.lookup("PARO").is_none());
        assert_eq!(catalog.all()[1].code(), "TASA_PARO");
    }

    #[test]
    fn listed_dimensions_are_canonical_and_ordered() {
        let catalog = Catalog::build(records(), registry()).unwrap();
        let entry = catalog.lookup("POBLACION").unwrap();
        assert_eq!(entry.available_dimensions(), ["geo", "sex", "time"]);
    }

    #[test]
    fn unlisted_dimensions_get_defaults() {
        let catalog = Catalog::build(records(), registry()).unwrap();
        let entry = catalog.lookup("TASA_PARO").unwrap();
        assert_eq!(entry.available_dimensions(), ["geo", "time"]);
    }

    #[test]
    fn status_is_parsed() {
        let catalog = Catalog::build(records(), registry()).unwrap();
        assert!(catalog.lookup("AFILIADOS").unwrap().is_deprecated());
        assert!(!catalog.lookup("POBLACION").unwrap().is_deprecated());
    }

    #[test]
    fn empty_source_fails() {
        assert_eq!(
            Catalog::build(Vec::new(), registry()).unwrap_err(),
            CatalogLoadError::Empty
        );
    }

    #[test]
    fn duplicate_after_normalization_fails() {
        let mut recs = records();
        recs.push(CatalogRecord::new("Población", "dup").at("t:9"));
        let err = Catalog::build(recs, registry()).unwrap_err();
        assert_eq!(
            err,
            CatalogLoadError::DuplicateCode {
                code: "POBLACION".into(),
                first: "t:2".into(),
                second: "t:9".into(),
            }
        );
    }

    #[test]
    fn code_colliding_with_dimension_alias_fails() {
        let mut recs = records();
        recs.push(CatalogRecord::new("ISLA", "Isla").at("t:5"));
        let err = Catalog::build(recs, registry()).unwrap_err();
        assert_eq!(err, CatalogLoadError::NamespaceCollision { name: "ISLA".into() });
    }

    #[test]
    fn undeclared_dimension_fails() {
        let recs = vec![CatalogRecord::new("POBLACION", "").dimensions(["altitude"])];
        let err = Catalog::build(recs, registry()).unwrap_err();
        assert!(matches!(err, CatalogLoadError::UnknownDimension { .. }));
    }

    #[test]
    fn blank_code_is_malformed() {
        let recs = vec![CatalogRecord::new("  ", "Nada").at("t:7")];
        let err = Catalog::build(recs, registry()).unwrap_err();
        assert!(matches!(err, CatalogLoadError::Malformed { location, .. } if location == "t:7"));
    }

    #[test]
    fn unreadable_status_is_malformed() {
        let recs = vec![CatalogRecord::new("POBLACION", "").status("maybe")];
        assert!(matches!(
            Catalog::build(recs, registry()).unwrap_err(),
            CatalogLoadError::Malformed { .. }
        ));
    }

    #[test]
    fn empty_display_name_falls_back_to_code() {
        let recs = vec![CatalogRecord::new("POBLACION", " ")];
        let catalog = Catalog::build(recs, registry()).unwrap();
        assert_eq!(catalog.all()[0].display_name(), "POBLACION");
    }

    #[test]
    fn dimensions_of_follows_registry_order() {
        let catalog = Catalog::build(records(), registry()).unwrap();
        let names: Vec<_> = catalog
            .dimensions_of("poblacion")
            .unwrap()
            .iter()
            .map(|s| s.name())
            .collect();
        assert_eq!(names, ["geo", "sex", "time"]);
        assert!(catalog.dimensions_of("NOPE").is_none());
    }

    #[test]
    fn search_matches_code_title_and_topic() {
        let catalog = Catalog::build(records(), registry()).unwrap();
        let codes = |q: &str| -> Vec<String> {
            catalog
                .search(q, 10)
                .iter()
                .map(|e| e.code().to_string())
                .collect()
        };
        assert_eq!(codes("paro"), ["TASA_PARO"]);
        assert_eq!(codes("trabajo"), ["TASA_PARO", "AFILIADOS"]);
        assert_eq!(codes("seguridad social"), ["AFILIADOS"]);
        assert_eq!(catalog.search("", 2).len(), 2);
    }

    #[test]
    fn topics_are_distinct_in_source_order() {
        let catalog = Catalog::build(records(), registry()).unwrap();
        assert_eq!(catalog.topics(), ["Demografía", "Trabajo"]);
    }

    #[test]
    fn catalog_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Catalog>();
    }
}
