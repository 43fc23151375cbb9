//! Catalog rows: the raw [`CatalogRecord`] a source yields and the
//! validated [`CatalogEntry`] the catalog stores.

use serde::Serialize;

use crate::domain::value_objects::{IndicatorCode, IndicatorStatus};

// ── CatalogRecord ─────────────────────────────────────────────────────────────

/// One row as read from a catalog source, before any consistency checks.
///
/// `dimensions: None` means the source did not say; the catalog then applies
/// the registry's default dimension set. `location` is used in load errors
/// (`catalog.tsv:12`, `builtin:3`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogRecord {
    pub code: String,
    pub display_name: String,
    pub topic: String,
    pub dimensions: Option<Vec<String>>,
    pub status: Option<String>,
    pub location: String,
}

impl CatalogRecord {
    pub fn new(code: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            display_name: display_name.into(),
            ..Self::default()
        }
    }

    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    pub fn dimensions<I, S>(mut self, dimensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dimensions = Some(dimensions.into_iter().map(Into::into).collect());
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }
}

// ── CatalogEntry ──────────────────────────────────────────────────────────────

/// A validated catalog indicator. Identity is [`code`](Self::code).
///
/// `available_dimensions` holds canonical dimension names in registry order.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    code: IndicatorCode,
    display_name: String,
    topic: String,
    available_dimensions: Vec<String>,
    status: IndicatorStatus,
}

impl CatalogEntry {
    pub(crate) fn new(
        code: IndicatorCode,
        display_name: String,
        topic: String,
        available_dimensions: Vec<String>,
        status: IndicatorStatus,
    ) -> Self {
        Self {
            code,
            display_name,
            topic,
            available_dimensions,
            status,
        }
    }

    pub fn code(&self) -> &IndicatorCode {
        &self.code
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn available_dimensions(&self) -> &[String] {
        &self.available_dimensions
    }

    pub fn status(&self) -> IndicatorStatus {
        self.status
    }

    pub fn is_deprecated(&self) -> bool {
        self.status.is_deprecated()
    }

    /// `true` if the entry exposes the dimension with canonical `name`.
    pub fn exposes(&self, name: &str) -> bool {
        self.available_dimensions.iter().any(|d| d == name)
    }
}

impl PartialEq for CatalogEntry {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for CatalogEntry {}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(code: &str) -> CatalogEntry {
        CatalogEntry::new(
            IndicatorCode::parse(code).unwrap(),
            "Población".into(),
            "Demografía".into(),
            vec!["geo".into(), "time".into()],
            IndicatorStatus::Active,
        )
    }

    #[test]
    fn identity_is_the_code() {
        let a = entry("POBLACION");
        let mut b = entry("POBLACION");
        b.display_name = "Otro título".into();
        assert_eq!(a, b);
        assert_ne!(a, entry("TASA_PARO"));
    }

    #[test]
    fn exposes_checks_canonical_names() {
        let e = entry("POBLACION");
        assert!(e.exposes("geo"));
        assert!(!e.exposes("sex"));
        assert!(!e.exposes("GEO"));
    }

    #[test]
    fn record_builder_sets_fields() {
        let r = CatalogRecord::new("tasa_paro", "Tasa de paro")
            .topic("Trabajo")
            .dimensions(["geo", "sex"])
            .status("deprecated")
            .at("catalog.tsv:4");
        assert_eq!(r.topic, "Trabajo");
        assert_eq!(r.dimensions.as_deref(), Some(&["geo".to_string(), "sex".to_string()][..]));
        assert_eq!(r.status.as_deref(), Some("deprecated"));
        assert_eq!(r.location, "catalog.tsv:4");
    }
}
