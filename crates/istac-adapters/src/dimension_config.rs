//! TOML dimension definitions.
//!
//! # `dimensions.toml` format
//!
//! ```toml
//! default_dimensions = ["geo", "time"]   # optional
//!
//! [[dimension]]
//! name    = "geo"
//! label   = "Territorio"                 # optional, defaults to name
//! aliases = ["isla", "islas", "municipio"]
//! values  = ["REGIONS", "ISLANDS", "MUNICIPALITIES"]
//!
//! [dimension.value_aliases]
//! I = "ISLANDS"
//! M = "MUNICIPALITIES"
//!
//! [[dimension.patterns]]
//! kind = "numeric_range"                 # numeric_range | period
//! min  = 35001
//! max  = 38999
//! ```

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::{debug, instrument, warn};

use istac_core::{
    application::ports::DimensionSource,
    domain::{CatalogLoadError, DimensionRegistry, DimensionSpec, ValuePattern},
};

// ── File types ────────────────────────────────────────────────────────────────

/// Deserialised representation of a `dimensions.toml` file.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct DimensionFile {
    #[serde(default)]
    pub default_dimensions: Vec<String>,
    #[serde(default, rename = "dimension")]
    pub dimensions: Vec<DimensionEntry>,
}

/// One `[[dimension]]` table.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct DimensionEntry {
    pub name: String,
    pub label: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub value_aliases: BTreeMap<String, String>,
    #[serde(default)]
    pub patterns: Vec<ValuePattern>,
}

impl DimensionEntry {
    fn into_spec(self) -> DimensionSpec {
        let label = self.label.unwrap_or_else(|| self.name.clone());
        let mut spec = DimensionSpec::new(&self.name, label)
            .with_aliases(self.aliases)
            .with_values(self.values);
        for (alias, value) in self.value_aliases {
            spec = spec.with_value_alias(alias, value);
        }
        for pattern in self.patterns {
            spec = spec.with_pattern(pattern);
        }
        spec
    }
}

impl DimensionFile {
    /// Build a validated registry from the parsed file.
    pub fn into_registry(self) -> Result<DimensionRegistry, CatalogLoadError> {
        let specs = self
            .dimensions
            .into_iter()
            .map(DimensionEntry::into_spec)
            .collect();
        DimensionRegistry::new(specs)?.with_default_dimensions(self.default_dimensions)
    }
}

// ── Source ────────────────────────────────────────────────────────────────────

/// Dimension source backed by a `dimensions.toml` file.
#[derive(Debug, Clone)]
pub struct TomlDimensionSource {
    path: PathBuf,
}

impl TomlDimensionSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse TOML text. `origin` is used as the error location.
    pub fn parse(raw: &str, origin: &str) -> Result<DimensionRegistry, CatalogLoadError> {
        let file: DimensionFile = toml::from_str(raw).map_err(|e| CatalogLoadError::Malformed {
            location: origin.to_string(),
            reason: e.to_string(),
        })?;

        if file.dimensions.is_empty() {
            warn!(origin, "no [[dimension]] tables defined");
        }

        file.into_registry()
    }
}

impl DimensionSource for TomlDimensionSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn registry(&self) -> Result<DimensionRegistry, CatalogLoadError> {
        if !self.path.exists() {
            return Err(CatalogLoadError::SourceNotFound {
                path: self.path.clone(),
            });
        }

        let raw = fs::read_to_string(&self.path).map_err(|e| CatalogLoadError::Io {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        let registry = Self::parse(&raw, &self.describe())?;
        debug!(count = registry.len(), "loaded dimension definitions");
        Ok(registry)
    }
}
