//! Driven (output) ports - implemented by infrastructure.
//!
//! Both ports are read once, synchronously, at startup.

use crate::domain::{CatalogLoadError, CatalogRecord, DimensionRegistry};

/// Port for the authoritative indicator table.
///
/// Implemented by:
/// - `istac_adapters::TsvCatalogSource` (tab-separated export)
/// - `istac_adapters::BuiltinCatalogSource` (compiled-in table)
#[cfg_attr(test, mockall::automock)]
pub trait CatalogSource: Send + Sync {
    /// Human-readable origin, used in logs (`catalog.tsv`, `builtin`).
    fn describe(&self) -> String;

    /// Every row in source order. Consistency checks happen later.
    fn records(&self) -> Result<Vec<CatalogRecord>, CatalogLoadError>;
}

/// Port for dimension specifications.
///
/// Implemented by:
/// - `istac_adapters::TomlDimensionSource` (`dimensions.toml`)
/// - `istac_adapters::BuiltinCatalogSource` (compiled-in registry)
#[cfg_attr(test, mockall::automock)]
pub trait DimensionSource: Send + Sync {
    fn describe(&self) -> String;

    /// A validated registry, including its default dimension set.
    fn registry(&self) -> Result<DimensionRegistry, CatalogLoadError>;
}
