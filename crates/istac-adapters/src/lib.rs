//! Infrastructure adapters for istac-guard.
//!
//! This crate implements the ports defined in `istac_core::application::ports`.
//! It contains all file formats and I/O.
//!
//! # Source selection
//!
//! [`load_catalog`] picks one source per port:
//!
//! | port              | path given              | no path                  |
//! |-------------------|-------------------------|--------------------------|
//! | `CatalogSource`   | [`TsvCatalogSource`]    | [`BuiltinCatalogSource`] |
//! | `DimensionSource` | [`TomlDimensionSource`] | [`BuiltinCatalogSource`] |
//!
//! A file catalog may be combined with the built-in registry and the other
//! way round; the consistency checks in `Catalog::build` apply either way.

pub mod builtin_catalog;
pub mod dimension_config;
pub mod tsv_catalog;

use std::path::Path;

use tracing::{info, instrument};

use istac_core::{
    application::{
        CatalogLoader,
        ports::{CatalogSource, DimensionSource},
    },
    domain::{Catalog, CatalogLoadError},
};

// Re-export commonly used adapters
pub use builtin_catalog::BuiltinCatalogSource;
pub use dimension_config::TomlDimensionSource;
pub use tsv_catalog::TsvCatalogSource;

/// Build the catalog from the given files, falling back to the built-in
/// tables for any path that is `None`.
///
/// # Errors
///
/// Every [`CatalogLoadError`] is fatal: the caller must not start serving
/// validations without a catalog.
#[instrument(skip_all, fields(catalog = ?catalog_path, dimensions = ?dimensions_path))]
pub fn load_catalog(
    catalog_path: Option<&Path>,
    dimensions_path: Option<&Path>,
) -> Result<Catalog, CatalogLoadError> {
    let catalog_source: Box<dyn CatalogSource> = match catalog_path {
        Some(path) => Box::new(TsvCatalogSource::new(path)),
        None => {
            info!("no catalog file configured, using the built-in catalog");
            Box::new(BuiltinCatalogSource)
        }
    };

    let dimension_source: Box<dyn DimensionSource> = match dimensions_path {
        Some(path) => Box::new(TomlDimensionSource::new(path)),
        None => Box::new(BuiltinCatalogSource),
    };

    CatalogLoader::new(catalog_source, dimension_source).load()
}
