//! Catalog Loader - builds the immutable catalog from its two sources.
//!
//! Loading is the only I/O the engine performs. It happens once at process
//! start; any failure is fatal for the caller.

use tracing::{debug, info, instrument};

use crate::{
    application::ports::{CatalogSource, DimensionSource},
    domain::{Catalog, CatalogLoadError},
};

pub struct CatalogLoader {
    catalog: Box<dyn CatalogSource>,
    dimensions: Box<dyn DimensionSource>,
}

impl CatalogLoader {
    pub fn new(catalog: Box<dyn CatalogSource>, dimensions: Box<dyn DimensionSource>) -> Self {
        Self {
            catalog,
            dimensions,
        }
    }

    /// Read both sources and build the catalog.
    ///
    /// The dimension registry is read first: catalog rows are checked
    /// against it.
    #[instrument(
        skip_all,
        fields(
            catalog = %self.catalog.describe(),
            dimensions = %self.dimensions.describe()
        )
    )]
    pub fn load(&self) -> Result<Catalog, CatalogLoadError> {
        let registry = self.dimensions.registry()?;
        debug!(count = registry.len(), "dimension registry ready");

        let records = self.catalog.records()?;
        debug!(rows = records.len(), "catalog rows read");

        let catalog = Catalog::build(records, registry)?;
        info!(
            indicators = catalog.len(),
            topics = catalog.topics().len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }
}
