pub mod catalog_entry;
pub mod dimension;

pub use catalog_entry::{CatalogEntry, CatalogRecord};
pub use dimension::{DimensionRegistry, DimensionSpec, ValuePattern};
