//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "load the catalog" or "validate a request".

pub mod catalog_loader;
pub mod guard_service;

pub use catalog_loader::CatalogLoader;
pub use guard_service::{DimensionInfo, GuardService, IndicatorInfo};
