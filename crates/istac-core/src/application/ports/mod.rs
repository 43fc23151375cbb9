//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `istac-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `CatalogSource`: raw indicator rows
//!   - `DimensionSource`: dimension specifications
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (`GuardService` methods, called from the CLI or a tool-calling harness)

pub mod output;

pub use output::{CatalogSource, DimensionSource};

#[cfg(test)]
pub use output::{MockCatalogSource, MockDimensionSource};
