//! Application layer for istac-guard.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (CatalogLoader, GuardService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! validation rules itself. All rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    CatalogLoader,
    DimensionInfo, // DTO for dimension listings
    GuardService,
    IndicatorInfo, // DTO for indicator listings
};

// Re-export port traits (for adapter implementation)
pub use ports::{CatalogSource, DimensionSource};

pub use error::ApplicationError;
