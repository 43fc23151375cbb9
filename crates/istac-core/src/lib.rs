//! istac-core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers of istac-guard, the
//! validation engine that sits between a natural-language assistant and the
//! ISTAC indicator catalog and keeps it from inventing indicator codes,
//! dimensions or filter values.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           istac-cli (CLI)               │
//! │     (Calls the driving ports)           │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │    (CatalogLoader, GuardService)        │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │   (Driven: CatalogSource, Dimension…)   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    istac-adapters (Infrastructure)      │
//! │   (TSV catalog, TOML dimensions, …)     │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (Catalog, resolver, validator, scanner) │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use istac_core::prelude::*;
//!
//! # fn run(catalog: Catalog) {
//! let service = GuardService::new(Arc::new(catalog));
//!
//! // Before calling the statistics API:
//! let verdict = service.validate_request("POBLACION", &[("isla".into(), "I".into())]);
//! if !verdict.is_accepted() {
//!     eprintln!("{verdict}");
//! }
//!
//! // After rendering the answer:
//! let report = service.scan_text("La serie POBLACION_ISLA muestra…");
//! assert!(!report.is_clean());
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        CatalogLoader, DimensionInfo, GuardService, IndicatorInfo,
        ports::{CatalogSource, DimensionSource},
    };
    pub use crate::domain::{
        Catalog, CatalogEntry, CatalogLoadError, CatalogRecord, DimensionRegistry,
        DimensionSpec, IndicatorCode, IndicatorStatus, ScanReport, Selection, SelectionStep,
        SuggestionRanker, ValidationResult, ValuePattern, Verdict, normalize,
    };
    pub use crate::error::{GuardError, GuardResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
