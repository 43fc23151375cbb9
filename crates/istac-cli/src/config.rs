//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (`--catalog`, `--dimensions`, applied by [`AppConfig::with_overrides`])
//! 2. Environment variables: `ISTAC_GUARD__<SECTION>__<KEY>`, e.g.
//!    `ISTAC_GUARD__CATALOG__PATH=/data/indicators.tsv`
//! 3. Config file (`--config FILE`, or the platform config dir)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use istac_core::domain::{
    EditDistanceRanker, ScanPolicy, ValidationPolicy,
    scanner::{DEFAULT_IGNORED_TOKENS, DEFAULT_MIN_TOKEN_LEN},
    selection::DEFAULT_MAX_ATTEMPTS,
    suggest::DEFAULT_MAX_DISTANCE,
};

use crate::cli::global::GlobalArgs;

const ENV_PREFIX: &str = "ISTAC_GUARD";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where the catalog and dimension definitions come from.
    pub catalog: CatalogConfig,
    /// Limits used when building rejections.
    pub validation: ValidationConfig,
    /// Post-execution scan settings.
    pub scanner: ScannerConfig,
    /// Output settings.
    pub output: OutputConfig,
}

/// `None` selects the built-in tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub path: Option<PathBuf>,
    pub dimensions_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    pub suggestion_limit: usize,
    pub max_edit_distance: usize,
    pub max_listed_values: usize,
    /// Answers tolerated by `select` before the user must search again.
    pub selection_attempts: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    pub min_token_len: usize,
    pub ignore: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let policy = ValidationPolicy::default();
        Self {
            catalog: CatalogConfig::default(),
            validation: ValidationConfig {
                suggestion_limit: policy.suggestion_limit,
                max_edit_distance: DEFAULT_MAX_DISTANCE,
                max_listed_values: policy.max_listed_values,
                selection_attempts: DEFAULT_MAX_ATTEMPTS,
            },
            scanner: ScannerConfig {
                min_token_len: DEFAULT_MIN_TOKEN_LEN,
                ignore: DEFAULT_IGNORED_TOKENS.iter().map(|t| t.to_string()).collect(),
            },
            output: OutputConfig {
                no_color: false,
                format: "auto".into(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration, layering file and environment over the defaults.
    ///
    /// An explicit `config_file` must exist; the default location is
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let defaults = config::Config::try_from(&Self::default())
            .context("Failed to build default configuration")?;

        let file = match config_file {
            Some(path) => config::File::from(path.as_path()).required(true),
            None => config::File::from(Self::config_path()).required(false),
        };

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("scanner.ignore")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?;

        settings
            .try_deserialize()
            .context("Invalid configuration values")
    }

    /// Apply per-invocation flags on top of the loaded values.
    pub fn with_overrides(mut self, args: &GlobalArgs) -> Self {
        if let Some(path) = &args.catalog {
            self.catalog.path = Some(path.clone());
        }
        if let Some(path) = &args.dimensions {
            self.catalog.dimensions_path = Some(path.clone());
        }
        self
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.istac-guard.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("es", "istac", "istac-guard")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".istac-guard.toml"))
    }

    pub fn catalog_path(&self) -> Option<&Path> {
        self.catalog.path.as_deref()
    }

    pub fn dimensions_path(&self) -> Option<&Path> {
        self.catalog.dimensions_path.as_deref()
    }

    pub fn validation_policy(&self) -> ValidationPolicy {
        ValidationPolicy {
            suggestion_limit: self.validation.suggestion_limit,
            max_listed_values: self.validation.max_listed_values,
        }
    }

    pub fn ranker(&self) -> EditDistanceRanker {
        EditDistanceRanker::new(self.validation.max_edit_distance)
    }

    pub fn scan_policy(&self) -> ScanPolicy {
        ScanPolicy::new(self.scanner.min_token_len, &self.scanner.ignore)
    }
}
