//! Command handlers, one module per subcommand.
//!
//! Handlers receive parsed arguments, the resolved [`AppConfig`] and an
//! [`OutputManager`]; they never parse flags or install subscribers.

pub mod analyze;
pub mod completions;
pub mod config;
pub mod dimensions;
pub mod list;
pub mod scan;
pub mod select;
pub mod suggest;
pub mod trace;
pub mod validate;

use std::{fs, io, sync::Arc};

use tracing::{debug, instrument};

use istac_adapters::load_catalog;
use istac_core::application::GuardService;

use crate::{
    cli::TextArgs,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
};

/// Load the configured catalog and wrap it in a service with the
/// configured policies.
#[instrument(skip_all)]
pub(crate) fn build_service(config: &AppConfig) -> CliResult<GuardService> {
    let catalog = load_catalog(config.catalog_path(), config.dimensions_path())?;
    debug!(indicators = catalog.len(), "catalog ready");

    let service = GuardService::new(Arc::new(catalog))
        .with_ranker(Box::new(config.ranker()))
        .with_policy(config.validation_policy())?
        .with_scan_policy(config.scan_policy())?;
    Ok(service)
}

/// Text from the positional argument, `--file`, or stdin, in that order.
///
/// Blank input is rejected: an empty scan would report a clean result for
/// text that was never checked.
pub(crate) fn read_text(args: TextArgs) -> CliResult<String> {
    let (text, origin) = match (args.text, args.file) {
        (Some(text), _) => (text, "argument".to_string()),
        (None, Some(path)) => (
            fs::read_to_string(&path)
                .with_cli_context(|| format!("failed to read {}", path.display()))?,
            path.display().to_string(),
        ),
        (None, None) => (
            io::read_to_string(io::stdin()).with_cli_context(|| "failed to read stdin")?,
            "stdin".to_string(),
        ),
    };

    if text.trim().is_empty() {
        return Err(CliError::InvalidInput {
            message: format!("no text to check ({origin} is empty)"),
            source: None,
        });
    }
    Ok(text)
}
