//! `istac-guard validate`: pre-execution check of one request.

use istac_core::domain::ValidationResult;
use tracing::instrument;

use crate::{
    cli::ValidateArgs,
    commands::build_service,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(identifier = %args.identifier))]
pub fn execute(args: ValidateArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let service = build_service(&config)?;
    let result = service.validate_request(&args.identifier, &args.filters);

    if output.is_json() {
        output.json(&result)?;
    }

    check(result, &output)
}

/// Print an acceptance, or turn a rejection into a [`CliError`].
fn check(result: ValidationResult, output: &OutputManager) -> CliResult<()> {
    match result {
        ValidationResult::Accepted { deprecated, .. } => {
            if !output.is_json() {
                output.success(&result.to_string())?;
                if deprecated {
                    output.warning("This indicator is deprecated; prefer a current series")?;
                }
            }
            Ok(())
        }
        rejected => Err(CliError::Rejected {
            outcome: rejected.outcome(),
            message: rejected.to_string(),
            suggestions: rejected.suggestions(),
        }),
    }
}
