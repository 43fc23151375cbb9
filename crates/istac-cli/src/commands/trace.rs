//! `istac-guard trace`: figures must come with a trace block.

use crate::{
    cli::TextArgs,
    commands::{build_service, read_text},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(args: TextArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let text = read_text(args)?;
    let service = build_service(&config)?;
    let verdict = service.check_traceability(&text);

    if output.is_json() {
        output.json(&verdict)?;
    }

    if verdict.is_ok() {
        if !output.is_json() {
            output.success(&verdict.to_string())?;
        }
        Ok(())
    } else {
        Err(CliError::Untraceable {
            reason: verdict.to_string(),
        })
    }
}
