//! `istac-guard suggest`: nearest catalog codes for an input.

use crate::{
    cli::SuggestArgs,
    commands::build_service,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: SuggestArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let limit = args.limit.unwrap_or(config.validation.suggestion_limit);
    let service = build_service(&config)?;
    let codes = service.suggest(&args.input, limit);

    if output.is_json() {
        return output.json(&codes);
    }

    if codes.is_empty() {
        output.warning(&format!("No catalog code is close to '{}'", args.input))?;
        return Ok(());
    }

    output.header(&format!("Did you mean ({}):", codes.len()))?;
    for code in &codes {
        let title = service
            .catalog()
            .get(code)
            .map(|entry| entry.display_name())
            .unwrap_or_default();
        output.print(&format!("  {code:<24} {title}"))?;
    }
    Ok(())
}
