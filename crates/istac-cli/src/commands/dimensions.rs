//! `istac-guard dimensions`: what an indicator can be filtered by.

use crate::{
    cli::DimensionsArgs,
    commands::build_service,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: DimensionsArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let service = build_service(&config)?;
    let dimensions = service.dimensions_of(&args.code)?;

    if output.is_json() {
        return output.json(&dimensions);
    }

    output.header(&format!("{} ({} dimensions):", args.code, dimensions.len()))?;
    for info in &dimensions {
        output.print(&format!("  {} ({})", info.name, info.label))?;
        if !info.aliases.is_empty() {
            output.detail(&format!("aliases: {}", info.aliases.join(", ")))?;
        }
        output.detail(&format!("values:  {}", info.allowed_values.join(", ")))?;
    }
    Ok(())
}
