//! `istac-guard analyze`: split a query into indicator and dimension terms.

use crate::{
    cli::AnalyzeArgs,
    commands::build_service,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: AnalyzeArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let service = build_service(&config)?;
    let analysis = service.analyze_query(&args.query);

    if output.is_json() {
        return output.json(&analysis);
    }

    output.header(&format!("Indicator terms: {}", analysis.indicator_query))?;
    if analysis.dimensions.is_empty() {
        output.info("No dimension terms detected")?;
    }
    for detected in &analysis.dimensions {
        output.print(&format!(
            "  {:<20} → {}",
            detected.term,
            detected.dimensions.join(" | ")
        ))?;
    }
    if analysis.has_breakdown {
        output.detail(&format!("breakdown: {}", analysis.breakdown_phrase))?;
    }
    Ok(())
}
