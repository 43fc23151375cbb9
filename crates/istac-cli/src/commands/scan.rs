//! `istac-guard scan`: post-execution check of generated text.

use tracing::instrument;

use istac_core::domain::Verdict;

use crate::{
    cli::TextArgs,
    commands::{build_service, read_text},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(args: TextArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let text = read_text(args)?;
    let service = build_service(&config)?;
    let report = service.scan_text(&text);

    if output.is_json() {
        output.json(&report)?;
    } else if report.is_empty() {
        output.info("No indicator codes found")?;
    } else {
        for finding in &report.findings {
            let line = format!("{} at byte {}", finding.token, finding.span.start);
            match finding.verdict {
                Verdict::Known => output.success(&line)?,
                Verdict::Unverified => output.error(&format!("{line}: not in the catalog"))?,
            }
        }
    }

    let mut tokens: Vec<String> = Vec::new();
    for finding in report.unverified() {
        if !tokens.contains(&finding.token) {
            tokens.push(finding.token.clone());
        }
    }
    if tokens.is_empty() {
        Ok(())
    } else {
        Err(CliError::UnverifiedCodes { tokens })
    }
}
