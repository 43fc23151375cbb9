//! `istac-guard select`: resolve a rejection by picking a listed candidate.
//!
//! The answer is checked like any other assistant output: only a position
//! in the list or one of the listed codes is accepted.

use serde::Serialize;
use tracing::instrument;

use istac_core::{
    application::GuardService,
    domain::{IndicatorCode, Selection, SelectionStep},
};

use crate::{
    cli::SelectArgs,
    commands::build_service,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[derive(Debug, Serialize)]
struct Candidate<'a> {
    position: usize,
    code: &'a str,
    display_name: &'a str,
}

#[derive(Debug, Serialize)]
struct Selected<'a> {
    selected: &'a str,
    display_name: &'a str,
    attempts: usize,
}

#[instrument(skip_all, fields(identifier = %args.identifier, choices = args.choices.len()))]
pub fn execute(args: SelectArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let service = build_service(&config)?;
    let Some(selection) = service.start_selection(&args.identifier) else {
        return Err(CliError::Rejected {
            outcome: "no_candidates",
            message: format!("no catalog code is close to '{}'", args.identifier),
            suggestions: Vec::new(),
        });
    };
    let mut selection = selection.with_max_attempts(config.validation.selection_attempts);

    if args.choices.is_empty() {
        return list_candidates(&service, &selection, &output);
    }

    for (attempt, choice) in args.choices.iter().enumerate() {
        match selection.submit(choice) {
            SelectionStep::Selected(code) => {
                return report_selected(&service, &code, attempt + 1, &output);
            }
            SelectionStep::Retry {
                selection: open,
                error,
            } => {
                output.warning(&format!("{error} ({} attempt(s) left)", open.remaining()))?;
                selection = open;
            }
            SelectionStep::Exhausted { error } => {
                return Err(CliError::Rejected {
                    outcome: "selection_exhausted",
                    message: format!("{error}; no attempts left"),
                    suggestions: vec![format!(
                        "Search again with: istac-guard suggest {}",
                        args.identifier
                    )],
                });
            }
        }
    }

    Err(CliError::Rejected {
        outcome: "selection_pending",
        message: format!(
            "no valid choice given; {} attempt(s) left",
            selection.remaining()
        ),
        suggestions: selection
            .candidates()
            .iter()
            .map(ToString::to_string)
            .collect(),
    })
}

fn display_name<'a>(service: &'a GuardService, code: &IndicatorCode) -> &'a str {
    service
        .catalog()
        .get(code)
        .map(|entry| entry.display_name())
        .unwrap_or_default()
}

fn list_candidates(
    service: &GuardService,
    selection: &Selection,
    output: &OutputManager,
) -> CliResult<()> {
    let candidates: Vec<Candidate<'_>> = selection
        .candidates()
        .iter()
        .enumerate()
        .map(|(i, code)| Candidate {
            position: i + 1,
            code: code.as_str(),
            display_name: display_name(service, code),
        })
        .collect();

    if output.is_json() {
        return output.json(&candidates);
    }

    output.header("Candidates:")?;
    for c in &candidates {
        output.print(&format!("  {}) {:<24} {}", c.position, c.code, c.display_name))?;
    }
    output.detail(&format!(
        "Choose by number (1-{}) or exact code",
        candidates.len()
    ))?;
    Ok(())
}

fn report_selected(
    service: &GuardService,
    code: &IndicatorCode,
    attempts: usize,
    output: &OutputManager,
) -> CliResult<()> {
    let display_name = display_name(service, code);
    if output.is_json() {
        return output.json(&Selected {
            selected: code.as_str(),
            display_name,
            attempts,
        });
    }
    output.success(&format!("selected: {code} - {display_name}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{GlobalArgs, OutputFormat};

    fn quiet_output() -> OutputManager {
        let args = GlobalArgs {
            quiet: true,
            output_format: OutputFormat::Plain,
            ..GlobalArgs::default()
        };
        OutputManager::new(&args, &AppConfig::default())
    }

    fn run(identifier: &str, choices: &[&str]) -> CliResult<()> {
        let args = SelectArgs {
            identifier: identifier.into(),
            choices: choices.iter().map(|c| c.to_string()).collect(),
        };
        execute(args, AppConfig::default(), quiet_output())
    }

    #[test]
    fn listing_candidates_succeeds() {
        assert!(run("POBLACION_ISLA", &[]).is_ok());
    }

    #[test]
    fn first_candidate_by_number() {
        assert!(run("POBLACION_ISLA", &["1"]).is_ok());
    }

    #[test]
    fn retry_then_success() {
        assert!(run("POBLACION_ISLA", &["99", "POBLACION"]).is_ok());
    }

    #[test]
    fn unlisted_code_exhausts_attempts() {
        let err = run("POBLACION_ISLA", &["TURISTAS", "NO_EXISTE"]).unwrap_err();
        assert!(matches!(
            err,
            CliError::Rejected {
                outcome: "selection_exhausted",
                ..
            }
        ));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn single_wrong_answer_leaves_selection_pending() {
        let err = run("POBLACION_ISLA", &["99"]).unwrap_err();
        assert!(matches!(
            err,
            CliError::Rejected {
                outcome: "selection_pending",
                ..
            }
        ));
    }

    #[test]
    fn nothing_to_select() {
        let err = run("XQXQXQXQXQ", &[]).unwrap_err();
        assert!(matches!(
            err,
            CliError::Rejected {
                outcome: "no_candidates",
                ..
            }
        ));
    }
}
