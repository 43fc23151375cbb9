//! `istac-guard config`: inspect the effective configuration.

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(cmd: ConfigCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            output.print(&format!("{key} = {value}"))?;
        }

        ConfigCommands::List => {
            if output.is_json() {
                return output.json(&config);
            }
            output.header("Current Configuration:")?;
            let serialised =
                toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                    message: format!("Failed to serialise config: {e}"),
                    source: Some(Box::new(e)),
                })?;
            output.print(&serialised)?;
        }

        ConfigCommands::Path => {
            output.print(&AppConfig::config_path().display().to_string())?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    let path = |p: Option<&std::path::Path>| {
        p.map(|p| p.display().to_string())
            .unwrap_or_else(|| "(built-in)".into())
    };

    match key {
        "catalog.path" => Ok(path(config.catalog_path())),
        "catalog.dimensions_path" => Ok(path(config.dimensions_path())),
        "validation.suggestion_limit" => Ok(config.validation.suggestion_limit.to_string()),
        "validation.max_edit_distance" => Ok(config.validation.max_edit_distance.to_string()),
        "validation.max_listed_values" => Ok(config.validation.max_listed_values.to_string()),
        "validation.selection_attempts" => Ok(config.validation.selection_attempts.to_string()),
        "scanner.min_token_len" => Ok(config.scanner.min_token_len.to_string()),
        "scanner.ignore" => Ok(config.scanner.ignore.join(",")),
        "output.no_color" => Ok(config.output.no_color.to_string()),
        "output.format" => Ok(config.output.format.clone()),
        _ => Err(CliError::ConfigError {
            message: format!("Unknown config key: '{key}'"),
            source: None,
        }),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn get_known_key() {
        let cfg = AppConfig::default();
        assert_eq!(get_config_value(&cfg, "validation.suggestion_limit").unwrap(), "5");
    }

    #[test]
    fn unset_catalog_path_reports_builtin() {
        let cfg = AppConfig::default();
        assert_eq!(get_config_value(&cfg, "catalog.path").unwrap(), "(built-in)");
    }

    #[test]
    fn configured_catalog_path_is_shown() {
        let mut cfg = AppConfig::default();
        cfg.catalog.path = Some(PathBuf::from("indicators.tsv"));
        assert_eq!(get_config_value(&cfg, "catalog.path").unwrap(), "indicators.tsv");
    }

    #[test]
    fn get_unknown_key_is_error() {
        let cfg = AppConfig::default();
        assert!(matches!(
            get_config_value(&cfg, "does.not.exist"),
            Err(CliError::ConfigError { .. })
        ));
    }

    #[test]
    fn default_ignore_list_is_joined() {
        let cfg = AppConfig::default();
        assert!(get_config_value(&cfg, "scanner.ignore").unwrap().starts_with("ISTAC,"));
    }
}
