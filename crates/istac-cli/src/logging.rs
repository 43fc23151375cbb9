//! Diagnostic logging for the `istac-guard` binary.
//!
//! Only the CLI installs a subscriber; `istac-core` and `istac-adapters`
//! emit spans and events (catalog load summary, rejected requests,
//! unverified tokens) and nothing else.
//!
//! Logs always go to stderr so that `--output-format json` on stdout stays
//! a clean document. `--log-format json` turns each event into one JSON
//! object for collectors sitting next to the assistant runtime.
//!
//! # Filter resolution
//!
//! 1. `ISTAC_GUARD_LOG` (tool-specific directives)
//! 2. `RUST_LOG`
//! 3. The level derived from `-v` / `--quiet`, applied to the workspace
//!    crates only, so dependencies stay silent.
//!
//! | Flag(s)  | Level |
//! |----------|-------|
//! | (none)   | WARN  |
//! | `-v`     | INFO  |
//! | `-vv`    | DEBUG |
//! | `-vvv`   | TRACE |
//! | `--quiet`| ERROR |

use std::io::IsTerminal as _;

use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{GlobalArgs, LogFormat};

/// Environment variable with filter directives that take precedence over
/// `RUST_LOG`.
pub const LOG_ENV: &str = "ISTAC_GUARD_LOG";

/// Targets that receive the verbosity level when no directives are set.
const WORKSPACE_TARGETS: &[&str] = &["istac_guard", "istac_core", "istac_adapters"];

/// Install the global subscriber.
///
/// # Errors
///
/// Fails if a subscriber is already installed in this process.
pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<()> {
    let filter = resolve_filter(args);

    let layer = match args.log_format {
        LogFormat::Text => fmt::layer()
            // Event targets are noise at the default level; show them once
            // the user asks for debug output.
            .with_target(args.verbose >= 2)
            .with_ansi(!args.no_color && std::io::stderr().is_terminal())
            .with_writer(std::io::stderr)
            .with_filter(filter)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_writer(std::io::stderr)
            .with_filter(filter)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))
}

fn resolve_filter(args: &GlobalArgs) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_directives(derive_level(args))))
}

/// `istac_guard=info,istac_core=info,...` for the workspace crates.
fn default_directives(level: &str) -> String {
    WORKSPACE_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Translate the verbosity counter + quiet flag to a level string.
fn derive_level(args: &GlobalArgs) -> &'static str {
    if args.quiet {
        return "error";
    }
    match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
