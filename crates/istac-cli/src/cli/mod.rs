//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, LogFormat, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "istac-guard",
    bin_name = "istac-guard",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Validate ISTAC indicator codes before and after an assistant uses them",
    long_about = "istac-guard checks indicator identifiers and dimension filters against \
                  the ISTAC catalog before a statistics request is made, and scans \
                  generated text for indicator codes that do not exist.",
    after_help = "EXAMPLES:\n\
        \x20 istac-guard validate POBLACION -f isla=I -f año=2023\n\
        \x20 istac-guard scan --file respuesta.md\n\
        \x20 istac-guard suggest POBLACION_ISLA\n\
        \x20 istac-guard --catalog indicators.tsv list --search paro",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate an indicator request before it is executed.
    #[command(
        visible_alias = "v",
        about = "Validate an indicator identifier and its filters",
        after_help = "EXAMPLES:\n\
            \x20 istac-guard validate Población\n\
            \x20 istac-guard validate POBLACION -f geo=ISLANDS -f sexo=mujeres\n\
            \x20 istac-guard --output-format json validate TASA_PARO -f periodo=2024Q1"
    )]
    Validate(ValidateArgs),

    /// Choose among the candidates offered for a rejected identifier.
    #[command(
        about = "Pick a candidate for a rejected identifier",
        after_help = "EXAMPLES:\n\
            \x20 istac-guard select POBLACION_ISLA\n\
            \x20 istac-guard select POBLACION_ISLA 1\n\
            \x20 istac-guard select paro 7 TASA_PARO"
    )]
    Select(SelectArgs),

    /// Scan generated text for indicator codes.
    #[command(
        about = "Scan text for unverified indicator codes",
        after_help = "EXAMPLES:\n\
            \x20 istac-guard scan \"El indicador PARO_FALSO no existe\"\n\
            \x20 istac-guard scan --file respuesta.md\n\
            \x20 echo \"POBLACION\" | istac-guard scan"
    )]
    Scan(TextArgs),

    /// Suggest catalog codes close to an input.
    #[command(
        about = "Suggest indicator codes for an input",
        after_help = "EXAMPLES:\n\
            \x20 istac-guard suggest POBLACION_ISLA\n\
            \x20 istac-guard suggest paro -n 10"
    )]
    Suggest(SuggestArgs),

    /// List catalog indicators.
    #[command(
        visible_alias = "ls",
        about = "List catalog indicators",
        after_help = "EXAMPLES:\n\
            \x20 istac-guard list\n\
            \x20 istac-guard list --search turismo\n\
            \x20 istac-guard list --format csv > indicators.csv"
    )]
    List(ListArgs),

    /// Show the dimensions of one indicator.
    #[command(
        about = "Show dimensions and allowed values of an indicator",
        after_help = "EXAMPLES:\n\
            \x20 istac-guard dimensions POBLACION"
    )]
    Dimensions(DimensionsArgs),

    /// Split a natural-language query into indicator and dimension terms.
    #[command(
        about = "Detect dimension terms in a query",
        after_help = "EXAMPLES:\n\
            \x20 istac-guard analyze \"población por isla y sexo\""
    )]
    Analyze(AnalyzeArgs),

    /// Check that quoted figures carry a trace block.
    #[command(
        about = "Check traceability of figures in a response",
        after_help = "EXAMPLES:\n\
            \x20 istac-guard trace --file respuesta.md"
    )]
    Trace(TextArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 istac-guard completions bash > ~/.local/share/bash-completion/completions/istac-guard\n\
            \x20 istac-guard completions zsh  > ~/.zfunc/_istac-guard\n\
            \x20 istac-guard completions fish > ~/.config/fish/completions/istac-guard.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the effective configuration.
    #[command(
        about = "Configuration inspection",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 istac-guard config get catalog.path\n\
            \x20 istac-guard config list\n\
            \x20 istac-guard config path"
    )]
    Config(ConfigCommands),
}

// ── validate ──────────────────────────────────────────────────────────────────

/// Arguments for `istac-guard validate`.
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Indicator identifier as the assistant produced it.
    #[arg(value_name = "IDENTIFIER", help = "Indicator identifier")]
    pub identifier: String,

    /// Dimension filter, repeatable.
    #[arg(
        short = 'f',
        long = "filter",
        value_name = "DIM=VALUE",
        value_parser = parse_filter,
        help = "Dimension filter as DIM=VALUE (repeatable)"
    )]
    pub filters: Vec<(String, String)>,
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    let (dimension, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected DIM=VALUE, got '{raw}'"))?;
    if dimension.trim().is_empty() {
        return Err(format!("missing dimension in '{raw}'"));
    }
    Ok((dimension.trim().to_string(), value.trim().to_string()))
}

// ── select ────────────────────────────────────────────────────────────────────

/// Arguments for `istac-guard select`.
#[derive(Debug, Args)]
pub struct SelectArgs {
    /// Identifier whose candidates are offered.
    #[arg(value_name = "IDENTIFIER", help = "Rejected indicator identifier")]
    pub identifier: String,

    /// Answers tried in order. Without any, the numbered candidates are listed.
    #[arg(
        value_name = "CHOICE",
        help = "Candidate number or listed code (repeat to retry)"
    )]
    pub choices: Vec<String>,
}

// ── scan / trace ──────────────────────────────────────────────────────────────

/// Text input for `scan` and `trace`: positional, `--file`, or stdin.
#[derive(Debug, Args)]
pub struct TextArgs {
    /// Text to check. Read from stdin when neither TEXT nor --file is given.
    #[arg(value_name = "TEXT", conflicts_with = "file", help = "Text to check")]
    pub text: Option<String>,

    /// Read the text from a file.
    #[arg(long = "file", value_name = "FILE", help = "Read text from a file")]
    pub file: Option<PathBuf>,
}

// ── suggest ───────────────────────────────────────────────────────────────────

/// Arguments for `istac-guard suggest`.
#[derive(Debug, Args)]
pub struct SuggestArgs {
    #[arg(value_name = "INPUT", help = "Identifier to find neighbours for")]
    pub input: String,

    /// Maximum number of suggestions.
    #[arg(
        short = 'n',
        long = "limit",
        value_name = "N",
        help = "Maximum number of suggestions (default: validation.suggestion_limit)"
    )]
    pub limit: Option<usize>,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `istac-guard list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Keep indicators whose code, title or topic contains the query.
    #[arg(short = 's', long = "search", value_name = "QUERY", help = "Filter by text")]
    pub search: Option<String>,

    /// Hide deprecated indicators.
    #[arg(long = "active", help = "Only active indicators")]
    pub active: bool,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One code per line.
    List,
    /// JSON array.
    Json,
    /// CSV rows.
    Csv,
}

// ── dimensions ────────────────────────────────────────────────────────────────

/// Arguments for `istac-guard dimensions`.
#[derive(Debug, Args)]
pub struct DimensionsArgs {
    #[arg(value_name = "CODE", help = "Indicator code")]
    pub code: String,
}

// ── analyze ───────────────────────────────────────────────────────────────────

/// Arguments for `istac-guard analyze`.
#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    #[arg(value_name = "QUERY", help = "Natural-language query")]
    pub query: String,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `istac-guard completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `istac-guard config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `catalog.path`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the default configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
