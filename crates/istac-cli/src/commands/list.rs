//! `istac-guard list`: enumerate the catalog.

use std::io;

use istac_core::application::IndicatorInfo;

use crate::{
    cli::{ListArgs, ListFormat},
    commands::build_service,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ListArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let service = build_service(&config)?;

    let mut indicators = match &args.search {
        Some(query) => service.search(query, usize::MAX),
        None => service.list(),
    };
    if args.active {
        indicators.retain(|info| info.status != "deprecated");
    }

    let format = if output.is_json() {
        ListFormat::Json
    } else {
        args.format
    };

    match format {
        ListFormat::Table => {
            if indicators.is_empty() {
                output.warning("No indicators match")?;
                return Ok(());
            }
            output.header(&format!("Indicators ({}):", indicators.len()))?;
            for info in &indicators {
                let marker = if info.status == "deprecated" {
                    " (deprecated)"
                } else {
                    ""
                };
                output.print(&format!(
                    "  {:<24} {}{marker}",
                    info.code, info.display_name
                ))?;
                output.detail(&format!("{} · {}", info.topic, info.dimensions.join(", ")))?;
            }
        }

        ListFormat::Json => output.json(&indicators)?,

        ListFormat::List => {
            for info in &indicators {
                output.print(&info.code)?;
            }
        }

        ListFormat::Csv => write_csv(&indicators, io::stdout())?,
    }

    Ok(())
}

fn write_csv<W: io::Write>(indicators: &[IndicatorInfo], writer: W) -> io::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["code", "display_name", "topic", "dimensions", "status"])?;
    for info in indicators {
        let dimensions = info.dimensions.join("|");
        csv.write_record([
            info.code.as_str(),
            info.display_name.as_str(),
            info.topic.as_str(),
            dimensions.as_str(),
            info.status.as_str(),
        ])?;
    }
    csv.flush()
}
