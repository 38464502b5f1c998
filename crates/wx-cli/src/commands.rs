//! Subcommand entry points.

use anyhow::Result;
use comfy_table::Table;
use tracing::info_span;

use wx_model::FLAT_COLUMNS;
use wx_report::SimulatedPredictionPort;

use crate::cli::RunArgs;
use crate::pipeline::{ingest, output, transform};
use crate::summary::apply_table_style;
use crate::types::RunResult;

const COLUMN_DESCRIPTIONS: [&str; 10] = [
    "Calendar date (America/Toronto), the merge key",
    "Row origin: historical when an observation exists, else forecast",
    "ECCC for historical rows, OpenMeteo for forecast-only rows",
    "Latest ingestion timestamp across contributing sources",
    "Observed daily maximum temperature (°C)",
    "Observed daily minimum temperature (°C)",
    "Observed total precipitation (mm)",
    "Forecast daily maximum temperature (°C)",
    "Forecast daily minimum temperature (°C)",
    "Forecast total precipitation (mm)",
];

pub fn run_etl(args: &RunArgs) -> Result<RunResult> {
    let span = info_span!("etl");
    let _guard = span.enter();

    let ingested = ingest(args)?;
    let (rows, summary) = transform(&ingested);

    if args.dry_run {
        return Ok(RunResult {
            summary,
            out_path: None,
            delivered: false,
            dry_run: true,
            errors: Vec::new(),
            has_errors: false,
        });
    }

    let port = SimulatedPredictionPort::new(args.api_url.clone());
    let outcome = output(&rows, &args.out, &port)?;
    let has_errors = !outcome.errors.is_empty();
    Ok(RunResult {
        summary,
        out_path: outcome.out_path,
        delivered: outcome.delivered,
        dry_run: false,
        errors: outcome.errors,
        has_errors,
    })
}

/// Print the flat-table schema with per-column descriptions.
pub fn run_schema() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Column", "Description"]);
    apply_table_style(&mut table);
    for (column, description) in FLAT_COLUMNS.iter().zip(COLUMN_DESCRIPTIONS) {
        table.add_row(vec![*column, description]);
    }
    println!("{table}");
    Ok(())
}
