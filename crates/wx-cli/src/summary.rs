//! Console summary for a finished run.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};

use wx_model::{FLAT_COLUMNS, FlatRow};

use crate::types::RunResult;

pub fn print_summary(result: &RunResult) {
    if result.dry_run {
        println!("Dry run: no outputs written.");
    }
    if let Some(path) = &result.out_path {
        println!("Output: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![
        Cell::new("Rows (total)"),
        Cell::new(result.summary.total_rows),
    ]);
    table.add_row(vec![
        Cell::new("Distinct dates"),
        Cell::new(result.summary.distinct_dates),
    ]);
    table.add_row(vec![
        Cell::new("Forecast rows (fc_tmax_c present)"),
        Cell::new(result.summary.forecast_rows),
    ]);
    table.add_row(vec![
        Cell::new("Delivered to prediction system"),
        Cell::new(if result.delivered { "yes" } else { "no" }),
    ]);
    println!("{table}");

    print_overlap_sample(&result.summary.overlap_sample);

    if !result.errors.is_empty() {
        eprintln!("Errors:");
        for error in &result.errors {
            eprintln!("- {error}");
        }
    }
}

fn print_overlap_sample(sample: &[FlatRow]) {
    if sample.is_empty() {
        return;
    }
    println!("Overlap sample (observed dates with forecast coverage):");
    let mut table = Table::new();
    table.set_header(FLAT_COLUMNS.iter().map(|c| header_cell(c)).collect::<Vec<_>>());
    apply_table_style(&mut table);
    for row in sample {
        table.add_row(vec![
            row.date.format("%Y-%m-%d").to_string(),
            row.data_type.to_string(),
            row.source.to_string(),
            row.ingested_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            metric_cell(row.obs_tmax_c),
            metric_cell(row.obs_tmin_c),
            metric_cell(row.obs_precip_mm),
            metric_cell(row.fc_tmax_c),
            metric_cell(row.fc_tmin_c),
            metric_cell(row.fc_precip_mm),
        ]);
    }
    println!("{table}");
}

fn metric_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
