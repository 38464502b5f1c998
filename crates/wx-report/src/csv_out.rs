//! Flat-table CSV persistence.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use wx_model::{FLAT_COLUMNS, FlatRow};

use crate::error::Result;

/// Persist the flat table at `out_path`, overwriting any existing file.
///
/// Parent directories are created as needed. The header row matches the
/// flat schema verbatim; missing metrics become empty cells. Returns the
/// resolved path of the written file.
pub fn write_flat_csv(rows: &[FlatRow], out_path: &Path) -> Result<PathBuf> {
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(out_path)?;
    writer.write_record(FLAT_COLUMNS)?;
    for row in rows {
        writer.write_record(&flat_record(row))?;
    }
    writer.flush()?;

    let resolved = fs::canonicalize(out_path)?;
    info!(rows = rows.len(), path = %resolved.display(), "flat table written");
    Ok(resolved)
}

fn flat_record(row: &FlatRow) -> [String; 10] {
    [
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
    ]
}

fn metric_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
