//! Diagnostics summary computed from a finished flat table.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::row::FlatRow;

/// Run diagnostics: row counts, forecast coverage, and a bounded sample of
/// overlap rows for manual inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatSummary {
    pub total_rows: usize,
    /// Distinct dates in the table; equals `total_rows` when the merge held
    /// its unique-date invariant.
    pub distinct_dates: usize,
    /// Rows with a non-null `fc_tmax_c`, confirming forecast coverage.
    pub forecast_rows: usize,
    pub overlap_sample: Vec<FlatRow>,
}

impl FlatSummary {
    pub const DEFAULT_SAMPLE_LEN: usize = 5;

    pub fn from_rows(rows: &[FlatRow], sample_len: usize) -> Self {
        let dates: BTreeSet<NaiveDate> = rows.iter().map(|row| row.date).collect();
        let forecast_rows = rows.iter().filter(|row| row.fc_tmax_c.is_some()).count();
        let overlap_sample = rows
            .iter()
            .filter(|row| row.is_overlap())
            .take(sample_len)
            .copied()
            .collect();
        Self {
            total_rows: rows.len(),
            distinct_dates: dates.len(),
            forecast_rows,
            overlap_sample,
        }
    }
}
