use std::path::PathBuf;

use wx_model::FlatSummary;

/// Outcome of a full pipeline run.
#[derive(Debug)]
pub struct RunResult {
    pub summary: FlatSummary,
    /// Resolved output path; `None` under `--dry-run`.
    pub out_path: Option<PathBuf>,
    pub delivered: bool,
    pub dry_run: bool,
    pub errors: Vec<String>,
    pub has_errors: bool,
}
