//! Downstream delivery seam for the flat table.

use tracing::info;

use wx_model::FlatRow;

use crate::error::Result;

/// A downstream consumer of the finished flat table.
///
/// Implementations accept the table, report success or failure, and must
/// not mutate it. Transport specifics stay behind this seam.
pub trait PredictionPort {
    fn deliver(&self, rows: &[FlatRow]) -> Result<()>;
}

/// Stand-in transport that serializes the JSON payload it would POST and
/// logs the call instead of making it.
#[derive(Debug, Clone)]
pub struct SimulatedPredictionPort {
    api_url: String,
}

impl SimulatedPredictionPort {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
        }
    }
}

impl PredictionPort for SimulatedPredictionPort {
    fn deliver(&self, rows: &[FlatRow]) -> Result<()> {
        let payload = serde_json::to_string(rows)?;
        info!(
            api_url = %self.api_url,
            rows = rows.len(),
            payload_bytes = payload.len(),
            "simulated POST of flat table"
        );
        Ok(())
    }
}
