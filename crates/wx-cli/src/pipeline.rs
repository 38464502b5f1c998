//! Pipeline stages with explicit ordering.
//!
//! 1. **Ingest**: normalize the ECCC export, then fetch and normalize the
//!    forecast window
//! 2. **Transform**: outer-join both canonical sets into the flat table
//! 3. **Output**: persist the CSV, then deliver through the prediction port
//!
//! Stages run strictly in sequence; the merge never starts until both
//! normalizers have completed, and a failure in either aborts the run.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, info_span};

use wx_ingest::{ForecastConfig, OpenMeteoClient, ingest_eccc, normalize_forecast};
use wx_model::{CanonicalRow, FlatRow, FlatSummary, PIPELINE_TZ};
use wx_report::{PredictionPort, write_flat_csv};
use wx_transform::merge_flat;

use crate::cli::RunArgs;

/// Result of the ingest stage.
#[derive(Debug)]
pub struct IngestResult {
    pub historical: Vec<CanonicalRow>,
    pub forecast: Vec<CanonicalRow>,
}

/// Normalize both sources in pipeline order.
///
/// The historical side is stamped before the forecast side, keeping
/// `ingested_at` non-decreasing within the run.
pub fn ingest(args: &RunArgs) -> Result<IngestResult> {
    let span = info_span!("ingest", eccc_csv = %args.eccc_csv.display());
    let _guard = span.enter();
    let start = Instant::now();

    let stamped = Utc::now().with_timezone(&PIPELINE_TZ);
    let historical = ingest_eccc(&args.eccc_csv, stamped).with_context(|| {
        format!(
            "ingest historical observations from {}",
            args.eccc_csv.display()
        )
    })?;
    info!(rows = historical.len(), "historical observations normalized");

    let config = ForecastConfig {
        latitude: args.lat,
        longitude: args.lon,
        forecast_days: args.days,
        past_days: args.past_days,
        ..ForecastConfig::default()
    };
    let client = OpenMeteoClient::new(config).context("build forecast client")?;
    let payload = client.fetch_daily().context("fetch daily forecast")?;
    let stamped = Utc::now().with_timezone(&PIPELINE_TZ);
    let forecast = normalize_forecast(&payload, stamped);
    info!(rows = forecast.len(), "forecast records normalized");

    info!(
        duration_ms = start.elapsed().as_millis(),
        "ingest complete"
    );
    Ok(IngestResult {
        historical,
        forecast,
    })
}

/// Merge both canonical sets and compute run diagnostics.
pub fn transform(ingested: &IngestResult) -> (Vec<FlatRow>, FlatSummary) {
    let span = info_span!("transform");
    let _guard = span.enter();
    let start = Instant::now();

    let rows = merge_flat(&ingested.historical, &ingested.forecast);
    let summary = FlatSummary::from_rows(&rows, FlatSummary::DEFAULT_SAMPLE_LEN);
    info!(
        rows = summary.total_rows,
        forecast_rows = summary.forecast_rows,
        duration_ms = start.elapsed().as_millis(),
        "transform complete"
    );
    (rows, summary)
}

/// Output stage outcome.
#[derive(Debug, Default)]
pub struct OutputResult {
    pub out_path: Option<PathBuf>,
    pub delivered: bool,
    pub errors: Vec<String>,
}

/// Persist the table, then hand it to the prediction port.
///
/// A persist failure is fatal. A port failure leaves the written file in
/// place and is recorded against the run's exit code.
pub fn output(rows: &[FlatRow], out: &Path, port: &dyn PredictionPort) -> Result<OutputResult> {
    let span = info_span!("output", out = %out.display());
    let _guard = span.enter();
    let start = Instant::now();

    let out_path = write_flat_csv(rows, out)
        .with_context(|| format!("write flat table to {}", out.display()))?;

    let mut result = OutputResult {
        out_path: Some(out_path),
        delivered: false,
        errors: Vec::new(),
    };
    match port.deliver(rows) {
        Ok(()) => result.delivered = true,
        Err(error) => result.errors.push(format!("prediction delivery: {error}")),
    }

    info!(
        duration_ms = start.elapsed().as_millis(),
        delivered = result.delivered,
        "output complete"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};
    use wx_model::{DataType, SourceTag};
    use wx_report::ExportError;

    use super::*;

    struct FailingPort;

    impl PredictionPort for FailingPort {
        fn deliver(&self, _rows: &[FlatRow]) -> wx_report::Result<()> {
            Err(ExportError::Delivery("consumer unavailable".to_string()))
        }
    }

    fn sample_rows() -> Vec<FlatRow> {
        vec![FlatRow {
            date: NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
            data_type: DataType::Forecast,
            source: SourceTag::OpenMeteo,
            ingested_at: PIPELINE_TZ.with_ymd_and_hms(2025, 9, 30, 18, 0, 0).unwrap(),
            obs_tmax_c: None,
            obs_tmin_c: None,
            obs_precip_mm: None,
            fc_tmax_c: Some(16.5),
            fc_tmin_c: Some(1.5),
            fc_precip_mm: Some(0.0),
        }]
    }

    #[test]
    fn port_failure_is_recorded_but_keeps_the_written_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("flat_weather.csv");

        let result = output(&sample_rows(), &out, &FailingPort).unwrap();
        assert!(!result.delivered);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("consumer unavailable"));
        assert!(result.out_path.unwrap().is_file());
    }

    #[test]
    fn unwritable_output_path_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let out = blocker.join("flat_weather.csv");
        assert!(output(&sample_rows(), &out, &FailingPort).is_err());
    }
}
