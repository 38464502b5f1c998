//! Historical observation normalizer for ECCC daily CSV exports.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use tracing::{debug, warn};

use wx_model::{CanonicalRow, MetricTriple};

use crate::date::parse_local_date;
use crate::error::{IngestError, Result};

// ECCC headers vary by station and locale; each logical column is resolved
// against a candidate list, first match wins.
const DATE_CANDIDATES: &[&str] = &["Date", "Date/Time", "LOCAL_DATE", "date"];
const TMAX_CANDIDATES: &[&str] = &[
    "Max Temp (°C)",
    "Maximum Temperature (°C)",
    "Max Temp (C)",
    "MAX_TEMPERATURE",
    "Max Temp",
];
const TMIN_CANDIDATES: &[&str] = &[
    "Min Temp (°C)",
    "Minimum Temperature (°C)",
    "Min Temp (C)",
    "MIN_TEMPERATURE",
    "Min Temp",
];
const PRECIP_CANDIDATES: &[&str] = &[
    "Total Precip (mm)",
    "Total Rain (mm)",
    "Total Precipitation (mm)",
    "TOTAL_PRECIP",
    "Precipitation",
];

struct ColumnIndexes {
    date: usize,
    tmax: usize,
    tmin: usize,
    precip: usize,
}

impl ColumnIndexes {
    fn resolve(headers: &csv::StringRecord) -> Result<Self> {
        Ok(Self {
            date: resolve_column(headers, "date", DATE_CANDIDATES)?,
            tmax: resolve_column(headers, "tmax", TMAX_CANDIDATES)?,
            tmin: resolve_column(headers, "tmin", TMIN_CANDIDATES)?,
            precip: resolve_column(headers, "precip", PRECIP_CANDIDATES)?,
        })
    }
}

fn resolve_column(
    headers: &csv::StringRecord,
    field: &'static str,
    candidates: &'static [&'static str],
) -> Result<usize> {
    for candidate in candidates {
        if let Some(index) = headers.iter().position(|header| header == *candidate) {
            return Ok(index);
        }
    }
    Err(IngestError::MissingColumn { field, candidates })
}

/// Read an ECCC daily CSV and normalize it into canonical observed rows.
///
/// Failure to open or read the file is fatal; an input that yields zero
/// surviving rows is a valid (empty) historical set.
pub fn ingest_eccc(csv_path: &Path, ingested_at: DateTime<Tz>) -> Result<Vec<CanonicalRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(csv_path)?;
    let rows = normalize_historical(&mut reader, ingested_at)?;
    debug!(
        path = %csv_path.display(),
        rows = rows.len(),
        "historical ingest complete"
    );
    Ok(rows)
}

/// Normalize raw historical records into one canonical row per distinct date.
///
/// Records with an unparseable date or a non-empty, non-numeric metric cell
/// are dropped with a diagnostic. Empty metric cells become nulls. Duplicate
/// dates resolve last-write-wins: the source is assumed append-only and
/// chronological, so the latest-seen record is the freshest.
pub fn normalize_historical<R: Read>(
    reader: &mut csv::Reader<R>,
    ingested_at: DateTime<Tz>,
) -> Result<Vec<CanonicalRow>> {
    let headers = reader.headers()?.clone();
    let columns = ColumnIndexes::resolve(&headers)?;

    let mut by_date: BTreeMap<NaiveDate, CanonicalRow> = BTreeMap::new();
    let mut dropped = 0usize;
    let mut duplicates = 0usize;

    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let record_number = index + 1;

        let raw_date = record.get(columns.date).unwrap_or("");
        let Some(date) = parse_local_date(raw_date) else {
            warn!(record_number, raw_date, "dropping record with unparseable date");
            dropped += 1;
            continue;
        };

        let parsed = (
            parse_metric(record.get(columns.tmax)),
            parse_metric(record.get(columns.tmin)),
            parse_metric(record.get(columns.precip)),
        );
        let (tmax, tmin, precip) = match parsed {
            (Ok(tmax), Ok(tmin), Ok(precip)) => (tmax, tmin, precip),
            (Err(raw), _, _) | (_, Err(raw), _) | (_, _, Err(raw)) => {
                warn!(
                    record_number,
                    %date,
                    raw_value = %raw,
                    "dropping record with non-numeric metric"
                );
                dropped += 1;
                continue;
            }
        };

        let row = CanonicalRow::observed(date, ingested_at, MetricTriple::new(tmax, tmin, precip));
        if by_date.insert(date, row).is_some() {
            duplicates += 1;
            debug!(%date, "duplicate date; keeping latest-seen record");
        }
    }

    if dropped > 0 {
        warn!(dropped, "historical records dropped during normalization");
    }
    debug!(
        rows = by_date.len(),
        duplicates, "historical normalization complete"
    );
    Ok(by_date.into_values().collect())
}

/// Empty cells are missing values; anything else must parse as a number.
fn parse_metric(cell: Option<&str>) -> std::result::Result<Option<f64>, String> {
    let value = cell.unwrap_or("").trim();
    if value.is_empty() {
        return Ok(None);
    }
    value.parse::<f64>().map(Some).map_err(|_| value.to_string())
}
