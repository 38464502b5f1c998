//! Row shapes shared across the pipeline.
//!
//! Two representations exist: the per-source [`CanonicalRow`] produced by the
//! normalizers, and the merged 10-field [`FlatRow`] that is the persisted
//! artifact. Canonical rows are ephemeral; the flat table is regenerated in
//! full on every run.

use std::fmt;

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use serde::{Serialize, Serializer};

/// Fixed zone for calendar dates and ingestion timestamps.
pub const PIPELINE_TZ: Tz = chrono_tz::America::Toronto;

/// Column names of the flat table, in output order.
pub const FLAT_COLUMNS: [&str; 10] = [
    "date",
    "data_type",
    "source",
    "ingested_at",
    "obs_tmax_c",
    "obs_tmin_c",
    "obs_precip_mm",
    "fc_tmax_c",
    "fc_tmin_c",
    "fc_precip_mm",
];

/// Origin of a row: retrospective observation or predictive record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Historical,
    Forecast,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Historical => f.write_str("historical"),
            Self::Forecast => f.write_str("forecast"),
        }
    }
}

/// Upstream system a row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SourceTag {
    #[serde(rename = "ECCC")]
    Eccc,
    #[serde(rename = "OpenMeteo")]
    OpenMeteo,
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eccc => f.write_str("ECCC"),
            Self::OpenMeteo => f.write_str("OpenMeteo"),
        }
    }
}

/// Daily max/min temperature (°C) and total precipitation (mm).
///
/// Missing values are `None`, never a sentinel number.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricTriple {
    pub tmax_c: Option<f64>,
    pub tmin_c: Option<f64>,
    pub precip_mm: Option<f64>,
}

impl MetricTriple {
    pub fn new(tmax_c: Option<f64>, tmin_c: Option<f64>, precip_mm: Option<f64>) -> Self {
        Self {
            tmax_c,
            tmin_c,
            precip_mm,
        }
    }

    /// True when all three values are missing.
    pub fn is_empty(&self) -> bool {
        self.tmax_c.is_none() && self.tmin_c.is_none() && self.precip_mm.is_none()
    }

    /// True when all three values are present.
    pub fn is_complete(&self) -> bool {
        self.tmax_c.is_some() && self.tmin_c.is_some() && self.precip_mm.is_some()
    }
}

/// The populated side of a canonical row.
///
/// A canonical row carries exactly one metric triple; the other side of the
/// flat schema stays fully null until the merge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanonicalMetrics {
    Observed(MetricTriple),
    Forecast(MetricTriple),
}

impl CanonicalMetrics {
    /// The observed triple, if this is an observed row.
    pub fn observed(&self) -> Option<MetricTriple> {
        match self {
            Self::Observed(triple) => Some(*triple),
            Self::Forecast(_) => None,
        }
    }

    /// The forecast triple, if this is a forecast row.
    pub fn forecast(&self) -> Option<MetricTriple> {
        match self {
            Self::Observed(_) => None,
            Self::Forecast(triple) => Some(*triple),
        }
    }
}

/// Normalized per-source row, keyed by calendar date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanonicalRow {
    /// Calendar date in [`PIPELINE_TZ`], no time-of-day component.
    pub date: NaiveDate,
    /// When this row was produced; non-decreasing within an ingestion run.
    pub ingested_at: DateTime<Tz>,
    pub metrics: CanonicalMetrics,
}

impl CanonicalRow {
    pub fn observed(date: NaiveDate, ingested_at: DateTime<Tz>, metrics: MetricTriple) -> Self {
        Self {
            date,
            ingested_at,
            metrics: CanonicalMetrics::Observed(metrics),
        }
    }

    pub fn forecast(date: NaiveDate, ingested_at: DateTime<Tz>, metrics: MetricTriple) -> Self {
        Self {
            date,
            ingested_at,
            metrics: CanonicalMetrics::Forecast(metrics),
        }
    }

    pub fn data_type(&self) -> DataType {
        match self.metrics {
            CanonicalMetrics::Observed(_) => DataType::Historical,
            CanonicalMetrics::Forecast(_) => DataType::Forecast,
        }
    }

    pub fn source(&self) -> SourceTag {
        match self.metrics {
            CanonicalMetrics::Observed(_) => SourceTag::Eccc,
            CanonicalMetrics::Forecast(_) => SourceTag::OpenMeteo,
        }
    }
}

/// One merged row of the flat table. Field order matches [`FLAT_COLUMNS`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlatRow {
    #[serde(serialize_with = "serialize_date")]
    pub date: NaiveDate,
    pub data_type: DataType,
    pub source: SourceTag,
    #[serde(serialize_with = "serialize_timestamp")]
    pub ingested_at: DateTime<Tz>,
    pub obs_tmax_c: Option<f64>,
    pub obs_tmin_c: Option<f64>,
    pub obs_precip_mm: Option<f64>,
    pub fc_tmax_c: Option<f64>,
    pub fc_tmin_c: Option<f64>,
    pub fc_precip_mm: Option<f64>,
}

impl FlatRow {
    /// True when any observed metric is present.
    pub fn has_observed(&self) -> bool {
        self.obs_tmax_c.is_some() || self.obs_tmin_c.is_some() || self.obs_precip_mm.is_some()
    }

    /// True when any forecast metric is present.
    pub fn has_forecast(&self) -> bool {
        self.fc_tmax_c.is_some() || self.fc_tmin_c.is_some() || self.fc_precip_mm.is_some()
    }

    /// Overlap rows resolved to historical but still carry forecast values.
    pub fn is_overlap(&self) -> bool {
        self.data_type == DataType::Historical && self.has_forecast()
    }
}

fn serialize_date<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&date.format("%Y-%m-%d"))
}

fn serialize_timestamp<S>(ts: &DateTime<Tz>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&ts.format("%Y-%m-%d %H:%M:%S"))
}
