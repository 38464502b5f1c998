//! Forecast normalizer: Open-Meteo payload → canonical rows.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use tracing::warn;

use wx_model::{CanonicalRow, MetricTriple};

use crate::date::parse_local_date;
use crate::open_meteo::ForecastResponse;

/// Normalize a forecast payload into one canonical row per date.
///
/// All three metrics are required: a record missing any of them is rejected
/// and its date dropped, since partial forecast data is not actionable.
/// An empty `daily` block yields an empty set, which merges into a
/// historical-only table.
pub fn normalize_forecast(
    payload: &ForecastResponse,
    ingested_at: DateTime<Tz>,
) -> Vec<CanonicalRow> {
    let daily = &payload.daily;
    if daily.time.is_empty() {
        warn!("forecast source returned no daily records");
        return Vec::new();
    }

    let mut by_date: BTreeMap<NaiveDate, CanonicalRow> = BTreeMap::new();
    let mut rejected = 0usize;

    for (index, raw_date) in daily.time.iter().enumerate() {
        let Some(date) = parse_local_date(raw_date) else {
            warn!(%raw_date, "dropping forecast record with unparseable date");
            rejected += 1;
            continue;
        };

        let tmax = metric_at(&daily.temperature_2m_max, index);
        let tmin = metric_at(&daily.temperature_2m_min, index);
        let precip = metric_at(&daily.precipitation_sum, index);
        let (Some(tmax), Some(tmin), Some(precip)) = (tmax, tmin, precip) else {
            warn!(%date, "rejecting forecast record with missing metric");
            rejected += 1;
            continue;
        };

        let metrics = MetricTriple::new(Some(tmax), Some(tmin), Some(precip));
        by_date.insert(date, CanonicalRow::forecast(date, ingested_at, metrics));
    }

    if rejected > 0 {
        warn!(rejected, "forecast records rejected during normalization");
    }
    by_date.into_values().collect()
}

/// Positional lookup that treats both a short array and a JSON null as missing.
fn metric_at(values: &[Option<f64>], index: usize) -> Option<f64> {
    values.get(index).copied().flatten()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use wx_model::{CanonicalMetrics, DataType, PIPELINE_TZ, SourceTag};

    use super::*;

    fn stamp() -> DateTime<Tz> {
        PIPELINE_TZ.with_ymd_and_hms(2025, 9, 30, 18, 0, 0).unwrap()
    }

    fn payload(json: &str) -> ForecastResponse {
        serde_json::from_str(json).unwrap()
    }

    fn forecast(row: &CanonicalRow) -> MetricTriple {
        match row.metrics {
            CanonicalMetrics::Forecast(triple) => triple,
            CanonicalMetrics::Observed(_) => panic!("expected forecast row"),
        }
    }

    #[test]
    fn normalizes_complete_records() {
        let rows = normalize_forecast(
            &payload(
                r#"{"daily": {
                    "time": ["2025-10-01", "2025-10-02"],
                    "temperature_2m_max": [16.5, 14.0],
                    "temperature_2m_min": [1.5, 2.2],
                    "precipitation_sum": [0.0, 3.1]
                }}"#,
            ),
            stamp(),
        );
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2025, 10, 1).unwrap());
        assert_eq!(rows[0].data_type(), DataType::Forecast);
        assert_eq!(rows[0].source(), SourceTag::OpenMeteo);
        assert_eq!(forecast(&rows[0]).tmax_c, Some(16.5));
        assert_eq!(forecast(&rows[1]).precip_mm, Some(3.1));
    }

    #[test]
    fn record_with_null_metric_is_rejected() {
        let rows = normalize_forecast(
            &payload(
                r#"{"daily": {
                    "time": ["2025-10-01", "2025-10-02"],
                    "temperature_2m_max": [16.5, 14.0],
                    "temperature_2m_min": [1.5, 2.2],
                    "precipitation_sum": [null, 3.1]
                }}"#,
            ),
            stamp(),
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2025, 10, 2).unwrap());
    }

    #[test]
    fn short_metric_array_rejects_the_tail_record() {
        let rows = normalize_forecast(
            &payload(
                r#"{"daily": {
                    "time": ["2025-10-01", "2025-10-02"],
                    "temperature_2m_max": [16.5, 14.0],
                    "temperature_2m_min": [1.5, 2.2],
                    "precipitation_sum": [0.0]
                }}"#,
            ),
            stamp(),
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2025, 10, 1).unwrap());
    }

    #[test]
    fn unparseable_date_is_dropped() {
        let rows = normalize_forecast(
            &payload(
                r#"{"daily": {
                    "time": ["bogus", "2025-10-02"],
                    "temperature_2m_max": [16.5, 14.0],
                    "temperature_2m_min": [1.5, 2.2],
                    "precipitation_sum": [0.0, 3.1]
                }}"#,
            ),
            stamp(),
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2025, 10, 2).unwrap());
    }

    #[test]
    fn empty_daily_block_is_an_empty_set() {
        let rows = normalize_forecast(&payload(r#"{"daily": {}}"#), stamp());
        assert!(rows.is_empty());

        let rows = normalize_forecast(&ForecastResponse::default(), stamp());
        assert!(rows.is_empty());
    }
}
