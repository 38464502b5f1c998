//! Full outer join of canonical rows, keyed by date.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use tracing::debug;

use wx_model::{CanonicalRow, DataType, FlatRow, MetricTriple, SourceTag};

/// Merge historical and forecast canonical rows into the flat table.
///
/// The key space is exactly dates(H) ∪ dates(F); one row is emitted per
/// date, ascending. Conflicts resolve deterministically:
///
/// 1. `ingested_at` is the later of the two sides when both are present.
/// 2. `data_type`/`source` are `historical`/`ECCC` whenever a historical row
///    exists for the date (even if a forecast row also exists), and
///    `forecast`/`OpenMeteo` only when no historical row does.
/// 3. Metric values are carried through from whichever side supplied them;
///    upstream nulls stay null. The engine never imputes or blends.
///
/// Within a side, duplicate dates resolve last-write-wins. Rows carried on
/// the wrong side (a forecast row in `historical`, or vice versa) are
/// ignored. Identical inputs always produce identical output.
pub fn merge_flat(historical: &[CanonicalRow], forecast: &[CanonicalRow]) -> Vec<FlatRow> {
    let hist = index_observed(historical);
    let fc = index_forecast(forecast);

    let mut dates: BTreeSet<NaiveDate> = hist.keys().copied().collect();
    dates.extend(fc.keys().copied());

    let mut rows = Vec::with_capacity(dates.len());
    for date in dates {
        let row = match (hist.get(&date), fc.get(&date)) {
            (Some(h), Some(f)) => build_row(
                date,
                DataType::Historical,
                SourceTag::Eccc,
                h.ingested_at.max(f.ingested_at),
                h.metrics.observed().unwrap_or_default(),
                f.metrics.forecast().unwrap_or_default(),
            ),
            (Some(h), None) => build_row(
                date,
                DataType::Historical,
                SourceTag::Eccc,
                h.ingested_at,
                h.metrics.observed().unwrap_or_default(),
                MetricTriple::default(),
            ),
            (None, Some(f)) => build_row(
                date,
                DataType::Forecast,
                SourceTag::OpenMeteo,
                f.ingested_at,
                MetricTriple::default(),
                f.metrics.forecast().unwrap_or_default(),
            ),
            (None, None) => continue,
        };
        rows.push(row);
    }

    debug!(
        historical = hist.len(),
        forecast = fc.len(),
        merged = rows.len(),
        "merge complete"
    );
    rows
}

fn index_observed(rows: &[CanonicalRow]) -> BTreeMap<NaiveDate, &CanonicalRow> {
    rows.iter()
        .filter(|row| row.metrics.observed().is_some())
        .map(|row| (row.date, row))
        .collect()
}

fn index_forecast(rows: &[CanonicalRow]) -> BTreeMap<NaiveDate, &CanonicalRow> {
    rows.iter()
        .filter(|row| row.metrics.forecast().is_some())
        .map(|row| (row.date, row))
        .collect()
}

fn build_row(
    date: NaiveDate,
    data_type: DataType,
    source: SourceTag,
    ingested_at: chrono::DateTime<chrono_tz::Tz>,
    obs: MetricTriple,
    fc: MetricTriple,
) -> FlatRow {
    FlatRow {
        date,
        data_type,
        source,
        ingested_at,
        obs_tmax_c: obs.tmax_c,
        obs_tmin_c: obs.tmin_c,
        obs_precip_mm: obs.precip_mm,
        fc_tmax_c: fc.tmax_c,
        fc_tmin_c: fc.tmin_c,
        fc_precip_mm: fc.precip_mm,
    }
}


#[cfg(test)]
mod properties {
    use std::collections::BTreeSet;

    use chrono::{NaiveDate, TimeZone};
    use proptest::prelude::*;
    use wx_model::{CanonicalRow, DataType, MetricTriple, PIPELINE_TZ};

    use super::merge_flat;

    fn arb_date() -> impl Strategy<Value = NaiveDate> {
        // A tight window so historical and forecast sets overlap often.
        (0u32..60).prop_map(|offset| {
            NaiveDate::from_ymd_opt(2025, 9, 1).unwrap() + chrono::Days::new(u64::from(offset))
        })
    }

    fn arb_triple() -> impl Strategy<Value = MetricTriple> {
        (
            proptest::option::of(-40.0f64..45.0),
            proptest::option::of(-45.0f64..30.0),
            proptest::option::of(0.0f64..120.0),
        )
            .prop_map(|(tmax, tmin, precip)| MetricTriple::new(tmax, tmin, precip))
    }

    fn arb_observed() -> impl Strategy<Value = CanonicalRow> {
        (arb_date(), 0u32..24, arb_triple()).prop_map(|(date, hour, triple)| {
            let stamp = PIPELINE_TZ
                .with_ymd_and_hms(2025, 10, 5, hour, 0, 0)
                .unwrap();
            CanonicalRow::observed(date, stamp, triple)
        })
    }

    fn arb_forecast() -> impl Strategy<Value = CanonicalRow> {
        (arb_date(), 0u32..24, arb_triple()).prop_map(|(date, hour, triple)| {
            let stamp = PIPELINE_TZ
                .with_ymd_and_hms(2025, 10, 5, hour, 0, 0)
                .unwrap();
            CanonicalRow::forecast(date, stamp, triple)
        })
    }

    proptest! {
        #[test]
        fn join_is_complete_and_exact(
            hist in proptest::collection::vec(arb_observed(), 0..40),
            fc in proptest::collection::vec(arb_forecast(), 0..40),
        ) {
            let rows = merge_flat(&hist, &fc);

            let mut expected: BTreeSet<NaiveDate> = hist.iter().map(|r| r.date).collect();
            expected.extend(fc.iter().map(|r| r.date));
            let produced: BTreeSet<NaiveDate> = rows.iter().map(|r| r.date).collect();

            prop_assert_eq!(produced, expected);
            // One row per date: no duplicates hiding behind the set compare.
            prop_assert_eq!(rows.len(), rows.iter().map(|r| r.date).collect::<BTreeSet<_>>().len());
        }

        #[test]
        fn output_is_strictly_ascending(
            hist in proptest::collection::vec(arb_observed(), 0..40),
            fc in proptest::collection::vec(arb_forecast(), 0..40),
        ) {
            let rows = merge_flat(&hist, &fc);
            prop_assert!(rows.windows(2).all(|pair| pair[0].date < pair[1].date));
        }

        #[test]
        fn historical_presence_decides_tags(
            hist in proptest::collection::vec(arb_observed(), 0..40),
            fc in proptest::collection::vec(arb_forecast(), 0..40),
        ) {
            let rows = merge_flat(&hist, &fc);
            let hist_dates: BTreeSet<NaiveDate> = hist.iter().map(|r| r.date).collect();
            for row in &rows {
                let expected = if hist_dates.contains(&row.date) {
                    DataType::Historical
                } else {
                    DataType::Forecast
                };
                prop_assert_eq!(row.data_type, expected);
            }
        }

        #[test]
        fn merge_is_idempotent(
            hist in proptest::collection::vec(arb_observed(), 0..40),
            fc in proptest::collection::vec(arb_forecast(), 0..40),
        ) {
            prop_assert_eq!(merge_flat(&hist, &fc), merge_flat(&hist, &fc));
        }
    }
}
