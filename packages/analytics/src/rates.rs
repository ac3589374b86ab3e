//! The rate calculator.
//!
//! AADT x length stands in for daily vehicle-miles of exposure on a
//! segment; it is a proxy, not an exact vehicle-miles figure. Any zero
//! denominator produces `None` for that metric -- a zero-traffic segment
//! is a reportable gap, not a reason to stop the pipeline.

use crash_map_analytics_models::RateSet;
use crash_map_segment::{CanonicalSegment, reconcile};

/// Length of the crash analysis window (2019-2023), in years.
pub const ANALYSIS_WINDOW_YEARS: f64 = 5.0;

/// Mean days per calendar year.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Derives a segment's crash rates from its reconciled traffic.
///
/// Returns `None` when the segment has no reconciled AADT or a
/// non-positive length; such segments stay in the output table as
/// unratable rather than being dropped.
#[must_use]
pub fn rates(segment: &CanonicalSegment) -> Option<RateSet> {
    let aadt = reconcile::resolved_aadt(segment)?;
    if segment.length_mi <= 0.0 {
        return None;
    }

    #[allow(clippy::cast_precision_loss)]
    let crash_count = segment.crash_count() as f64;
    let daily_vmt = aadt * segment.length_mi;
    let period_vmt = daily_vmt * DAYS_PER_YEAR * ANALYSIS_WINDOW_YEARS;

    Some(RateSet {
        crashes_per_aadt: ratio(crash_count, aadt),
        crashes_per_mile: ratio(crash_count, daily_vmt),
        crashes_per_100m_vmt: ratio(crash_count, period_vmt).map(|rate| rate * 100_000_000.0),
        daily_vmt,
        period_vmt,
    })
}

fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    (denominator != 0.0).then(|| numerator / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crash_map_segment::resolver::resolve;
    use crash_map_traffic_models::{CrashRecord, Milepost, RawTrafficRow, RouteType};

    fn segment(observations: &[(u16, u32)], length_mi: f64, crash_count: usize) -> CanonicalSegment {
        let rows = observations.iter().map(|(year, aadt)| RawTrafficRow {
            year: *year,
            dept_id: "P-1".to_string(),
            site_id: "40-1-2".to_string(),
            corridor_id: "C1".to_string(),
            corr_start_mp: Milepost::new(0.0),
            corr_end_mp: Milepost::new(length_mi),
            aadt: *aadt,
            length_mi,
            route_type: RouteType::StateHighway,
        });
        let mut segment = resolve(rows).segments.into_values().next().unwrap();
        segment.crashes = (0..crash_count)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let offset = i as f64 * 0.1;
                CrashRecord {
                    corridor_id: "C1".to_string(),
                    ref_point: Milepost::new(offset),
                    year: 2021,
                }
            })
            .collect();
        segment
    }

    #[test]
    fn two_year_segment_rates() {
        // 1000 (2023) and 900 (2021) blend to 950; one crash on 5 miles.
        let rates = rates(&segment(&[(2023, 1000), (2021, 900)], 5.0, 1)).unwrap();
        assert!((rates.crashes_per_aadt.unwrap() - 1.0 / 950.0).abs() < 1e-12);
        assert!((rates.daily_vmt - 4750.0).abs() < f64::EPSILON);
        assert!((rates.period_vmt - 4750.0 * 365.25 * 5.0).abs() < 1e-6);
        let per_100m = rates.crashes_per_100m_vmt.unwrap();
        assert!((per_100m - 1.0 / (4750.0 * 365.25 * 5.0) * 100_000_000.0).abs() < 1e-9);
    }

    #[test]
    fn zero_aadt_yields_null_metrics_not_a_panic() {
        let rates = rates(&segment(&[(2023, 0)], 5.0, 3)).unwrap();
        assert_eq!(rates.crashes_per_aadt, None);
        assert_eq!(rates.crashes_per_mile, None);
        assert_eq!(rates.crashes_per_100m_vmt, None);
        assert!((rates.daily_vmt - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn no_traffic_means_no_rate_set() {
        let mut segment = segment(&[(2023, 1000)], 5.0, 0);
        segment.traffic_by_year.clear();
        assert!(rates(&segment).is_none());
    }

    #[test]
    fn non_positive_length_means_no_rate_set() {
        let mut segment = segment(&[(2023, 1000)], 5.0, 0);
        segment.length_mi = 0.0;
        assert!(rates(&segment).is_none());
    }
}
