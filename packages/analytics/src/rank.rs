//! Most-dangerous-first ranking boards.
//!
//! Filters mirror the published analysis: an AADT floor keeps noisy
//! low-volume denominators off the boards, per-VMT boards carry a one-mile
//! length floor, unsigned routes are skipped, and ramp/local/spur
//! department prefixes (`R`, `L`, `X`, `U`) are not rankable mainline --
//! with the one historical carve-out, `U-5832`, which is signed mainline
//! despite its prefix.

use crash_map_analytics_models::{RankMetric, RankOptions, SegmentReport};

/// Department prefixes excluded from ranking.
const EXCLUDED_DEPT_PREFIXES: [char; 4] = ['R', 'L', 'X', 'U'];

/// The one excluded-prefix route that is still rankable.
const DEPT_PREFIX_CARVE_OUT: &str = "U-5832";

/// `true` if a departmental route ID belongs on ranking boards.
#[must_use]
pub fn is_rankable_dept(dept_id: &str) -> bool {
    let dept = dept_id.trim().to_ascii_uppercase();
    if dept == DEPT_PREFIX_CARVE_OUT {
        return true;
    }
    !dept.starts_with(EXCLUDED_DEPT_PREFIXES)
}

/// Returns the value a report ranks by, if the metric was computable.
#[must_use]
pub fn metric_value(report: &SegmentReport, metric: RankMetric) -> Option<f64> {
    match metric {
        RankMetric::CrashesPerAadt => report.crashes_per_aadt,
        RankMetric::CrashesPerMile => report.crashes_per_mile,
        RankMetric::CrashesPer100mVmt => report.crashes_per_100m_vmt,
    }
}

/// Builds a ranking board: filter, order most-dangerous-first, truncate.
///
/// Only segments with at least one crash and a computable metric are
/// rankable. Ties order by key so the board is deterministic.
#[must_use]
pub fn rank(reports: &[SegmentReport], options: &RankOptions) -> Vec<SegmentReport> {
    let mut board: Vec<&SegmentReport> = reports
        .iter()
        .filter(|report| report.crash_count > 0)
        .filter(|report| metric_value(report, options.metric).is_some())
        .filter(|report| {
            report
                .resolved_aadt
                .is_some_and(|aadt| aadt >= options.min_aadt)
        })
        .filter(|report| {
            options
                .min_length_mi
                .is_none_or(|floor| report.length_mi > floor)
        })
        .filter(|report| {
            !options.require_signed_route
                || report
                    .signed_route
                    .as_ref()
                    .is_some_and(|name| !name.trim().is_empty())
        })
        .filter(|report| is_rankable_dept(&report.key.dept_id))
        .collect();

    board.sort_by(|a, b| {
        let a_value = metric_value(a, options.metric).unwrap_or_default();
        let b_value = metric_value(b, options.metric).unwrap_or_default();
        b_value
            .total_cmp(&a_value)
            .then_with(|| a.key.cmp(&b.key))
    });
    board.truncate(options.limit);

    board.into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crash_map_analytics_models::SegmentStatus;
    use crash_map_traffic_models::{Milepost, RouteType, SegmentKey};

    fn report(dept: &str, start: f64, length_mi: f64, aadt: f64, crashes: u64) -> SegmentReport {
        let daily_vmt = aadt * length_mi;
        #[allow(clippy::cast_precision_loss)]
        let crash_count = crashes as f64;
        SegmentReport {
            key: SegmentKey {
                corridor_id: "C1".to_string(),
                corr_start_mp: Milepost::new(start),
                corr_end_mp: Milepost::new(start + length_mi),
                dept_id: dept.to_string(),
                site_id: format!("{dept}-{start}"),
            },
            resolved_aadt: Some(aadt),
            years_used: vec![2023],
            length_mi,
            route_type: RouteType::StateHighway,
            signed_route: Some("MT-200".to_string()),
            crash_count: crashes,
            crashes_per_aadt: (aadt != 0.0).then(|| crash_count / aadt),
            crashes_per_mile: (daily_vmt != 0.0).then(|| crash_count / daily_vmt),
            crashes_per_100m_vmt: (daily_vmt != 0.0)
                .then(|| crash_count / (daily_vmt * 365.25 * 5.0) * 100_000_000.0),
            daily_vmt: Some(daily_vmt),
            status: SegmentStatus::Ratable,
        }
    }

    #[test]
    fn orders_most_dangerous_first() {
        let reports = vec![
            report("P-1", 0.0, 5.0, 10_000.0, 2),
            report("P-1", 5.0, 5.0, 2000.0, 8),
            report("P-1", 10.0, 5.0, 5000.0, 1),
        ];
        let board = rank(&reports, &RankOptions::for_metric(RankMetric::CrashesPerAadt));
        let starts: Vec<f64> = board.iter().map(|r| r.key.corr_start_mp.value()).collect();
        assert_eq!(starts, vec![5.0, 0.0, 10.0]);
    }

    #[test]
    fn crash_free_segments_never_rank() {
        let reports = vec![report("P-1", 0.0, 5.0, 10_000.0, 0)];
        assert!(rank(&reports, &RankOptions::for_metric(RankMetric::CrashesPerAadt)).is_empty());
    }

    #[test]
    fn aadt_floor_applies() {
        let reports = vec![
            report("P-1", 0.0, 5.0, 999.0, 5),
            report("P-1", 5.0, 5.0, 1000.0, 5),
        ];
        let board = rank(&reports, &RankOptions::for_metric(RankMetric::CrashesPerAadt));
        assert_eq!(board.len(), 1);
        assert!((board[0].key.corr_start_mp.value() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn length_floor_applies_only_to_per_vmt_boards() {
        let reports = vec![report("P-1", 0.0, 0.8, 5000.0, 5)];
        assert!(rank(&reports, &RankOptions::for_metric(RankMetric::CrashesPerMile)).is_empty());
        assert_eq!(
            rank(&reports, &RankOptions::for_metric(RankMetric::CrashesPerAadt)).len(),
            1
        );
    }

    #[test]
    fn ramp_and_local_prefixes_are_excluded_with_the_carve_out() {
        assert!(is_rankable_dept("P-1"));
        assert!(is_rankable_dept("I-90"));
        assert!(!is_rankable_dept("R-101"));
        assert!(!is_rankable_dept("L-33"));
        assert!(!is_rankable_dept("X-7"));
        assert!(!is_rankable_dept("U-100"));
        assert!(is_rankable_dept("U-5832"));
        assert!(is_rankable_dept(" u-5832 "));
    }

    #[test]
    fn unsigned_routes_are_skipped_when_required() {
        let mut unsigned = report("P-1", 0.0, 5.0, 5000.0, 5);
        unsigned.signed_route = None;
        let reports = vec![unsigned.clone()];

        assert!(rank(&reports, &RankOptions::for_metric(RankMetric::CrashesPerAadt)).is_empty());

        let mut options = RankOptions::for_metric(RankMetric::CrashesPerAadt);
        options.require_signed_route = false;
        assert_eq!(rank(&reports, &options).len(), 1);
    }

    #[test]
    fn limit_truncates_the_board() {
        let reports: Vec<SegmentReport> = (0..10_u32)
            .map(|i| report("P-1", f64::from(i) * 5.0, 5.0, 5000.0, u64::from(i) + 1))
            .collect();
        let mut options = RankOptions::for_metric(RankMetric::CrashesPerAadt);
        options.limit = 3;
        let board = rank(&reports, &options);
        assert_eq!(board.len(), 3);
        assert_eq!(board[0].crash_count, 10);
    }
}
