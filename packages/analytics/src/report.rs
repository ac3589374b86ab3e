//! Output-table assembly.
//!
//! Consumes a reconciled network and produces one [`SegmentReport`] per
//! canonical segment, route names joined in, ordered by key (corridor,
//! then milepost). Unratable segments are kept with null rates so the
//! table doubles as a data-completeness audit.

use crash_map_analytics_models::{SegmentReport, SegmentStatus};
use crash_map_routes::RouteNameIndex;
use crash_map_segment::pipeline::ReconciledNetwork;
use crash_map_segment::{SegmentState, reconcile};

use crate::rates::rates;

/// Builds the reconciled segment table.
#[must_use]
pub fn build_report(network: ReconciledNetwork, routes: &RouteNameIndex) -> Vec<SegmentReport> {
    let mut unratable = 0_u64;

    let reports: Vec<SegmentReport> = network
        .segments
        .into_values()
        .map(|mut segment| {
            segment.advance(SegmentState::RatesComputed);

            let rate_set = rates(&segment);
            let status = if rate_set.is_some() {
                SegmentStatus::Ratable
            } else {
                unratable += 1;
                SegmentStatus::Unratable
            };

            SegmentReport {
                resolved_aadt: reconcile::resolved_aadt(&segment),
                years_used: reconcile::years_used(&segment),
                length_mi: segment.length_mi,
                route_type: segment.route_type,
                signed_route: routes
                    .signed_route(&segment.key.dept_id)
                    .map(ToString::to_string),
                crash_count: segment.crash_count(),
                crashes_per_aadt: rate_set.and_then(|r| r.crashes_per_aadt),
                crashes_per_mile: rate_set.and_then(|r| r.crashes_per_mile),
                crashes_per_100m_vmt: rate_set.and_then(|r| r.crashes_per_100m_vmt),
                daily_vmt: rate_set.map(|r| r.daily_vmt),
                status,
                key: segment.key,
            }
        })
        .collect();

    if unratable > 0 {
        log::info!(
            "segment table: {} row(s), {unratable} unratable",
            reports.len()
        );
    }

    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crash_map_segment::pipeline::reconcile_network;
    use crash_map_traffic_models::{CrashRecord, Milepost, RawTrafficRow, RouteNameEntry, RouteType};

    fn row(corridor: &str, dept: &str, year: u16, start: f64, end: f64, aadt: u32) -> RawTrafficRow {
        RawTrafficRow {
            year,
            dept_id: dept.to_string(),
            site_id: format!("{corridor}-{start}"),
            corridor_id: corridor.to_string(),
            corr_start_mp: Milepost::new(start),
            corr_end_mp: Milepost::new(end),
            aadt,
            length_mi: end - start,
            route_type: RouteType::StateHighway,
        }
    }

    fn crash(corridor: &str, ref_point: f64) -> CrashRecord {
        CrashRecord {
            corridor_id: corridor.to_string(),
            ref_point: Milepost::new(ref_point),
            year: 2021,
        }
    }

    #[test]
    fn report_blends_years_joins_names_and_orders_by_key() {
        let network = reconcile_network(
            vec![
                row("C2", "P-2", 2023, 0.0, 2.0, 4000),
                row("C1", "P-1", 2023, 0.0, 5.0, 1000),
                row("C1", "P-1", 2021, 0.0, 5.0, 900),
            ],
            vec![crash("C1", 3.0)],
        );
        let routes = RouteNameIndex::from_entries([RouteNameEntry {
            dept_id: "P-1".to_string(),
            signed_route: "MT-200".to_string(),
        }]);

        let reports = build_report(network, &routes);
        assert_eq!(reports.len(), 2);

        // Ordered by corridor, so C1 first.
        let first = &reports[0];
        assert_eq!(first.key.corridor_id, "C1");
        assert!((first.resolved_aadt.unwrap() - 950.0).abs() < f64::EPSILON);
        assert_eq!(first.years_used, vec![2021, 2023]);
        assert_eq!(first.crash_count, 1);
        assert_eq!(first.signed_route.as_deref(), Some("MT-200"));
        assert_eq!(first.status, SegmentStatus::Ratable);
        assert!((first.crashes_per_aadt.unwrap() - 1.0 / 950.0).abs() < 1e-12);

        let second = &reports[1];
        assert_eq!(second.key.corridor_id, "C2");
        assert_eq!(second.crash_count, 0);
        assert_eq!(second.signed_route, None);
    }

    #[test]
    fn unratable_rows_are_kept_with_null_rates() {
        // A 2024-only observation has no anchor year.
        let network = reconcile_network(vec![row("C1", "P-1", 2024, 0.0, 5.0, 1000)], vec![]);
        let reports = build_report(network, &RouteNameIndex::default());

        assert_eq!(reports.len(), 1);
        let report = &reports[0];
        assert_eq!(report.status, SegmentStatus::Unratable);
        assert_eq!(report.resolved_aadt, None);
        assert_eq!(report.crashes_per_aadt, None);
        assert_eq!(report.daily_vmt, None);
        assert!(report.years_used.is_empty());
    }
}
