//! Multi-year traffic reconciliation.
//!
//! Every year that landed on one [`CanonicalSegment`] is an exact key match
//! (same department route, site, corridor, and milepost bounds), so the
//! observations describe the same physical segment and a plain arithmetic
//! mean is safe -- it only smooths year-to-year measurement noise. The
//! anchor ladder decides *eligibility*: a segment with no observation in
//! the 2023..2019 preference order has no usable traffic for the crash
//! window and reconciles to `None`.

use crate::CanonicalSegment;

/// Anchor-year preference order. 2024 rows exist in the exports but
/// postdate the crash window, so they sweeten the mean without ever
/// anchoring a segment on their own.
pub const ANCHOR_YEARS: [u16; 5] = [2023, 2022, 2021, 2020, 2019];

/// Returns the anchor year for a segment: the first year of
/// [`ANCHOR_YEARS`] with an observation, or `None` if no eligible year is
/// present.
#[must_use]
pub fn anchor_year(segment: &CanonicalSegment) -> Option<u16> {
    ANCHOR_YEARS
        .into_iter()
        .find(|year| segment.traffic_by_year.contains_key(year))
}

/// Reconciles a segment's yearly observations into one AADT estimate.
///
/// With an anchor fixed, the estimate is the mean of **all** observed
/// years for the key (a single observation degenerates to itself).
/// Without an anchor the segment is unratable and the result is `None`.
#[must_use]
pub fn resolved_aadt(segment: &CanonicalSegment) -> Option<f64> {
    anchor_year(segment)?;

    let count = segment.traffic_by_year.len();
    let total: u64 = segment
        .traffic_by_year
        .values()
        .map(|aadt| u64::from(*aadt))
        .sum();

    #[allow(clippy::cast_precision_loss)]
    Some(total as f64 / count as f64)
}

/// Returns the years that contributed to the reconciled estimate, in
/// ascending order.
#[must_use]
pub fn years_used(segment: &CanonicalSegment) -> Vec<u16> {
    if anchor_year(segment).is_none() {
        return Vec::new();
    }
    segment.traffic_by_year.keys().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve;
    use crash_map_traffic_models::{Milepost, RawTrafficRow, RouteType};

    fn segment_with_years(observations: &[(u16, u32)]) -> CanonicalSegment {
        let rows = observations.iter().map(|(year, aadt)| RawTrafficRow {
            year: *year,
            dept_id: "P-1".to_string(),
            site_id: "40-1-2".to_string(),
            corridor_id: "C000001".to_string(),
            corr_start_mp: Milepost::new(0.0),
            corr_end_mp: Milepost::new(5.0),
            aadt: *aadt,
            length_mi: 5.0,
            route_type: RouteType::StateHighway,
        });
        resolve(rows).segments.into_values().next().unwrap()
    }

    #[test]
    fn mean_spans_all_years_not_just_the_anchor() {
        let segment = segment_with_years(&[(2023, 1000), (2021, 900)]);
        assert_eq!(anchor_year(&segment), Some(2023));
        assert!((resolved_aadt(&segment).unwrap() - 950.0).abs() < f64::EPSILON);
        assert_eq!(years_used(&segment), vec![2021, 2023]);
    }

    #[test]
    fn anchor_falls_back_to_most_recent_eligible_year() {
        let segment = segment_with_years(&[(2019, 800), (2021, 900)]);
        assert_eq!(anchor_year(&segment), Some(2021));
        assert!((resolved_aadt(&segment).unwrap() - 850.0).abs() < f64::EPSILON);
    }

    #[test]
    fn single_year_degenerates_to_itself() {
        let segment = segment_with_years(&[(2020, 640)]);
        assert_eq!(anchor_year(&segment), Some(2020));
        assert!((resolved_aadt(&segment).unwrap() - 640.0).abs() < f64::EPSILON);
    }

    #[test]
    fn future_year_contributes_but_never_anchors() {
        let with_anchor = segment_with_years(&[(2023, 1000), (2024, 1100)]);
        assert_eq!(anchor_year(&with_anchor), Some(2023));
        assert!((resolved_aadt(&with_anchor).unwrap() - 1050.0).abs() < f64::EPSILON);

        let future_only = segment_with_years(&[(2024, 1100)]);
        assert_eq!(anchor_year(&future_only), None);
        assert_eq!(resolved_aadt(&future_only), None);
        assert!(years_used(&future_only).is_empty());
    }

    #[test]
    fn empty_traffic_reconciles_to_none() {
        let mut segment = segment_with_years(&[(2023, 1000)]);
        segment.traffic_by_year.clear();
        assert_eq!(resolved_aadt(&segment), None);
    }
}
