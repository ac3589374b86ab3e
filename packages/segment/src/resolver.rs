//! Segment identity resolution.
//!
//! Groups yearly traffic rows into [`CanonicalSegment`]s by exact
//! [`SegmentKey`] equality. No tolerance is applied to mileposts: a
//! one-foot difference in `corr_end_mp` between two years yields two
//! distinct segments. Silently coalescing redefined segments would mix
//! non-comparable traffic regimes, so redefinitions stay separate and
//! reconcile independently.

use std::collections::BTreeMap;

use crash_map_traffic_models::{RawTrafficRow, SegmentKey};

use crate::{CanonicalSegment, SegmentState};

/// Output of a resolution pass over one corridor's rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Canonical segments, ordered by key.
    pub segments: BTreeMap<SegmentKey, CanonicalSegment>,
    /// Count of same-key/same-year re-observations with differing AADT.
    /// The later value wins deterministically.
    pub duplicate_year_conflicts: u64,
}

/// Groups rows into canonical segments.
///
/// A row whose key is unseen creates a segment carrying that row's length
/// and route type; later rows for the same key only contribute their
/// `(year, aadt)` observation. Re-observing a year with the same AADT is
/// idempotent; with a different AADT it is a conflict diagnostic and the
/// later value replaces the earlier one.
#[must_use]
pub fn resolve(rows: impl IntoIterator<Item = RawTrafficRow>) -> Resolution {
    let mut segments: BTreeMap<SegmentKey, CanonicalSegment> = BTreeMap::new();
    let mut duplicate_year_conflicts = 0;

    for row in rows {
        let segment = segments
            .entry(row.key())
            .or_insert_with(|| CanonicalSegment::from_row(&row));

        if let Some(previous) = segment.traffic_by_year.insert(row.year, row.aadt)
            && previous != row.aadt
        {
            duplicate_year_conflicts += 1;
        }
        segment.advance(SegmentState::TrafficPopulated);
    }

    Resolution {
        segments,
        duplicate_year_conflicts,
    }
}
