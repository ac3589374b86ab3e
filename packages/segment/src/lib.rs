#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The segment-matching and multi-year traffic-reconciliation engine.
//!
//! Yearly traffic exports shift segment boundaries between years, so the
//! engine never merges rows across differing keys: [`resolver`] groups rows
//! by exact [`SegmentKey`] identity, [`reconcile`] blends the years that
//! landed on one key into a single AADT, [`matcher`] assigns each crash to
//! at most one segment, and [`pipeline`] runs the whole pass corridor by
//! corridor with an order-independent diagnostics reduction.

pub mod matcher;
pub mod pipeline;
pub mod reconcile;
pub mod resolver;

use std::collections::BTreeMap;

use crash_map_traffic_models::{CrashRecord, RawTrafficRow, RouteType, SegmentKey};
use serde::{Deserialize, Serialize};

/// Lifecycle of a [`CanonicalSegment`] through the pipeline. Strictly
/// monotonic; [`CanonicalSegment::advance`] never moves backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SegmentState {
    /// Key seen, no traffic recorded yet.
    Created,
    /// At least one year's AADT recorded.
    TrafficPopulated,
    /// The corridor's crash pass has run.
    CrashesAssigned,
    /// Rates derived (or found underivable) from the reconciled traffic.
    RatesComputed,
}

/// Aggregate of every yearly row that shares one [`SegmentKey`], plus the
/// crashes matched into its milepost range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalSegment {
    /// Exact identity shared by the contributing rows.
    pub key: SegmentKey,
    /// AADT observation per count year.
    pub traffic_by_year: BTreeMap<u16, u32>,
    /// Section length in miles, taken from the first row seen for the key
    /// (stable across years for a true segment).
    pub length_mi: f64,
    /// Functional classification, likewise from the first row.
    pub route_type: RouteType,
    /// Crashes matched into `[corr_start_mp, corr_end_mp)`, in input order.
    pub crashes: Vec<CrashRecord>,
    /// Pipeline lifecycle state.
    pub state: SegmentState,
}

impl CanonicalSegment {
    /// Creates a segment from the first row observed for a key.
    #[must_use]
    pub fn from_row(row: &RawTrafficRow) -> Self {
        Self {
            key: row.key(),
            traffic_by_year: BTreeMap::new(),
            length_mi: row.length_mi,
            route_type: row.route_type,
            crashes: Vec::new(),
            state: SegmentState::Created,
        }
    }

    /// Number of crashes matched to this segment.
    #[must_use]
    pub fn crash_count(&self) -> u64 {
        self.crashes.len() as u64
    }

    /// Advances the lifecycle state. A stale transition is a no-op, so the
    /// state can only move forward.
    pub fn advance(&mut self, next: SegmentState) {
        self.state = self.state.max(next);
    }
}

/// Non-fatal data-quality counters, aggregated across corridors.
///
/// Kept as counters (not logs) so a caller can assert acceptable-loss
/// thresholds programmatically after a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    /// Crashes with no containing segment on their corridor.
    pub unmatched_crashes: u64,
    /// Crashes contained by more than one equally-specific segment.
    pub ambiguous_matches: u64,
    /// Same key + year observed twice with differing AADT (later wins).
    pub duplicate_year_conflicts: u64,
}

impl Diagnostics {
    /// Combines two counter sets. Associative and commutative, so the
    /// corridor reduction is order-independent.
    #[must_use]
    pub const fn merged(self, other: Self) -> Self {
        Self {
            unmatched_crashes: self.unmatched_crashes + other.unmatched_crashes,
            ambiguous_matches: self.ambiguous_matches + other.ambiguous_matches,
            duplicate_year_conflicts: self.duplicate_year_conflicts
                + other.duplicate_year_conflicts,
        }
    }

    /// `true` if no data-quality gap was recorded.
    #[must_use]
    pub const fn is_clean(self) -> bool {
        self.unmatched_crashes == 0
            && self.ambiguous_matches == 0
            && self.duplicate_year_conflicts == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crash_map_traffic_models::Milepost;

    fn row() -> RawTrafficRow {
        RawTrafficRow {
            year: 2023,
            dept_id: "P-1".to_string(),
            site_id: "40-1-2".to_string(),
            corridor_id: "C000001".to_string(),
            corr_start_mp: Milepost::new(0.0),
            corr_end_mp: Milepost::new(5.0),
            aadt: 1000,
            length_mi: 5.0,
            route_type: RouteType::StateHighway,
        }
    }

    #[test]
    fn state_never_moves_backwards() {
        let mut segment = CanonicalSegment::from_row(&row());
        segment.advance(SegmentState::CrashesAssigned);
        segment.advance(SegmentState::TrafficPopulated);
        assert_eq!(segment.state, SegmentState::CrashesAssigned);
        segment.advance(SegmentState::RatesComputed);
        assert_eq!(segment.state, SegmentState::RatesComputed);
    }

    #[test]
    fn diagnostics_merge_is_commutative() {
        let a = Diagnostics {
            unmatched_crashes: 2,
            ambiguous_matches: 1,
            duplicate_year_conflicts: 0,
        };
        let b = Diagnostics {
            unmatched_crashes: 5,
            ambiguous_matches: 0,
            duplicate_year_conflicts: 3,
        };
        assert_eq!(a.merged(b), b.merged(a));
        assert_eq!(a.merged(b).unmatched_crashes, 7);
        assert!(!a.merged(b).is_clean());
        assert!(Diagnostics::default().is_clean());
    }
}
