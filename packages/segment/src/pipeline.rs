//! Corridor-by-corridor reconciliation pass.
//!
//! Corridors share no data: one corridor's segments, traffic, and crashes
//! are resolved without reference to any other corridor. The pass
//! therefore fans out across corridors with rayon, each worker owning its
//! corridor's map outright, and folds the per-corridor diagnostics with an
//! associative merge. Output is identical at any concurrency degree.

use std::collections::BTreeMap;

use crash_map_traffic_models::{CrashRecord, RawTrafficRow, SegmentKey};
use rayon::prelude::*;

use crate::matcher::{MatchOutcome, match_crash};
use crate::resolver::resolve;
use crate::{CanonicalSegment, Diagnostics, SegmentState};

/// Result of reconciling one corridor.
#[derive(Debug, Clone, PartialEq)]
pub struct CorridorOutcome {
    /// The corridor's canonical segments, crashes assigned.
    pub segments: BTreeMap<SegmentKey, CanonicalSegment>,
    /// The corridor's data-quality counters.
    pub diagnostics: Diagnostics,
}

/// Result of reconciling the whole network.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledNetwork {
    /// All canonical segments, ordered by key (corridor, then milepost).
    pub segments: BTreeMap<SegmentKey, CanonicalSegment>,
    /// Network-wide data-quality counters.
    pub diagnostics: Diagnostics,
}

/// Resolves one corridor's rows and assigns its crashes.
#[must_use]
pub fn reconcile_corridor(
    rows: Vec<RawTrafficRow>,
    crashes: Vec<CrashRecord>,
) -> CorridorOutcome {
    let resolution = resolve(rows);
    let mut segments = resolution.segments;
    let mut diagnostics = Diagnostics {
        duplicate_year_conflicts: resolution.duplicate_year_conflicts,
        ..Diagnostics::default()
    };

    for crash in crashes {
        match match_crash(&crash, segments.values()) {
            MatchOutcome::Matched(key) => {
                if let Some(segment) = segments.get_mut(&key) {
                    segment.crashes.push(crash);
                }
            }
            MatchOutcome::Unmatched => diagnostics.unmatched_crashes += 1,
            MatchOutcome::Ambiguous => diagnostics.ambiguous_matches += 1,
        }
    }

    for segment in segments.values_mut() {
        segment.advance(SegmentState::CrashesAssigned);
    }

    CorridorOutcome {
        segments,
        diagnostics,
    }
}

/// Resolves every corridor in parallel and combines the results.
///
/// A crash on a corridor with no traffic rows at all still flows through
/// the matcher (and comes out unmatched), so the unmatched count reflects
/// the full crash set, not just corridors with coverage.
#[must_use]
pub fn reconcile_network(
    rows: Vec<RawTrafficRow>,
    crashes: Vec<CrashRecord>,
) -> ReconciledNetwork {
    let mut corridors: BTreeMap<String, (Vec<RawTrafficRow>, Vec<CrashRecord>)> = BTreeMap::new();

    for row in rows {
        corridors
            .entry(row.corridor_id.clone())
            .or_default()
            .0
            .push(row);
    }
    for crash in crashes {
        corridors
            .entry(crash.corridor_id.clone())
            .or_default()
            .1
            .push(crash);
    }

    log::debug!("reconciling {} corridor(s)", corridors.len());

    let outcomes: Vec<CorridorOutcome> = corridors
        .into_iter()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|(_, (corridor_rows, corridor_crashes))| {
            reconcile_corridor(corridor_rows, corridor_crashes)
        })
        .collect();

    // Corridor keys are disjoint, so the merged map is a plain union; the
    // diagnostics merge is order-independent by construction.
    let mut segments = BTreeMap::new();
    let mut diagnostics = Diagnostics::default();
    for outcome in outcomes {
        segments.extend(outcome.segments);
        diagnostics = diagnostics.merged(outcome.diagnostics);
    }

    ReconciledNetwork {
        segments,
        diagnostics,
    }
}
