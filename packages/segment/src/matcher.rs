//! Crash-to-segment matching.
//!
//! A crash belongs to the segment on its corridor whose half-open milepost
//! interval `[corr_start_mp, corr_end_mp)` contains its reference point.
//! The half-open bound keeps adjacent segments from both claiming a crash
//! sitting exactly on their shared boundary.
//!
//! Overlapping segments on one corridor should not happen, but nothing
//! structurally prevents a yearly export from shipping them. Policy when
//! they do: the narrowest containing interval is the most specific match;
//! an exact width tie is reported ambiguous and the crash is excluded
//! rather than arbitrarily assigned. Chosen here as a defensible, testable
//! rule -- verify against reference outputs before trusting it for
//! published rankings.

use crash_map_traffic_models::{CrashRecord, SegmentKey};

use crate::CanonicalSegment;

/// Outcome of matching one crash against a corridor's segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Exactly one most-specific containing segment.
    Matched(SegmentKey),
    /// No containing segment on the crash's corridor.
    Unmatched,
    /// Two or more containing segments of identical width.
    Ambiguous,
}

/// Finds the segment owning a crash's reference point.
#[must_use]
pub fn match_crash<'a>(
    crash: &CrashRecord,
    segments: impl IntoIterator<Item = &'a CanonicalSegment>,
) -> MatchOutcome {
    let ref_point = crash.ref_point.value();

    let mut best: Option<(&SegmentKey, f64)> = None;
    let mut tied = false;

    for segment in segments {
        if segment.key.corridor_id != crash.corridor_id {
            continue;
        }
        let start = segment.key.corr_start_mp.value();
        let end = segment.key.corr_end_mp.value();
        if !(start <= ref_point && ref_point < end) {
            continue;
        }

        let width = end - start;
        match best {
            None => best = Some((&segment.key, width)),
            Some((_, best_width)) => {
                if width < best_width {
                    best = Some((&segment.key, width));
                    tied = false;
                } else if width == best_width {
                    tied = true;
                }
            }
        }
    }

    match best {
        Some(_) if tied => MatchOutcome::Ambiguous,
        Some((key, _)) => MatchOutcome::Matched(key.clone()),
        None => MatchOutcome::Unmatched,
    }
}
