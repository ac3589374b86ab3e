#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Merge run configuration and summary types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Input locations for a merge run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Directory holding the yearly `TYC_{year}.csv` exports (and, when
    /// geometry export is wanted, the matching `TYC_{year}.json` files).
    pub traffic_dir: PathBuf,
    /// The multi-year crash export CSV.
    pub crash_csv: PathBuf,
    /// Optional on-system route lookup CSV for signed route names.
    pub routes_csv: Option<PathBuf>,
}

/// Counts describing a completed merge run.
///
/// The three trailing counters mirror the pipeline's diagnostics so a
/// caller can assert acceptable-loss thresholds without re-deriving them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    /// Traffic rows loaded across all years.
    pub traffic_rows: u64,
    /// Crash rows loaded.
    pub crash_rows: u64,
    /// Crashes assigned to a segment.
    pub crashes_matched: u64,
    /// Canonical segments in the output table.
    pub segments: u64,
    /// Segments retained with null rates.
    pub unratable_segments: u64,
    /// Crashes with no containing segment.
    pub unmatched_crashes: u64,
    /// Crashes dropped as ambiguous.
    pub ambiguous_matches: u64,
    /// Duplicate-year AADT conflicts (later value won).
    pub duplicate_year_conflicts: u64,
}
