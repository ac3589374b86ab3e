#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Library for loading the yearly traffic exports and crash records and
//! running the full merge pipeline over them.
//!
//! Loading is the validation boundary: every CSV row either becomes a
//! strongly-typed record or aborts the run naming the offending file and
//! line. Past this boundary the pipeline never sees a malformed value,
//! and all remaining data-quality gaps are counted, not fatal.

pub mod loaders;

use crash_map_analytics::report::build_report;
use crash_map_analytics_models::{SegmentReport, SegmentStatus};
use crash_map_ingest_models::{MergeConfig, RunSummary};
use crash_map_routes::RouteNameIndex;
use crash_map_segment::Diagnostics;
use crash_map_segment::pipeline::reconcile_network;

/// Count years the yearly exports may cover. 2024 is loaded when present;
/// the reconciler decides how it participates.
pub const TRAFFIC_YEARS: [u16; 6] = [2019, 2020, 2021, 2022, 2023, 2024];

/// Errors that can occur while loading inputs or running a merge.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// I/O error (file read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV-level read error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A row violated the input contract. The only fatal data condition:
    /// it means the upstream export changed shape, not that data is
    /// merely patchy.
    #[error("{path}:{line}: malformed row: {message}")]
    MalformedRow {
        /// File the row came from.
        path: String,
        /// 1-based line number.
        line: u64,
        /// What was wrong with the row.
        message: String,
    },

    /// No `TYC_{year}.csv` file was found for any supported year.
    #[error("no traffic exports found in {path}")]
    NoTrafficData {
        /// The directory that was searched.
        path: String,
    },
}

/// Everything a merge run produces.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// The reconciled segment table, ordered by key.
    pub reports: Vec<SegmentReport>,
    /// Network-wide data-quality counters.
    pub diagnostics: Diagnostics,
    /// Run totals for reporting and threshold checks.
    pub summary: RunSummary,
}

/// Loads all inputs and runs the merge pipeline.
///
/// # Errors
///
/// Returns [`IngestError`] if any input file cannot be read or contains a
/// malformed row.
pub fn run_merge(config: &MergeConfig) -> Result<MergeOutcome, IngestError> {
    let traffic = loaders::load_traffic_dir(&config.traffic_dir)?;
    let crashes = loaders::load_crashes(&config.crash_csv)?;

    let routes = match &config.routes_csv {
        Some(path) => RouteNameIndex::from_entries(loaders::load_route_names(path)?),
        None => RouteNameIndex::default(),
    };
    if !routes.is_empty() {
        log::info!("route name index: {} route(s)", routes.len());
    }

    let traffic_rows = traffic.len() as u64;
    let crash_rows = crashes.len() as u64;

    let network = reconcile_network(traffic, crashes);
    let diagnostics = network.diagnostics;
    let reports = build_report(network, &routes);

    let unratable_segments = reports
        .iter()
        .filter(|report| report.status == SegmentStatus::Unratable)
        .count() as u64;

    let summary = RunSummary {
        traffic_rows,
        crash_rows,
        crashes_matched: crash_rows - diagnostics.unmatched_crashes - diagnostics.ambiguous_matches,
        segments: reports.len() as u64,
        unratable_segments,
        unmatched_crashes: diagnostics.unmatched_crashes,
        ambiguous_matches: diagnostics.ambiguous_matches,
        duplicate_year_conflicts: diagnostics.duplicate_year_conflicts,
    };

    log::info!(
        "merge complete: {} segment(s) from {traffic_rows} traffic row(s); {}/{crash_rows} crash(es) matched",
        summary.segments,
        summary.crashes_matched,
    );

    Ok(MergeOutcome {
        reports,
        diagnostics,
        summary,
    })
}
