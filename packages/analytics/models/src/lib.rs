#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crash-rate metric and report types.
//!
//! [`SegmentReport`] is the pipeline's output-table row: one reconciled
//! segment with its blended traffic estimate, matched crash count, and
//! exposure-normalized rates. Downstream ranking and export consume these
//! rows; nothing downstream mutates them.

use crash_map_traffic_models::{RouteType, SegmentKey};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Whether a segment's traffic supported rate computation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SegmentStatus {
    /// Rates were derived from a reconciled traffic estimate.
    Ratable,
    /// No usable traffic (or non-positive length); retained with null
    /// rates so data completeness stays auditable.
    Unratable,
}

/// Exposure-normalized crash rates for one segment.
///
/// Each metric is independently `None` when its denominator is zero; a
/// zero-traffic segment must surface as a gap, never as a panic or an
/// infinity in the output table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateSet {
    /// Crashes per vehicle of daily traffic.
    pub crashes_per_aadt: Option<f64>,
    /// Crashes per daily vehicle-mile of exposure.
    pub crashes_per_mile: Option<f64>,
    /// Crashes per hundred million vehicle-miles over the analysis window.
    pub crashes_per_100m_vmt: Option<f64>,
    /// Daily vehicle-miles traveled (AADT x length).
    pub daily_vmt: f64,
    /// Vehicle-miles traveled over the whole analysis window.
    pub period_vmt: f64,
}

/// One row of the reconciled segment table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentReport {
    /// Canonical identity of the segment.
    pub key: SegmentKey,
    /// Blended AADT estimate; `None` when unratable.
    pub resolved_aadt: Option<f64>,
    /// Count years that contributed to the estimate, ascending.
    pub years_used: Vec<u16>,
    /// Section length in miles.
    pub length_mi: f64,
    /// Functional classification.
    pub route_type: RouteType,
    /// Signed public route name, when the lookup knows the route.
    pub signed_route: Option<String>,
    /// Crashes matched into the segment.
    pub crash_count: u64,
    /// Crashes per vehicle of daily traffic.
    pub crashes_per_aadt: Option<f64>,
    /// Crashes per daily vehicle-mile.
    pub crashes_per_mile: Option<f64>,
    /// Crashes per hundred million VMT over the window.
    pub crashes_per_100m_vmt: Option<f64>,
    /// Daily vehicle-miles traveled.
    pub daily_vmt: Option<f64>,
    /// Ratable/unratable marker.
    pub status: SegmentStatus,
}

/// Metric a ranking board orders by.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RankMetric {
    /// Order by crashes per vehicle of daily traffic.
    CrashesPerAadt,
    /// Order by crashes per daily vehicle-mile.
    CrashesPerMile,
    /// Order by crashes per hundred million VMT.
    CrashesPer100mVmt,
}

/// Filters applied before ranking segments.
///
/// Defaults mirror the published-analysis thresholds: very-low-volume
/// segments distort rate denominators, sub-mile segments skew the per-VMT
/// board, and ramp/local/spur department prefixes are not rankable
/// mainline highway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankOptions {
    /// Metric to order by (most dangerous first).
    pub metric: RankMetric,
    /// Number of rows to keep.
    pub limit: usize,
    /// Minimum resolved AADT.
    pub min_aadt: f64,
    /// Minimum segment length in miles, if the metric warrants one.
    pub min_length_mi: Option<f64>,
    /// Drop segments without a signed route name.
    pub require_signed_route: bool,
}

impl RankOptions {
    /// Default AADT cutoff below which rates are too noisy to rank.
    pub const DEFAULT_MIN_AADT: f64 = 1000.0;
    /// Default minimum length for per-VMT boards.
    pub const DEFAULT_MIN_LENGTH_MI: f64 = 1.0;
    /// Default board size.
    pub const DEFAULT_LIMIT: usize = 100;

    /// Standard board for a metric: top 100, AADT >= 1000, signed routes
    /// only, with the 1-mile floor on per-VMT ordering.
    #[must_use]
    pub fn for_metric(metric: RankMetric) -> Self {
        let min_length_mi = match metric {
            RankMetric::CrashesPerAadt => None,
            RankMetric::CrashesPerMile | RankMetric::CrashesPer100mVmt => {
                Some(Self::DEFAULT_MIN_LENGTH_MI)
            }
        };
        Self {
            metric,
            limit: Self::DEFAULT_LIMIT,
            min_aadt: Self::DEFAULT_MIN_AADT,
            min_length_mi,
            require_signed_route: true,
        }
    }
}
