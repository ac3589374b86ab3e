#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Canonical record types for the crash-map pipeline.
//!
//! Yearly traffic-count exports, multi-year crash records, and the on-system
//! route lookup all normalize into the types defined here. Segment identity
//! is purely tabular ([`SegmentKey`]) -- geometry never participates in
//! matching.

pub mod milepost;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use milepost::{Milepost, MilepostParseError};

/// Functional classification of a counted road segment.
///
/// Derived from the export's system-class code. Unknown codes fall into
/// [`RouteType::Other`] rather than failing the row, since the class only
/// feeds reporting, never matching.
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
pub enum RouteType {
    /// Interstate highway
    Interstate,
    /// US-signed national highway
    UsHighway,
    /// State-signed primary highway
    StateHighway,
    /// Secondary route
    Secondary,
    /// Local, ramp, urban, or otherwise unsigned roadway
    Other,
}

impl RouteType {
    /// Maps a system-class code from the yearly export (`I`, `N`, `P`, `S`)
    /// to a route type. Anything unrecognized is [`RouteType::Other`].
    #[must_use]
    pub fn from_system_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "I" | "INTERSTATE" => Self::Interstate,
            "N" | "US" | "NATIONAL" => Self::UsHighway,
            "P" | "PRIMARY" => Self::StateHighway,
            "S" | "SECONDARY" => Self::Secondary,
            _ => Self::Other,
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Interstate,
            Self::UsHighway,
            Self::StateHighway,
            Self::Secondary,
            Self::Other,
        ]
    }
}

/// One row from one year's traffic-count export, already validated at the
/// ingestion boundary (`corr_start_mp < corr_end_mp`, `length_mi > 0`).
/// Immutable once read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTrafficRow {
    /// Count year (2019-2024).
    pub year: u16,
    /// Departmental route ID (e.g. "P-1").
    pub dept_id: String,
    /// Count site ID. Not unique on its own; duplicates exist across routes.
    pub site_id: String,
    /// Corridor ID grouping segments end to end.
    pub corridor_id: String,
    /// Corridor milepost where the segment begins.
    pub corr_start_mp: Milepost,
    /// Corridor milepost where the segment ends.
    pub corr_end_mp: Milepost,
    /// Average Annual Daily Traffic estimate for the segment.
    pub aadt: u32,
    /// Section length in miles.
    pub length_mi: f64,
    /// Functional classification.
    pub route_type: RouteType,
}

impl RawTrafficRow {
    /// Returns the canonical identity key for this row.
    #[must_use]
    pub fn key(&self) -> SegmentKey {
        SegmentKey {
            corridor_id: self.corridor_id.clone(),
            corr_start_mp: self.corr_start_mp,
            corr_end_mp: self.corr_end_mp,
            dept_id: self.dept_id.clone(),
            site_id: self.site_id.clone(),
        }
    }
}

/// Canonical identity of a physical road segment.
///
/// Two rows denote the same segment iff their keys are equal *exactly* --
/// milepost comparison is bit-level, never fuzzy. Yearly exports redefine
/// segment boundaries (splits/merges) all the time, and coalescing two
/// nearly-identical ranges would silently blend non-comparable traffic
/// regimes.
///
/// Field order gives the derived `Ord` corridor-then-milepost ordering,
/// which is the output table's sort order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentKey {
    /// Corridor ID.
    pub corridor_id: String,
    /// Start milepost along the corridor.
    pub corr_start_mp: Milepost,
    /// End milepost along the corridor. Always greater than the start.
    pub corr_end_mp: Milepost,
    /// Departmental route ID.
    pub dept_id: String,
    /// Count site ID.
    pub site_id: String,
}

impl std::fmt::Display for SegmentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}_{}_{}_{}_{}",
            self.corridor_id, self.corr_start_mp, self.corr_end_mp, self.dept_id, self.site_id
        )
    }
}

/// One crash record from the statewide crash export. Immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrashRecord {
    /// Corridor the crash was located on.
    pub corridor_id: String,
    /// Reference-point milepost along the corridor.
    pub ref_point: Milepost,
    /// Crash year (2019-2023 window).
    pub year: u16,
}

/// One row of the on-system route lookup: departmental route ID to the
/// signed public highway name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteNameEntry {
    /// Departmental route ID as it appears in the lookup (may carry a
    /// trailing direction/leg suffix).
    pub dept_id: String,
    /// Signed public route name (e.g. "I-90", "US-2").
    pub signed_route: String,
}
