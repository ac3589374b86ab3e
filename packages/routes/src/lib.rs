#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Route name enrichment.
//!
//! The on-system route lookup keys by departmental route ID, but the
//! traffic exports suffix those IDs with direction/leg letters (`P-1 S`
//! and `P-1` are the same signed route). The index normalizes both sides
//! by trimming trailing letters before joining.

use std::collections::HashMap;

use crash_map_traffic_models::RouteNameEntry;

/// Lookup from normalized departmental route IDs to signed highway names.
#[derive(Debug, Clone, Default)]
pub struct RouteNameIndex {
    names: HashMap<String, String>,
}

impl RouteNameIndex {
    /// Builds the index from lookup rows. The first non-empty name per
    /// normalized ID wins; later duplicates are ignored so the join stays
    /// deterministic in file order.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = RouteNameEntry>) -> Self {
        let mut names = HashMap::new();
        let mut skipped = 0_u64;

        for entry in entries {
            let signed = entry.signed_route.trim();
            if signed.is_empty() {
                skipped += 1;
                continue;
            }
            names
                .entry(normalize_dept_id(&entry.dept_id))
                .or_insert_with(|| signed.to_string());
        }

        if skipped > 0 {
            log::debug!("route name index: skipped {skipped} row(s) without a signed route");
        }

        Self { names }
    }

    /// Looks up the signed route name for a departmental route ID.
    #[must_use]
    pub fn signed_route(&self, dept_id: &str) -> Option<&str> {
        self.names
            .get(&normalize_dept_id(dept_id))
            .map(String::as_str)
    }

    /// Number of distinct routes in the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// `true` if the index holds no routes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Normalizes a departmental route ID for joining: uppercase, trimmed,
/// trailing direction/leg letters removed (`"p-1 s"` -> `"P-1"`).
#[must_use]
pub fn normalize_dept_id(dept_id: &str) -> String {
    dept_id
        .trim()
        .to_ascii_uppercase()
        .trim_end_matches(char::is_alphabetic)
        .trim_end()
        .to_string()
}
