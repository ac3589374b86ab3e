#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! File outputs for the reconciled segment table.
//!
//! CSV is the table of record; GeoJSON exists for visualization only.
//! Geometry never feeds back into matching -- it is looked up by segment
//! key from the yearly exports' own GeoJSON files and attached to rows as
//! an afterthought.

pub mod features;
pub mod geometry;
pub mod table;

/// Errors that can occur while writing outputs or loading geometry.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// I/O error (file read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV write error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// GeoJSON parse error.
    #[error("GeoJSON error: {0}")]
    Geojson(#[from] geojson::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
