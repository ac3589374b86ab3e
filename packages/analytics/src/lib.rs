#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Analytics over the reconciled segment table.
//!
//! [`rates`] turns one segment's blended traffic into exposure-normalized
//! crash rates, [`report`] assembles the full output table (route names
//! joined, rows ordered by key), and [`rank`] produces the
//! most-dangerous-first boards the published analysis is built from.

pub mod rank;
pub mod rates;
pub mod report;
