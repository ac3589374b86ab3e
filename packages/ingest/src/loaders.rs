//! CSV loaders: the boundary where loosely-typed export rows become
//! strongly-typed records or fail the run.
//!
//! IDs are trimmed and uppercased here so identity comparisons downstream
//! are byte-exact. Mileposts arrive in the department's `"002+0.619"`
//! reference-post notation (plain decimals also accepted).

use std::path::Path;

use crash_map_traffic_models::{CrashRecord, Milepost, RawTrafficRow, RouteNameEntry, RouteType};
use serde::Deserialize;

use crate::{IngestError, TRAFFIC_YEARS};

#[derive(Debug, Deserialize)]
struct TrafficCsvRow {
    #[serde(rename = "CORR_ID")]
    corr_id: Option<String>,
    #[serde(rename = "DEPT_ID")]
    dept_id: Option<String>,
    #[serde(rename = "SITE_ID")]
    site_id: Option<String>,
    #[serde(rename = "CORR_MP")]
    corr_mp: Option<String>,
    #[serde(rename = "CORR_ENDMP")]
    corr_endmp: Option<String>,
    #[serde(rename = "TYC_AADT")]
    aadt: Option<String>,
    #[serde(rename = "SEC_LNT_MI")]
    length_mi: Option<String>,
    #[serde(rename = "SYSTEM")]
    system: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CrashCsvRow {
    #[serde(rename = "CORRIDOR")]
    corridor: Option<String>,
    #[serde(rename = "REF_POINT")]
    ref_point: Option<String>,
    #[serde(rename = "CRASH_YEAR")]
    crash_year: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RouteCsvRow {
    #[serde(rename = "DEPARTMENTAL ROUTE")]
    dept_id: Option<String>,
    #[serde(rename = "SIGNED ROUTE")]
    signed_route: Option<String>,
}

fn malformed(path: &Path, line: u64, message: impl Into<String>) -> IngestError {
    IngestError::MalformedRow {
        path: path.display().to_string(),
        line,
        message: message.into(),
    }
}

fn required<'a>(
    value: Option<&'a str>,
    name: &str,
    path: &Path,
    line: u64,
) -> Result<&'a str, IngestError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(malformed(path, line, format!("missing required field {name}"))),
    }
}

fn parse_milepost(value: &str, name: &str, path: &Path, line: u64) -> Result<Milepost, IngestError> {
    Milepost::parse(value)
        .map_err(|_| malformed(path, line, format!("non-numeric {name} {value:?}")))
}

fn parse_aadt(value: &str, path: &Path, line: u64) -> Result<u32, IngestError> {
    // Some export vintages write whole counts with a trailing ".0".
    if let Ok(aadt) = value.parse::<u32>() {
        return Ok(aadt);
    }
    let as_float: f64 = value
        .parse()
        .map_err(|_| malformed(path, line, format!("non-numeric TYC_AADT {value:?}")))?;
    if as_float.is_finite() && as_float >= 0.0 && as_float.fract() == 0.0 && as_float <= f64::from(u32::MAX)
    {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Ok(as_float as u32)
    } else {
        Err(malformed(path, line, format!("non-numeric TYC_AADT {value:?}")))
    }
}

/// Loads one year's traffic export.
///
/// # Errors
///
/// Returns [`IngestError`] on read failure or the first malformed row.
pub fn load_traffic_year(path: &Path, year: u16) -> Result<Vec<RawTrafficRow>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |position| position.line());
        let row: TrafficCsvRow = record
            .deserialize(Some(&headers))
            .map_err(|e| malformed(path, line, e.to_string()))?;

        let corridor_id = required(row.corr_id.as_deref(), "CORR_ID", path, line)?
            .to_ascii_uppercase();
        let dept_id = required(row.dept_id.as_deref(), "DEPT_ID", path, line)?
            .to_ascii_uppercase();
        let site_id = required(row.site_id.as_deref(), "SITE_ID", path, line)?.to_string();

        let start = required(row.corr_mp.as_deref(), "CORR_MP", path, line)?;
        let corr_start_mp = parse_milepost(start, "CORR_MP", path, line)?;
        let end = required(row.corr_endmp.as_deref(), "CORR_ENDMP", path, line)?;
        let corr_end_mp = parse_milepost(end, "CORR_ENDMP", path, line)?;
        if corr_start_mp >= corr_end_mp {
            return Err(malformed(
                path,
                line,
                format!("inverted milepost range {corr_start_mp}..{corr_end_mp}"),
            ));
        }

        let aadt = parse_aadt(required(row.aadt.as_deref(), "TYC_AADT", path, line)?, path, line)?;

        let length_raw = required(row.length_mi.as_deref(), "SEC_LNT_MI", path, line)?;
        let length_mi: f64 = length_raw
            .parse()
            .map_err(|_| malformed(path, line, format!("non-numeric SEC_LNT_MI {length_raw:?}")))?;
        if !length_mi.is_finite() || length_mi <= 0.0 {
            return Err(malformed(
                path,
                line,
                format!("non-positive SEC_LNT_MI {length_raw:?}"),
            ));
        }

        rows.push(RawTrafficRow {
            year,
            dept_id,
            site_id,
            corridor_id,
            corr_start_mp,
            corr_end_mp,
            aadt,
            length_mi,
            route_type: row
                .system
                .as_deref()
                .map_or(RouteType::Other, RouteType::from_system_code),
        });
    }

    Ok(rows)
}

/// Loads every `TYC_{year}.csv` present under a directory. Missing years
/// are skipped; a directory with no year at all is an error.
///
/// # Errors
///
/// Returns [`IngestError`] on read failure, the first malformed row, or
/// if no year file exists.
pub fn load_traffic_dir(dir: &Path) -> Result<Vec<RawTrafficRow>, IngestError> {
    let mut rows = Vec::new();
    let mut years_found = 0;

    for year in TRAFFIC_YEARS {
        let path = dir.join(format!("TYC_{year}.csv"));
        if !path.exists() {
            log::debug!("no traffic export for {year} ({})", path.display());
            continue;
        }
        let year_rows = load_traffic_year(&path, year)?;
        log::info!("loaded {} traffic row(s) for {year}", year_rows.len());
        years_found += 1;
        rows.extend(year_rows);
    }

    if years_found == 0 {
        return Err(IngestError::NoTrafficData {
            path: dir.display().to_string(),
        });
    }
    Ok(rows)
}

/// Loads the multi-year crash export.
///
/// # Errors
///
/// Returns [`IngestError`] on read failure or the first malformed row.
pub fn load_crashes(path: &Path) -> Result<Vec<CrashRecord>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut crashes = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |position| position.line());
        let row: CrashCsvRow = record
            .deserialize(Some(&headers))
            .map_err(|e| malformed(path, line, e.to_string()))?;

        let corridor_id = required(row.corridor.as_deref(), "CORRIDOR", path, line)?
            .to_ascii_uppercase();
        let ref_raw = required(row.ref_point.as_deref(), "REF_POINT", path, line)?;
        let ref_point = parse_milepost(ref_raw, "REF_POINT", path, line)?;
        let year_raw = required(row.crash_year.as_deref(), "CRASH_YEAR", path, line)?;
        let year: u16 = year_raw
            .parse()
            .map_err(|_| malformed(path, line, format!("non-numeric CRASH_YEAR {year_raw:?}")))?;

        crashes.push(CrashRecord {
            corridor_id,
            ref_point,
            year,
        });
    }

    log::info!("loaded {} crash row(s)", crashes.len());
    Ok(crashes)
}

/// Loads the on-system route lookup. Rows without a signed route are
/// kept; the index skips them when joining.
///
/// # Errors
///
/// Returns [`IngestError`] on read failure or a row without a
/// departmental route ID.
pub fn load_route_names(path: &Path) -> Result<Vec<RouteNameEntry>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |position| position.line());
        let row: RouteCsvRow = record
            .deserialize(Some(&headers))
            .map_err(|e| malformed(path, line, e.to_string()))?;

        let dept_id = required(row.dept_id.as_deref(), "DEPARTMENTAL ROUTE", path, line)?
            .to_ascii_uppercase();
        entries.push(RouteNameEntry {
            dept_id,
            signed_route: row.signed_route.unwrap_or_default(),
        });
    }

    Ok(entries)
}
