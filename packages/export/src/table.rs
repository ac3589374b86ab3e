//! CSV writers for the segment table and ranking boards.
//!
//! Column names follow the department's export vocabulary (`TYC_AADT`,
//! `SEC_LNT_MI`) so the merged table diffs cleanly against the raw
//! inputs. Null metrics write as empty cells.

use std::path::Path;

use crash_map_analytics_models::SegmentReport;

use crate::ExportError;

const COLUMNS: [&str; 17] = [
    "SEGMENT_KEY",
    "CORRIDOR",
    "CORR_MP",
    "CORR_ENDMP",
    "DEPT_ID",
    "SITE_ID",
    "SIGNED_ROUTE",
    "ROUTE_TYPE",
    "YEARS_USED",
    "TYC_AADT",
    "SEC_LNT_MI",
    "DAILY_VMT",
    "TOTAL_CRASHES",
    "CRASHES_PER_AADT",
    "CRASHES_PER_MILE",
    "PER_100M_VMT",
    "STATUS",
];

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Writes segment reports as CSV, one row per report in the given order.
///
/// # Errors
///
/// Returns [`ExportError`] if the file cannot be created or written.
pub fn write_segments_csv(path: &Path, reports: &[SegmentReport]) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(COLUMNS)?;

    for report in reports {
        let years: Vec<String> = report.years_used.iter().map(u16::to_string).collect();
        writer.write_record([
            report.key.to_string(),
            report.key.corridor_id.clone(),
            report.key.corr_start_mp.to_string(),
            report.key.corr_end_mp.to_string(),
            report.key.dept_id.clone(),
            report.key.site_id.clone(),
            report.signed_route.clone().unwrap_or_default(),
            report.route_type.to_string(),
            years.join(";"),
            optional(report.resolved_aadt),
            report.length_mi.to_string(),
            optional(report.daily_vmt),
            report.crash_count.to_string(),
            optional(report.crashes_per_aadt),
            optional(report.crashes_per_mile),
            optional(report.crashes_per_100m_vmt),
            report.status.to_string(),
        ])?;
    }

    writer.flush()?;
    log::info!("wrote {} segment row(s) to {}", reports.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crash_map_analytics_models::SegmentStatus;
    use crash_map_traffic_models::{Milepost, RouteType, SegmentKey};

    fn report(start: f64, aadt: Option<f64>) -> SegmentReport {
        SegmentReport {
            key: SegmentKey {
                corridor_id: "C1".to_string(),
                corr_start_mp: Milepost::new(start),
                corr_end_mp: Milepost::new(start + 5.0),
                dept_id: "P-1".to_string(),
                site_id: "S1".to_string(),
            },
            resolved_aadt: aadt,
            years_used: if aadt.is_some() { vec![2021, 2023] } else { vec![] },
            length_mi: 5.0,
            route_type: RouteType::StateHighway,
            signed_route: Some("MT-200".to_string()),
            crash_count: 1,
            crashes_per_aadt: aadt.map(|a| 1.0 / a),
            crashes_per_mile: aadt.map(|a| 1.0 / (a * 5.0)),
            crashes_per_100m_vmt: None,
            daily_vmt: aadt.map(|a| a * 5.0),
            status: if aadt.is_some() {
                SegmentStatus::Ratable
            } else {
                SegmentStatus::Unratable
            },
        }
    }

    #[test]
    fn writes_header_and_rows_with_empty_cells_for_null_metrics() {
        let dir = std::env::temp_dir().join(format!("crash_map_table_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("segments.csv");

        write_segments_csv(&path, &[report(0.0, Some(950.0)), report(5.0, None)]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("SEGMENT_KEY,CORRIDOR,"));
        assert!(lines[1].contains("C1_0_5_P-1_S1"));
        assert!(lines[1].contains("2021;2023"));
        assert!(lines[1].contains("950"));
        // Unratable row keeps its identity but writes empty metric cells.
        assert!(lines[2].contains("C1_5_10_P-1_S1"));
        assert!(lines[2].ends_with(",,,UNRATABLE"));
        assert!(lines[1].ends_with(",RATABLE"));
    }
}
