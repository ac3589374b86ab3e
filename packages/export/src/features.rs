//! GeoJSON FeatureCollections for web mapping.
//!
//! Two collections per export: one point per segment (for cluster/zoom
//! views) and the full linestrings. Both carry the same properties.
//! Segments the geometry map cannot place are skipped and counted --
//! they remain in the CSV table regardless.

use std::path::Path;

use crash_map_analytics_models::SegmentReport;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};

use crate::ExportError;
use crate::geometry::{GeometryMap, PointPlacement, representative_point};

fn round5(value: f64) -> f64 {
    (value * 100_000.0).round() / 100_000.0
}

fn properties(report: &SegmentReport) -> JsonObject {
    let mut properties = JsonObject::new();
    properties.insert("SEGMENT_KEY".to_string(), report.key.to_string().into());
    properties.insert("CORRIDOR".to_string(), report.key.corridor_id.clone().into());
    properties.insert("DEPT_ID".to_string(), report.key.dept_id.clone().into());
    properties.insert("SITE_ID".to_string(), report.key.site_id.clone().into());
    properties.insert(
        "SIGNED_ROUTE".to_string(),
        report.signed_route.clone().unwrap_or_default().into(),
    );
    properties.insert("ROUTE_TYPE".to_string(), report.route_type.to_string().into());
    properties.insert("TOTAL_CRASHES".to_string(), report.crash_count.into());
    properties.insert(
        "TYC_AADT".to_string(),
        report.resolved_aadt.map_or(serde_json::Value::Null, Into::into),
    );
    properties.insert(
        "PER_100M_VMT".to_string(),
        report
            .crashes_per_100m_vmt
            .map_or(serde_json::Value::Null, Into::into),
    );
    properties.insert("STATUS".to_string(), report.status.to_string().into());
    properties
}

fn feature(geometry: Geometry, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Builds the point and line FeatureCollections for a set of reports.
#[must_use]
pub fn report_features(
    reports: &[SegmentReport],
    geometry: &GeometryMap,
) -> (FeatureCollection, FeatureCollection) {
    let mut points = Vec::new();
    let mut lines = Vec::new();
    let mut missing = 0_usize;

    for report in reports {
        let Some(shape) = geometry.get(&report.key) else {
            missing += 1;
            continue;
        };
        let Some((x, y)) = representative_point(shape, PointPlacement::Start) else {
            missing += 1;
            continue;
        };

        let props = properties(report);
        points.push(feature(
            Geometry::new(Value::Point(vec![round5(x), round5(y)])),
            props.clone(),
        ));
        lines.push(feature(shape.clone(), props));
    }

    if missing > 0 {
        log::info!("geometry export: {missing} segment(s) without a shape, skipped");
    }

    let collection = |features: Vec<Feature>| FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };
    (collection(points), collection(lines))
}

/// Writes a FeatureCollection to a file.
///
/// # Errors
///
/// Returns [`ExportError`] if the file cannot be created or serialized.
pub fn write_feature_collection(
    path: &Path,
    collection: &FeatureCollection,
) -> Result<(), ExportError> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer(std::io::BufWriter::new(file), collection)?;
    log::info!(
        "wrote {} feature(s) to {}",
        collection.features.len(),
        path.display()
    );
    Ok(())
}
