//! Segment geometry lookup for visualization.
//!
//! The yearly exports ship a `TYC_{year}.json` GeoJSON alongside each CSV
//! whose features carry the same identifying properties as the tabular
//! rows. Geometries are collected by segment key with a year preference
//! (recent definitions first), so a segment keeps the shape of the export
//! that defined it. Features with unusable properties are skipped --
//! geometry is cosmetic, never load-bearing.

use std::collections::HashMap;
use std::path::Path;

use crash_map_traffic_models::{Milepost, SegmentKey};
use geojson::{GeoJson, Geometry, Value};

use crate::ExportError;

/// Year preference for geometry, most recent definition first. 2024 is a
/// last resort: its shapes postdate the crash window.
pub const GEOMETRY_YEARS: [u16; 6] = [2023, 2022, 2021, 2020, 2019, 2024];

/// Where on a linestring the representative point sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointPlacement {
    /// First coordinate.
    Start,
    /// Halfway along the planar length.
    Midpoint,
}

/// Lookup from segment keys to exported geometries.
#[derive(Debug, Clone, Default)]
pub struct GeometryMap {
    geometries: HashMap<SegmentKey, Geometry>,
}

impl GeometryMap {
    /// Loads every `TYC_{year}.json` present under a directory, earlier
    /// preference years winning per key. A directory with no geometry at
    /// all yields an empty map, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] if a present file cannot be read or parsed.
    pub fn load_dir(dir: &Path) -> Result<Self, ExportError> {
        let mut map = Self::default();

        for year in GEOMETRY_YEARS {
            let path = dir.join(format!("TYC_{year}.json"));
            if !path.exists() {
                log::debug!("no geometry export for {year} ({})", path.display());
                continue;
            }

            let contents = std::fs::read_to_string(&path)?;
            let GeoJson::FeatureCollection(collection) = contents.parse::<GeoJson>()? else {
                log::warn!("{}: not a FeatureCollection, skipping", path.display());
                continue;
            };

            let mut added = 0_usize;
            for feature in collection.features {
                let (Some(properties), Some(geometry)) = (feature.properties, feature.geometry)
                else {
                    continue;
                };
                let Some(key) = key_from_properties(&properties) else {
                    continue;
                };
                map.geometries.entry(key).or_insert_with(|| {
                    added += 1;
                    geometry
                });
            }
            log::debug!("geometry {year}: {added} new shape(s)");
        }

        if map.is_empty() {
            log::warn!("no segment geometry found in {}", dir.display());
        }
        Ok(map)
    }

    /// Adds (or keeps the existing) geometry for a key.
    pub fn insert(&mut self, key: SegmentKey, geometry: Geometry) {
        self.geometries.entry(key).or_insert(geometry);
    }

    /// Returns the geometry for a segment key, if any export carried it.
    #[must_use]
    pub fn get(&self, key: &SegmentKey) -> Option<&Geometry> {
        self.geometries.get(key)
    }

    /// Number of keyed geometries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    /// `true` if no geometry was loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }
}

fn prop_str(properties: &geojson::JsonObject, name: &str) -> Option<String> {
    match properties.get(name)? {
        serde_json::Value::String(s) => Some(s.trim().to_string()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn key_from_properties(properties: &geojson::JsonObject) -> Option<SegmentKey> {
    let corridor_id = prop_str(properties, "CORR_ID")?.to_ascii_uppercase();
    let dept_id = prop_str(properties, "DEPT_ID")?.to_ascii_uppercase();
    let site_id = prop_str(properties, "SITE_ID")?;
    let corr_start_mp = Milepost::parse(&prop_str(properties, "CORR_MP")?).ok()?;
    let corr_end_mp = Milepost::parse(&prop_str(properties, "CORR_ENDMP")?).ok()?;

    Some(SegmentKey {
        corridor_id,
        corr_start_mp,
        corr_end_mp,
        dept_id,
        site_id,
    })
}

/// Picks a representative point on a segment's geometry.
///
/// `MultiLineString`s use their longest part. Returns `None` for empty
/// or non-line geometries.
#[must_use]
pub fn representative_point(geometry: &Geometry, placement: PointPlacement) -> Option<(f64, f64)> {
    let coords: &[Vec<f64>] = match &geometry.value {
        Value::LineString(coords) => coords,
        Value::MultiLineString(parts) => parts.iter().max_by_key(|part| part.len())?,
        _ => return None,
    };
    let first = coords.first()?;
    if first.len() < 2 {
        return None;
    }
    if placement == PointPlacement::Start || coords.len() == 1 {
        return Some((first[0], first[1]));
    }

    let lengths: Vec<f64> = coords
        .windows(2)
        .map(|pair| {
            let (a, b) = (&pair[0], &pair[1]);
            (b[0] - a[0]).hypot(b[1] - a[1])
        })
        .collect();
    let total: f64 = lengths.iter().sum();
    if total == 0.0 {
        return Some((first[0], first[1]));
    }

    let half = total / 2.0;
    let mut walked = 0.0;
    for (i, length) in lengths.iter().enumerate() {
        if walked + length >= half {
            let (a, b) = (&coords[i], &coords[i + 1]);
            let t = if *length == 0.0 { 0.0 } else { (half - walked) / length };
            return Some((a[0] + (b[0] - a[0]) * t, a[1] + (b[1] - a[1]) * t));
        }
        walked += length;
    }

    let last = coords.last()?;
    Some((last[0], last[1]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(coords: Vec<Vec<f64>>) -> Geometry {
        Geometry::new(Value::LineString(coords))
    }

    #[test]
    fn start_placement_takes_the_first_coordinate() {
        let geometry = line(vec![vec![-112.0, 46.5], vec![-112.1, 46.6]]);
        assert_eq!(
            representative_point(&geometry, PointPlacement::Start),
            Some((-112.0, 46.5))
        );
    }

    #[test]
    fn midpoint_walks_half_the_length() {
        let geometry = line(vec![vec![0.0, 0.0], vec![4.0, 0.0], vec![4.0, 4.0]]);
        let (x, y) = representative_point(&geometry, PointPlacement::Midpoint).unwrap();
        assert!((x - 4.0).abs() < 1e-12);
        assert!((y - 0.0).abs() < 1e-12);
    }

    #[test]
    fn multilinestring_uses_its_longest_part() {
        let geometry = Geometry::new(Value::MultiLineString(vec![
            vec![vec![9.0, 9.0], vec![9.1, 9.0]],
            vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![2.0, 0.0]],
        ]));
        assert_eq!(
            representative_point(&geometry, PointPlacement::Start),
            Some((0.0, 0.0))
        );
    }

    #[test]
    fn point_geometry_has_no_representative_point() {
        let geometry = Geometry::new(Value::Point(vec![0.0, 0.0]));
        assert_eq!(representative_point(&geometry, PointPlacement::Start), None);
    }

    #[test]
    fn keys_parse_from_feature_properties() {
        let mut properties = geojson::JsonObject::new();
        properties.insert("CORR_ID".to_string(), serde_json::json!("c000001"));
        properties.insert("DEPT_ID".to_string(), serde_json::json!("p-1"));
        properties.insert("SITE_ID".to_string(), serde_json::json!("40-1-2"));
        properties.insert("CORR_MP".to_string(), serde_json::json!("000+0.0"));
        properties.insert("CORR_ENDMP".to_string(), serde_json::json!("002+0.5"));

        let key = key_from_properties(&properties).unwrap();
        assert_eq!(key.corridor_id, "C000001");
        assert_eq!(key.dept_id, "P-1");
        assert_eq!(key.corr_start_mp, Milepost::new(0.0));
        assert_eq!(key.corr_end_mp, Milepost::new(2.5));

        properties.remove("CORR_MP");
        assert!(key_from_properties(&properties).is_none());
    }
}
