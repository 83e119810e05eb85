#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! `GeoJSON` file handling shared by every pipeline step.
//!
//! Each step reads one or more `FeatureCollection` files and writes one
//! back. This crate owns the file format concerns: parsing, polygon
//! normalization into [`MultiPolygon`], lenient property access, and the
//! browser-friendly pretty-printed output.

pub mod properties;

use std::path::Path;

use geo::MultiPolygon;
use geojson::{Feature, FeatureCollection, GeoJson};
use thiserror::Error;

/// Errors that can occur while reading or writing feature files.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// I/O error (file read/write).
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File that was being accessed.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file is not valid `GeoJSON`.
    #[error("GeoJSON error in {path}: {source}")]
    GeoJson {
        /// File that was being parsed.
        path: String,
        /// Underlying error.
        source: Box<geojson::Error>,
    },

    /// The document parsed but is not a `FeatureCollection`.
    #[error("{path} is not a FeatureCollection")]
    NotACollection {
        /// File that was being parsed.
        path: String,
    },
}

/// Reads every feature from a `GeoJSON` `FeatureCollection` file.
///
/// # Errors
///
/// Returns [`FeatureError`] if the file cannot be read or does not
/// contain a `FeatureCollection`.
pub fn read_collection(path: &Path) -> Result<Vec<Feature>, FeatureError> {
    let text = std::fs::read_to_string(path).map_err(|source| FeatureError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let geojson: GeoJson = text.parse().map_err(|e| FeatureError::GeoJson {
        path: path.display().to_string(),
        source: Box::new(e),
    })?;

    match geojson {
        GeoJson::FeatureCollection(collection) => {
            log::debug!(
                "Read {} features from {}",
                collection.features.len(),
                path.display()
            );
            Ok(collection.features)
        }
        GeoJson::Feature(_) | GeoJson::Geometry(_) => Err(FeatureError::NotACollection {
            path: path.display().to_string(),
        }),
    }
}

/// Writes features as a pretty-printed `FeatureCollection`.
///
/// Parent directories are created as needed. Control characters are
/// stripped from every string property first; non-ASCII text is written
/// as-is.
///
/// # Errors
///
/// Returns [`FeatureError`] if serialization or the file write fails.
pub fn write_collection(path: &Path, mut features: Vec<Feature>) -> Result<(), FeatureError> {
    for feature in &mut features {
        if let Some(props) = feature.properties.as_mut() {
            for value in props.values_mut() {
                properties::strip_control_chars(value);
            }
        }
    }

    let count = features.len();
    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };
    let json = serde_json::to_string_pretty(&collection)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|source| FeatureError::Io {
            path: parent.display().to_string(),
            source,
        })?;
    }

    std::fs::write(path, json).map_err(|source| FeatureError::Io {
        path: path.display().to_string(),
        source,
    })?;

    log::info!("Wrote {count} features to {}", path.display());
    Ok(())
}

/// Converts a `GeoJSON` geometry into a [`MultiPolygon`].
///
/// Handles both `Polygon` and `MultiPolygon` geometry types; anything
/// else yields `None`.
#[must_use]
pub fn to_multi_polygon(geometry: &geojson::Geometry) -> Option<MultiPolygon<f64>> {
    let geo_geom: geo::Geometry<f64> = geometry.clone().try_into().ok()?;
    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}

/// Extracts the polygon of every feature, keeping the feature order.
///
/// Features without a polygonal geometry map to `None` so positional
/// indexes stay aligned with the input file.
#[must_use]
pub fn feature_polygons(features: &[Feature]) -> Vec<Option<MultiPolygon<f64>>> {
    features
        .iter()
        .map(|feature| feature.geometry.as_ref().and_then(to_multi_polygon))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_feature(name: &str) -> Feature {
        let geometry = geojson::Geometry::new(geojson::Value::Polygon(vec![vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
            vec![0.0, 1.0],
            vec![0.0, 0.0],
        ]]));
        let mut props = geojson::JsonObject::new();
        props.insert("name".to_string(), serde_json::json!(name));
        Feature {
            bbox: None,
            geometry: Some(geometry),
            id: None,
            properties: Some(props),
            foreign_members: None,
        }
    }

    #[test]
    fn write_then_read_keeps_features_and_strips_control_chars() {
        let tmp = std::env::temp_dir().join("stay_atlas_features_write_read");
        let _ = std::fs::remove_dir_all(&tmp);
        let path = tmp.join("nested").join("out.geojson");

        write_collection(&path, vec![square_feature("Ca'\u{0}Foscari\u{1f}")]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  \"type\""), "expected 2-space indent");
        assert!(text.contains("Ca'Foscari"));

        let features = read_collection(&path).unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(
            features[0].property("name"),
            Some(&serde_json::json!("Ca'Foscari"))
        );

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn non_ascii_written_unescaped() {
        let tmp = std::env::temp_dir().join("stay_atlas_features_utf8");
        let _ = std::fs::remove_dir_all(&tmp);
        let path = tmp.join("out.geojson");

        write_collection(&path, vec![square_feature("Cannaregio é")]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("Cannaregio é"));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn reading_a_bare_geometry_is_an_error() {
        let tmp = std::env::temp_dir().join("stay_atlas_features_bare_geometry");
        let _ = std::fs::remove_dir_all(&tmp);
        std::fs::create_dir_all(&tmp).unwrap();
        let path = tmp.join("point.geojson");
        std::fs::write(&path, r#"{"type":"Point","coordinates":[12.3,45.4]}"#).unwrap();

        assert!(matches!(
            read_collection(&path),
            Err(FeatureError::NotACollection { .. })
        ));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn polygons_normalize_to_multi_polygons() {
        let feature = square_feature("a");
        let mp = to_multi_polygon(feature.geometry.as_ref().unwrap()).unwrap();
        assert_eq!(mp.0.len(), 1);

        let point = geojson::Geometry::new(geojson::Value::Point(vec![0.5, 0.5]));
        assert!(to_multi_polygon(&point).is_none());
    }

    #[test]
    fn feature_polygons_keep_positions_for_missing_geometry() {
        let mut no_geometry = square_feature("b");
        no_geometry.geometry = None;

        let polygons = feature_polygons(&[square_feature("a"), no_geometry]);
        assert_eq!(polygons.len(), 2);
        assert!(polygons[0].is_some());
        assert!(polygons[1].is_none());
    }
}
