#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Neighborhood enrichment.
//!
//! Finds the enriched buildings lying entirely inside each neighborhood
//! polygon and writes listing statistics onto the neighborhood features.
//! Buildings straddling a boundary, or outside every neighborhood, count
//! toward none.

pub mod stats;

use std::path::Path;
use std::sync::Arc;

use geojson::Feature;
use serde_json::Value;
use stay_atlas_features::FeatureError;
use stay_atlas_neighborhood_models::{
    NAME_PROPERTIES, NeighborhoodStats, RankedNeighborhood, property,
};
use stay_atlas_progress::ProgressCallback;
use stay_atlas_spatial::PolygonIndex;
use thiserror::Error;

/// Neighborhoods reported in [`EnrichSummary::top`].
pub const TOP_NEIGHBORHOODS: usize = 5;

/// Errors that can occur during neighborhood enrichment.
#[derive(Debug, Error)]
pub enum NeighborhoodError {
    /// Reading or writing a feature file failed.
    #[error(transparent)]
    Features(#[from] FeatureError),
}

/// Outcome of an enrichment run.
#[derive(Debug, Clone, Default)]
pub struct EnrichSummary {
    pub neighborhoods: usize,
    pub buildings_loaded: usize,
    /// Neighborhoods with at least one listing.
    pub neighborhoods_with_listings: usize,
    pub listings_total: u64,
    pub total_guests_per_night: f64,
    pub guest_night_capacity_per_year: f64,
    pub total_price_per_night: f64,
    /// Neighborhoods with the most listings, most first.
    pub top: Vec<RankedNeighborhood>,
}

/// Computes statistics for every neighborhood and writes the result.
///
/// `output_path` may be the same file as `neighborhoods_path`; stats
/// fields are overwritten on each run.
///
/// # Errors
///
/// Returns [`NeighborhoodError`] if an input cannot be read or the output
/// cannot be written.
pub fn enrich_neighborhoods(
    neighborhoods_path: &Path,
    buildings_path: &Path,
    output_path: &Path,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<EnrichSummary, NeighborhoodError> {
    let mut neighborhoods = stay_atlas_features::read_collection(neighborhoods_path)?;
    log::info!("Loaded {} neighborhoods", neighborhoods.len());

    let buildings = stay_atlas_features::read_collection(buildings_path)?;
    log::info!("Loaded {} buildings", buildings.len());
    let index = PolygonIndex::new(stay_atlas_features::feature_polygons(&buildings));

    let all_stats = compute_all(&mut neighborhoods, &buildings, &index, progress);

    let summary = summarize(&neighborhoods, &all_stats, buildings.len());

    stay_atlas_features::write_collection(output_path, neighborhoods)?;

    Ok(summary)
}

fn compute_all(
    neighborhoods: &mut [Feature],
    buildings: &[Feature],
    index: &PolygonIndex,
    progress: &Arc<dyn ProgressCallback>,
) -> Vec<NeighborhoodStats> {
    let total = neighborhoods.len();
    progress.set_total(total as u64);
    progress.set_message("Enriching neighborhoods".to_string());

    let mut all_stats = Vec::with_capacity(total);
    for (i, neighborhood) in neighborhoods.iter_mut().enumerate() {
        let figures: Vec<_> = neighborhood
            .geometry
            .as_ref()
            .and_then(stay_atlas_features::to_multi_polygon)
            .map(|region| index.within(&region))
            .unwrap_or_default()
            .into_iter()
            .map(|b| stats::building_figures(&buildings[b]))
            .collect();

        let stats = stats::compute_stats(&figures);
        apply_stats(neighborhood, &stats);
        all_stats.push(stats);

        progress.inc(1);
        if (i + 1) % 10 == 0 {
            log::info!("Processed {}/{total} neighborhoods...", i + 1);
        }
    }

    progress.finish(format!("Enriched {total} neighborhoods"));
    all_stats
}

fn apply_stats(feature: &mut Feature, stats: &NeighborhoodStats) {
    let optional = |v: Option<f64>| v.map_or(Value::Null, Value::from);

    feature.set_property(property::LISTINGS_TOTAL, stats.listings_total);
    feature.set_property(property::TOTAL_GUESTS_PER_NIGHT, stats.total_guests_per_night);
    feature.set_property(
        property::GUEST_NIGHT_CAPACITY_PER_YEAR,
        stats.guest_night_capacity_per_year,
    );
    feature.set_property(property::TOTAL_PRICE_PER_NIGHT, stats.total_price_per_night);
    feature.set_property(property::MEDIAN_PRICE_PER_UNIT, optional(stats.median_price_per_unit));
    feature.set_property(property::MAX_PRICE_PER_UNIT, optional(stats.max_price_per_unit));
    feature.set_property(property::MIN_PRICE_PER_UNIT, optional(stats.min_price_per_unit));
}

fn summarize(
    neighborhoods: &[Feature],
    all_stats: &[NeighborhoodStats],
    buildings_loaded: usize,
) -> EnrichSummary {
    let mut summary = EnrichSummary {
        neighborhoods: neighborhoods.len(),
        buildings_loaded,
        ..EnrichSummary::default()
    };

    for stats in all_stats {
        if stats.has_listings() {
            summary.neighborhoods_with_listings += 1;
        }
        summary.listings_total += stats.listings_total;
        summary.total_guests_per_night += stats.total_guests_per_night;
        summary.guest_night_capacity_per_year += stats.guest_night_capacity_per_year;
        summary.total_price_per_night += stats.total_price_per_night;
    }

    let mut ranked: Vec<usize> = (0..all_stats.len()).collect();
    // Stable, so ties keep file order.
    ranked.sort_by(|&a, &b| all_stats[b].listings_total.cmp(&all_stats[a].listings_total));
    summary.top = ranked
        .into_iter()
        .take(TOP_NEIGHBORHOODS)
        .map(|i| RankedNeighborhood {
            name: display_name(&neighborhoods[i]),
            stats: all_stats[i].clone(),
        })
        .collect();

    summary
}

/// The first non-null name-like property of a neighborhood, or `Unknown`.
#[must_use]
pub fn display_name(feature: &Feature) -> String {
    NAME_PROPERTIES
        .iter()
        .find_map(|key| match feature.property(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
        .unwrap_or_else(|| "Unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stay_atlas_progress::null_progress;

    fn ring(x0: f64, y0: f64, size: f64) -> Value {
        json!([[[x0, y0], [x0 + size, y0], [x0 + size, y0 + size], [x0, y0 + size], [x0, y0]]])
    }

    fn building_feature(x0: f64, y0: f64, listing_count: u64, accommodates: f64, price: f64) -> Value {
        json!({
            "type": "Feature",
            "geometry": { "type": "Polygon", "coordinates": ring(x0, y0, 1.0) },
            "properties": {
                "listing_count": listing_count,
                "accommodates": accommodates,
                "availability_365": 100.0,
                "price": price,
            }
        })
    }

    fn neighborhood_feature(name_key: &str, name: &str, x0: f64) -> Value {
        let mut properties = serde_json::Map::new();
        properties.insert(name_key.to_string(), json!(name));
        json!({
            "type": "Feature",
            "geometry": { "type": "Polygon", "coordinates": ring(x0, 0.0, 10.0) },
            "properties": properties
        })
    }

    fn write(path: &Path, features: Vec<Value>) {
        let collection = json!({ "type": "FeatureCollection", "features": features });
        std::fs::write(path, collection.to_string()).unwrap();
    }

    fn fixture(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
        let _ = std::fs::remove_dir_all(dir);
        std::fs::create_dir_all(dir).unwrap();

        let buildings = dir.join("buildings.geojson");
        write(
            &buildings,
            vec![
                building_feature(1.0, 1.0, 2, 4.0, 200.0),  // in Cannaregio
                building_feature(5.0, 5.0, 3, 2.0, 90.0),   // in Cannaregio
                building_feature(9.5, 1.0, 7, 2.0, 500.0),  // straddles both
                building_feature(12.0, 1.0, 1, 3.0, 60.0),  // in Dorsoduro
                building_feature(50.0, 50.0, 9, 1.0, 10.0), // outside all
            ],
        );

        let neighborhoods = dir.join("neighborhoods.geojson");
        write(
            &neighborhoods,
            vec![
                neighborhood_feature("nome", "Cannaregio", 0.0),
                neighborhood_feature("name", "Dorsoduro", 10.0),
                neighborhood_feature("other", "Lido", 100.0),
            ],
        );

        (neighborhoods, buildings)
    }

    #[test]
    fn listings_total_sums_strictly_contained_buildings() {
        let dir = std::env::temp_dir().join("stay_atlas_neighborhood_enrich");
        let (neighborhoods, buildings) = fixture(&dir);
        let output = dir.join("enriched.geojson");

        let summary = enrich_neighborhoods(&neighborhoods, &buildings, &output, &null_progress()).unwrap();

        assert_eq!(summary.neighborhoods, 3);
        assert_eq!(summary.buildings_loaded, 5);
        assert_eq!(summary.neighborhoods_with_listings, 2);
        assert_eq!(summary.listings_total, 6);

        let written = stay_atlas_features::read_collection(&output).unwrap();
        assert_eq!(written[0].property(property::LISTINGS_TOTAL), Some(&json!(5)));
        assert_eq!(written[1].property(property::LISTINGS_TOTAL), Some(&json!(1)));
        assert_eq!(written[2].property(property::LISTINGS_TOTAL), Some(&json!(0)));
        assert_eq!(written[2].property(property::MEDIAN_PRICE_PER_UNIT), Some(&Value::Null));

        // 4 * 2 + 2 * 3
        assert_eq!(
            written[0].property(property::TOTAL_GUESTS_PER_NIGHT),
            Some(&json!(14.0))
        );
        // unit prices 100 and 30
        assert_eq!(written[0].property(property::MEDIAN_PRICE_PER_UNIT), Some(&json!(65.0)));
        assert_eq!(written[0].property("nome"), Some(&json!("Cannaregio")));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn top_neighborhoods_are_ranked_with_display_names() {
        let dir = std::env::temp_dir().join("stay_atlas_neighborhood_top");
        let (neighborhoods, buildings) = fixture(&dir);
        let output = dir.join("enriched.geojson");

        let summary = enrich_neighborhoods(&neighborhoods, &buildings, &output, &null_progress()).unwrap();

        let names: Vec<_> = summary.top.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Cannaregio", "Dorsoduro", "Unknown"]);
        assert_eq!(summary.top[0].stats.listings_total, 5);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn enriching_in_place_twice_is_stable() {
        let dir = std::env::temp_dir().join("stay_atlas_neighborhood_in_place");
        let (neighborhoods, buildings) = fixture(&dir);

        enrich_neighborhoods(&neighborhoods, &buildings, &neighborhoods, &null_progress()).unwrap();
        let first = std::fs::read_to_string(&neighborhoods).unwrap();
        enrich_neighborhoods(&neighborhoods, &buildings, &neighborhoods, &null_progress()).unwrap();
        let second = std::fs::read_to_string(&neighborhoods).unwrap();

        assert_eq!(first, second);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn display_name_prefers_neighbourhood_then_name() {
        let feature: Feature = serde_json::from_value(json!({
            "type": "Feature",
            "geometry": null,
            "properties": { "name": "San Marco", "neighbourhood": "Castello", "NOME": null }
        }))
        .unwrap();
        assert_eq!(display_name(&feature), "Castello");

        let nameless: Feature = serde_json::from_value(json!({
            "type": "Feature",
            "geometry": null,
            "properties": { "NOME": null }
        }))
        .unwrap();
        assert_eq!(display_name(&nameless), "Unknown");
    }
}
