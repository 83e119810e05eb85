//! Converts Overpass elements into `GeoJSON` building polygons.
//!
//! Only ways with inline geometry (`out geom`) become features. Building
//! relations are skipped: assembling their member ways into
//! multipolygons is not needed for footprint-level aggregation.

use geojson::{Feature, Geometry, JsonObject, Value};
use stay_atlas_building_models::{BuildingTags, ElementType, OverpassElement, OverpassResponse};

/// Minimum ring length, including the closing coordinate.
const MIN_RING_LEN: usize = 4;

/// Converts every convertible element into a building feature.
#[must_use]
pub fn convert_elements(response: &OverpassResponse) -> Vec<Feature> {
    let features: Vec<Feature> = response.elements.iter().filter_map(way_to_feature).collect();

    log::info!(
        "Converted {} buildings to GeoJSON from {} elements",
        features.len(),
        response.elements.len()
    );

    features
}

/// Converts a single way into a polygon feature.
///
/// Returns `None` for non-way elements, ways without geometry, and
/// rings that are too short to form a polygon once closed.
fn way_to_feature(element: &OverpassElement) -> Option<Feature> {
    if element.element_type != ElementType::Way {
        return None;
    }
    let geometry = element.geometry.as_ref()?;

    let mut ring: Vec<Vec<f64>> = geometry.iter().map(|c| vec![c.lon, c.lat]).collect();

    if ring.len() > 2 && ring.first() != ring.last() {
        let first = ring[0].clone();
        ring.push(first);
    }

    if ring.len() < MIN_RING_LEN {
        log::debug!("Skipping way {}: ring has {} coordinates", element.id, ring.len());
        return None;
    }

    let tags = BuildingTags::from_osm_tags(&element.tags);

    Some(Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Polygon(vec![ring]))),
        id: None,
        properties: Some(tag_properties(element.id, tags)),
        foreign_members: None,
    })
}

/// Builds the property object for a converted way.
fn tag_properties(way_id: i64, tags: BuildingTags) -> JsonObject {
    let BuildingTags {
        building,
        name,
        amenity,
        tourism,
        shop,
        office,
        leisure,
        building_levels,
        addr_street,
        addr_housenumber,
    } = tags;

    let mut props = JsonObject::new();
    props.insert("id".to_string(), format!("way_{way_id}").into());
    props.insert("building".to_string(), building.into());
    props.insert("name".to_string(), name.into());
    props.insert("amenity".to_string(), amenity.into());
    props.insert("tourism".to_string(), tourism.into());
    props.insert("shop".to_string(), shop.into());
    props.insert("office".to_string(), office.into());
    props.insert("leisure".to_string(), leisure.into());
    props.insert("building_levels".to_string(), building_levels.into());
    props.insert("addr_street".to_string(), addr_street.into());
    props.insert("addr_housenumber".to_string(), addr_housenumber.into());
    props
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> OverpassResponse {
        serde_json::from_str(json).unwrap()
    }

    fn ring_of(feature: &Feature) -> Vec<Vec<f64>> {
        match &feature.geometry.as_ref().unwrap().value {
            Value::Polygon(rings) => rings[0].clone(),
            other => panic!("expected polygon, got {other:?}"),
        }
    }

    #[test]
    fn open_way_is_closed() {
        let response = parse(
            r#"{"elements": [{"type": "way", "id": 7, "tags": {"building": "house", "addr:street": "Fondamenta"},
                "geometry": [{"lat": 0.0, "lon": 0.0}, {"lat": 0.0, "lon": 1.0}, {"lat": 1.0, "lon": 1.0}]}]}"#,
        );
        let features = convert_elements(&response);
        assert_eq!(features.len(), 1);

        let ring = ring_of(&features[0]);
        assert_eq!(ring.len(), 4);
        assert_eq!(ring[0], vec![0.0, 0.0]);
        assert_eq!(ring[1], vec![1.0, 0.0], "coordinates are [lon, lat]");
        assert_eq!(ring.first(), ring.last());

        assert_eq!(features[0].property("id"), Some(&serde_json::json!("way_7")));
        assert_eq!(features[0].property("building"), Some(&serde_json::json!("house")));
        assert_eq!(
            features[0].property("addr_street"),
            Some(&serde_json::json!("Fondamenta"))
        );
        assert_eq!(features[0].property("shop"), Some(&serde_json::json!("")));
    }

    #[test]
    fn closed_way_is_kept_as_is() {
        let response = parse(
            r#"{"elements": [{"type": "way", "id": 8,
                "geometry": [{"lat": 0.0, "lon": 0.0}, {"lat": 0.0, "lon": 1.0},
                             {"lat": 1.0, "lon": 1.0}, {"lat": 0.0, "lon": 0.0}]}]}"#,
        );
        let features = convert_elements(&response);
        assert_eq!(ring_of(&features[0]).len(), 4);
        assert_eq!(features[0].property("building"), Some(&serde_json::json!("unknown")));
    }

    #[test]
    fn degenerate_and_non_way_elements_are_skipped() {
        let response = parse(
            r#"{"elements": [
                {"type": "way", "id": 1, "geometry": [{"lat": 0.0, "lon": 0.0}, {"lat": 1.0, "lon": 1.0}]},
                {"type": "way", "id": 2, "geometry": [{"lat": 0.0, "lon": 0.0}, {"lat": 1.0, "lon": 1.0}, {"lat": 0.0, "lon": 0.0}]},
                {"type": "way", "id": 3, "tags": {"building": "yes"}},
                {"type": "node", "id": 4, "lat": 0.0, "lon": 0.0},
                {"type": "relation", "id": 5, "tags": {"building": "yes"}}
            ]}"#,
        );
        assert!(convert_elements(&response).is_empty());
    }
}
