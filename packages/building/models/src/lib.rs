#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Building types shared by the fetcher, classifier and downstream steps.
//!
//! Defines the coarse building category taxonomy, the subset of OSM tags
//! kept on every building feature, and the Overpass API response shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

/// Property name holding the classified category on building features.
pub const CLASSIFIED_PROPERTY: &str = "building_type_classified";

/// Coarse building category derived from OSM tags.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BuildingCategory {
    /// Hotels, hostels and tourist apartments
    Hotel,
    /// Restaurants, cafes, bars and fast food
    Restaurant,
    /// Schools, colleges and universities
    Education,
    /// Hospitals, clinics and pharmacies
    Healthcare,
    /// Churches and other places of worship
    Religious,
    /// Shops and retail buildings
    Commercial,
    /// Offices
    Office,
    /// Leisure facilities
    Leisure,
    /// Houses and apartment buildings
    Residential,
    /// Industrial buildings and warehouses
    Industrial,
    /// Public and civic buildings
    Public,
    /// Garages and parking structures
    Parking,
    /// Anything the rules do not recognize
    Unknown,
}

impl BuildingCategory {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Hotel,
            Self::Restaurant,
            Self::Education,
            Self::Healthcare,
            Self::Religious,
            Self::Commercial,
            Self::Office,
            Self::Leisure,
            Self::Residential,
            Self::Industrial,
            Self::Public,
            Self::Parking,
            Self::Unknown,
        ]
    }
}

/// The OSM tags kept on a building feature.
///
/// Absent tags are empty strings, except `building` which defaults to
/// `"unknown"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingTags {
    pub building: String,
    pub name: String,
    pub amenity: String,
    pub tourism: String,
    pub shop: String,
    pub office: String,
    pub leisure: String,
    pub building_levels: String,
    pub addr_street: String,
    pub addr_housenumber: String,
}

impl BuildingTags {
    /// Extracts the kept tags from a raw OSM tag map.
    #[must_use]
    pub fn from_osm_tags(tags: &BTreeMap<String, String>) -> Self {
        let get = |key: &str| tags.get(key).cloned().unwrap_or_default();
        Self {
            building: tags
                .get("building")
                .cloned()
                .unwrap_or_else(|| "unknown".to_string()),
            name: get("name"),
            amenity: get("amenity"),
            tourism: get("tourism"),
            shop: get("shop"),
            office: get("office"),
            leisure: get("leisure"),
            building_levels: get("building:levels"),
            addr_street: get("addr:street"),
            addr_housenumber: get("addr:housenumber"),
        }
    }

    /// Reads the kept tags back from feature properties.
    ///
    /// Non-string values are treated as absent.
    #[must_use]
    pub fn from_properties(props: &serde_json::Map<String, serde_json::Value>) -> Self {
        let get = |key: &str| {
            props
                .get(key)
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
                .unwrap_or_default()
        };
        let building = get("building");
        Self {
            building: if building.is_empty() {
                "unknown".to_string()
            } else {
                building
            },
            name: get("name"),
            amenity: get("amenity"),
            tourism: get("tourism"),
            shop: get("shop"),
            office: get("office"),
            leisure: get("leisure"),
            building_levels: get("building_levels"),
            addr_street: get("addr_street"),
            addr_housenumber: get("addr_housenumber"),
        }
    }

    /// Returns the tag value by its property name.
    #[must_use]
    pub fn get(&self, key: TagKey) -> &str {
        match key {
            TagKey::Building => &self.building,
            TagKey::Amenity => &self.amenity,
            TagKey::Tourism => &self.tourism,
            TagKey::Shop => &self.shop,
            TagKey::Office => &self.office,
            TagKey::Leisure => &self.leisure,
        }
    }
}

/// Tags that take part in classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum TagKey {
    Building,
    Amenity,
    Tourism,
    Shop,
    Office,
    Leisure,
}

/// Top-level Overpass interpreter response (`[out:json]`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
}

/// A single OSM element as returned with `out geom`.
#[derive(Debug, Clone, Deserialize)]
pub struct OverpassElement {
    #[serde(rename = "type")]
    pub element_type: ElementType,
    pub id: i64,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    /// Inline node coordinates, present on ways.
    pub geometry: Option<Vec<Coordinate>>,
}

/// OSM element kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Node,
    Way,
    Relation,
    #[serde(other)]
    Other,
}

/// A `{ "lat": .., "lon": .. }` pair inside way geometry.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_strings_are_snake_case() {
        assert_eq!(BuildingCategory::Hotel.to_string(), "hotel");
        assert_eq!(BuildingCategory::Unknown.as_ref(), "unknown");
        assert_eq!(
            serde_json::to_value(BuildingCategory::Parking).unwrap(),
            serde_json::json!("parking")
        );
        assert_eq!(BuildingCategory::all().len(), 13);
    }

    #[test]
    fn osm_tags_default_building_to_unknown() {
        let mut tags = BTreeMap::new();
        tags.insert("addr:street".to_string(), "Calle Larga".to_string());
        tags.insert("building:levels".to_string(), "3".to_string());

        let parsed = BuildingTags::from_osm_tags(&tags);
        assert_eq!(parsed.building, "unknown");
        assert_eq!(parsed.addr_street, "Calle Larga");
        assert_eq!(parsed.building_levels, "3");
        assert_eq!(parsed.shop, "");
    }

    #[test]
    fn parses_overpass_elements() {
        let json = r#"{
            "version": 0.6,
            "elements": [
                {"type": "node", "id": 1, "lat": 45.4, "lon": 12.3},
                {"type": "way", "id": 2, "tags": {"building": "yes"},
                 "geometry": [{"lat": 45.0, "lon": 12.0}, {"lat": 45.1, "lon": 12.1}]},
                {"type": "area", "id": 3}
            ]
        }"#;
        let response: OverpassResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.elements.len(), 3);
        assert_eq!(response.elements[0].element_type, ElementType::Node);
        assert!(response.elements[0].geometry.is_none());
        assert_eq!(response.elements[1].element_type, ElementType::Way);
        assert_eq!(response.elements[1].geometry.as_ref().unwrap().len(), 2);
        assert_eq!(response.elements[2].element_type, ElementType::Other);
    }
}
