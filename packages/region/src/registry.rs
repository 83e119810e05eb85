//! Compile-time registry of region definitions.
//!
//! Each entry is a `(name, toml_content)` pair embedded via `include_str!`.
//! Adding a municipality requires creating a TOML file in `regions/` and
//! adding a corresponding entry here.

use crate::{RegionDefinition, RegionError};

/// Number of registered regions. Enforced by a test.
#[cfg(test)]
const EXPECTED_REGION_COUNT: usize = 1;

/// Embedded TOML region definitions.
const REGION_TOMLS: &[(&str, &str)] = &[("venice", include_str!("../regions/venice.toml"))];

/// Returns all registered regions.
///
/// # Panics
///
/// Panics if any embedded TOML file fails to parse. Since these are
/// compile-time constants, parse failures indicate a development error
/// and are caught by the tests below.
#[must_use]
pub fn all_regions() -> Vec<RegionDefinition> {
    REGION_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse region '{name}': {e}"))
        })
        .collect()
}

/// Looks up a region by id.
///
/// # Errors
///
/// Returns [`RegionError::Unknown`] if no region has the given id.
pub fn find_region(id: &str) -> Result<RegionDefinition, RegionError> {
    let regions = all_regions();
    let available = regions
        .iter()
        .map(RegionDefinition::id)
        .collect::<Vec<_>>()
        .join(", ");

    regions
        .into_iter()
        .find(|r| r.id == id)
        .ok_or_else(|| RegionError::Unknown {
            id: id.to_string(),
            available,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn loads_all_regions() {
        let regions = all_regions();
        assert_eq!(
            regions.len(),
            EXPECTED_REGION_COUNT,
            "Expected {EXPECTED_REGION_COUNT} regions, found {}. \
             Update EXPECTED_REGION_COUNT after adding/removing regions.",
            regions.len()
        );
    }

    #[test]
    fn region_ids_are_unique() {
        let mut seen = BTreeSet::new();
        for region in &all_regions() {
            assert!(seen.insert(region.id.clone()), "Duplicate region ID: {}", region.id);
        }
    }

    #[test]
    fn all_regions_have_required_fields() {
        for region in &all_regions() {
            assert!(!region.id.is_empty(), "Region has empty id");
            assert!(!region.name.is_empty(), "Region {} has empty name", region.id);
            assert!(
                region.overpass.url.starts_with("http"),
                "Region {} has invalid Overpass URL",
                region.id
            );
            assert!(
                !region.overpass.istat_code.is_empty(),
                "Region {} has empty ISTAT code",
                region.id
            );
        }
    }

    #[test]
    fn venice_definition() {
        let venice = find_region("venice").unwrap();
        assert_eq!(venice.overpass.istat_code, "027042");
        assert_eq!(venice.overpass.relation_id, 44741);
        assert_eq!(venice.overpass.timeout_secs, 600);
        assert!(
            venice
                .paths
                .listing_buildings
                .ends_with("venice_airbnb_buildings.geojson")
        );
    }

    #[test]
    fn unknown_region_lists_available_ids() {
        let err = find_region("atlantis").unwrap_err();
        assert!(err.to_string().contains("venice"));
    }
}
