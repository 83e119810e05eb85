//! Per-building rollup of matched listings.

use std::collections::BTreeMap;

use geojson::Feature;
use serde_json::{Value, json};
use stay_atlas_listing_models::{Assignment, BuildingAggregate, Listing, property};

/// Groups assigned listings by building and folds them into aggregates.
///
/// Buildings with no assigned listing are absent from the result.
#[must_use]
pub fn aggregate(
    listings: &[Listing],
    assignments: &[Assignment],
) -> BTreeMap<usize, BuildingAggregate> {
    let mut by_building: BTreeMap<usize, BuildingAggregate> = BTreeMap::new();

    for assignment in assignments {
        let Some(listing) = listings.get(assignment.listing) else {
            log::warn!(
                "Assignment refers to listing {} which does not exist",
                assignment.listing
            );
            continue;
        };
        by_building
            .entry(assignment.building)
            .or_insert_with(|| BuildingAggregate::new(assignment.building))
            .add(listing);
    }

    by_building
}

/// Attaches aggregates to their building features.
///
/// Only buildings with at least one listing are returned, in their
/// input file order. Aggregate properties overwrite any existing
/// values of the same name, so enriching an already enriched file gives
/// the same result.
#[must_use]
pub fn enrich_buildings(
    buildings: Vec<Feature>,
    aggregates: &BTreeMap<usize, BuildingAggregate>,
) -> Vec<Feature> {
    buildings
        .into_iter()
        .enumerate()
        .filter_map(|(index, mut feature)| {
            let agg = aggregates.get(&index)?;
            apply_aggregate(&mut feature, agg);
            Some(feature)
        })
        .collect()
}

fn apply_aggregate(feature: &mut Feature, agg: &BuildingAggregate) {
    let host_since = agg
        .host_since
        .map_or(Value::Null, |date| json!(date.format("%Y-%m-%d").to_string()));

    feature.set_property(property::BUILDING_INDEX, agg.building_index);
    feature.set_property(property::HOST_SINCE, host_since);
    feature.set_property(property::PRICE, agg.price);
    feature.set_property(property::ACCOMMODATES, agg.accommodates);
    feature.set_property(property::AVAILABILITY_365, agg.availability_365);
    feature.set_property(property::BEDS, agg.beds);
    feature.set_property(property::BATHROOMS_TEXT, agg.bathrooms_text);
    feature.set_property(property::LISTING_COUNT, agg.listing_count);
}
