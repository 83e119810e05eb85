//! Listing-to-building assignment.
//!
//! Every listing is assigned to exactly one building: the building whose
//! polygon strictly contains the listing point, or failing that the
//! building nearest to it. Both lookups go through the shared R-tree and
//! resolve ties to the lowest building index.

use std::sync::Arc;

use stay_atlas_listing_models::{Assignment, Listing, MatchMethod};
use stay_atlas_progress::ProgressCallback;
use stay_atlas_spatial::PolygonIndex;

/// Assigns each listing to a building.
///
/// Returns one [`Assignment`] per listing in listing order, or none at
/// all when the index is empty.
#[must_use]
pub fn assign_listings(
    listings: &[Listing],
    buildings: &PolygonIndex,
    progress: &Arc<dyn ProgressCallback>,
) -> Vec<Assignment> {
    if buildings.is_empty() {
        log::warn!(
            "No building polygons to match against; {} listings left unassigned",
            listings.len()
        );
        return Vec::new();
    }

    progress.set_total(listings.len() as u64);

    let mut assignments = Vec::with_capacity(listings.len());
    for (listing_idx, listing) in listings.iter().enumerate() {
        if let Some(assignment) = assign_one(listing_idx, listing, buildings) {
            assignments.push(assignment);
        }
        progress.inc(1);
    }

    let nearest = assignments
        .iter()
        .filter(|a| a.method == MatchMethod::Nearest)
        .count();
    log::info!(
        "Listings matched to buildings: {}, assigned to closest building: {nearest}",
        assignments.len() - nearest
    );
    progress.finish(format!("Matched {} listings", assignments.len()));

    assignments
}

fn assign_one(listing_idx: usize, listing: &Listing, buildings: &PolygonIndex) -> Option<Assignment> {
    if let Some(building) = buildings.containing(listing.longitude, listing.latitude) {
        return Some(Assignment {
            listing: listing_idx,
            building,
            method: MatchMethod::Contained,
        });
    }

    let (building, distance) = buildings.nearest(listing.longitude, listing.latitude)?;
    log::debug!(
        "Listing row {} outside all buildings; nearest is {building} at {distance:.6}",
        listing.row
    );
    Some(Assignment {
        listing: listing_idx,
        building,
        method: MatchMethod::Nearest,
    })
}
