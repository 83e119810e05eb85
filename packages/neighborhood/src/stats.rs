//! Building-to-neighborhood rollup arithmetic.

use geojson::Feature;
use stay_atlas_features::properties::number_or_zero;
use stay_atlas_listing_models::property as building;
use stay_atlas_neighborhood_models::{BuildingFigures, NeighborhoodStats};

/// Reads the rollup inputs from an enriched building feature.
#[must_use]
pub fn building_figures(feature: &Feature) -> BuildingFigures {
    BuildingFigures {
        listing_count: number_or_zero(feature, building::LISTING_COUNT),
        accommodates: number_or_zero(feature, building::ACCOMMODATES),
        availability_365: number_or_zero(feature, building::AVAILABILITY_365),
        price: number_or_zero(feature, building::PRICE),
    }
}

/// Computes neighborhood statistics from the buildings inside it.
///
/// The unit-price fields consider only buildings with a positive price
/// and listing count, and stay `None` when there are no such buildings.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn compute_stats(buildings: &[BuildingFigures]) -> NeighborhoodStats {
    let mut listings_total = 0.0;
    let mut stats = NeighborhoodStats::default();
    let mut unit_prices = Vec::new();

    for b in buildings {
        listings_total += b.listing_count;
        stats.total_guests_per_night += b.accommodates * b.listing_count;
        stats.guest_night_capacity_per_year += b.accommodates * b.availability_365 * b.listing_count;
        stats.total_price_per_night += b.price;

        if b.price > 0.0 && b.listing_count > 0.0 {
            unit_prices.push(b.price / b.listing_count);
        }
    }

    stats.listings_total = listings_total.max(0.0).round() as u64;

    unit_prices.sort_by(f64::total_cmp);
    stats.median_price_per_unit = median(&unit_prices);
    stats.min_price_per_unit = unit_prices.first().copied();
    stats.max_price_per_unit = unit_prices.last().copied();

    stats
}

/// Median of an ascending slice; the mean of the two middle values for
/// even lengths.
fn median(sorted: &[f64]) -> Option<f64> {
    let mid = sorted.len() / 2;
    match sorted.len() {
        0 => None,
        n if n % 2 == 1 => Some(sorted[mid]),
        _ => Some(f64::midpoint(sorted[mid - 1], sorted[mid])),
    }
}
