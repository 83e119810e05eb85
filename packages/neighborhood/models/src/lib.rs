#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Neighborhood statistic types.
//!
//! A [`NeighborhoodStats`] is computed from the enriched buildings lying
//! entirely inside one neighborhood polygon. Its fields are written onto
//! the neighborhood feature under the names in [`property`].

use serde::{Deserialize, Serialize};

/// Property names written on enriched neighborhood features.
pub mod property {
    pub const LISTINGS_TOTAL: &str = "listings_total";
    pub const TOTAL_GUESTS_PER_NIGHT: &str = "total_guests_per_night";
    pub const GUEST_NIGHT_CAPACITY_PER_YEAR: &str = "guest_night_capacity_per_year";
    pub const TOTAL_PRICE_PER_NIGHT: &str = "total_price_per_night";
    pub const MEDIAN_PRICE_PER_UNIT: &str = "median_price_per_unit";
    pub const MAX_PRICE_PER_UNIT: &str = "max_price_per_unit";
    pub const MIN_PRICE_PER_UNIT: &str = "min_price_per_unit";
}

/// Neighborhood property keys tried in order for a display name.
pub const NAME_PROPERTIES: [&str; 4] = ["neighbourhood", "name", "NOME", "nome"];

/// The building fields a neighborhood rollup reads.
///
/// Absent values on the building feature are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildingFigures {
    pub listing_count: f64,
    /// Guests per listing, summed over the building's listings.
    pub accommodates: f64,
    pub availability_365: f64,
    /// Sum of nightly prices over the building's listings.
    pub price: f64,
}

/// Listing statistics for one neighborhood.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NeighborhoodStats {
    pub listings_total: u64,
    pub total_guests_per_night: f64,
    pub guest_night_capacity_per_year: f64,
    pub total_price_per_night: f64,
    /// Median of `price / listing_count` over priced buildings.
    pub median_price_per_unit: Option<f64>,
    pub max_price_per_unit: Option<f64>,
    pub min_price_per_unit: Option<f64>,
}

impl NeighborhoodStats {
    /// Whether any listing falls in the neighborhood.
    #[must_use]
    pub const fn has_listings(&self) -> bool {
        self.listings_total > 0
    }
}

/// A neighborhood's display name alongside its statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedNeighborhood {
    pub name: String,
    pub stats: NeighborhoodStats,
}
