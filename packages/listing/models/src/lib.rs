#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Listing types shared by the matcher and the neighborhood enricher.
//!
//! A [`Listing`] is one row of the rental listings CSV that had usable
//! coordinates. Listings are assigned to buildings and rolled up into a
//! [`BuildingAggregate`], whose field names double as the property names
//! written to the enriched building file.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

/// Property names written on enriched building features.
pub mod property {
    pub const BUILDING_INDEX: &str = "building_index";
    pub const HOST_SINCE: &str = "host_since";
    pub const PRICE: &str = "price";
    pub const ACCOMMODATES: &str = "accommodates";
    pub const AVAILABILITY_365: &str = "availability_365";
    pub const BEDS: &str = "beds";
    pub const BATHROOMS_TEXT: &str = "bathrooms_text";
    pub const LISTING_COUNT: &str = "listing_count";
}

/// A rental listing with a known location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// Zero-based data row in the source CSV (header excluded).
    pub row: usize,
    pub longitude: f64,
    pub latitude: f64,
    /// Nightly price.
    pub price: Option<f64>,
    /// Guests the listing accommodates.
    pub accommodates: Option<f64>,
    /// Days available in the next 365.
    pub availability_365: Option<f64>,
    pub beds: Option<f64>,
    /// Bathroom count parsed from the free-text `bathrooms_text` column.
    pub bathrooms: Option<f64>,
    pub host_since: Option<NaiveDate>,
}

/// How a listing was matched to its building.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MatchMethod {
    /// The listing point lies strictly inside the building polygon.
    Contained,
    /// No building contains the point; the nearest one was used.
    Nearest,
}

/// One listing-to-building assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    /// Index into the loaded listings.
    pub listing: usize,
    /// Positional index of the building in the building file.
    pub building: usize,
    pub method: MatchMethod,
}

/// Listing attributes rolled up per building.
///
/// Sums skip listings where the field is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildingAggregate {
    pub building_index: usize,
    /// Earliest host start date among the listings.
    pub host_since: Option<NaiveDate>,
    pub price: f64,
    pub accommodates: f64,
    pub availability_365: f64,
    pub beds: f64,
    pub bathrooms_text: f64,
    pub listing_count: u64,
}

impl BuildingAggregate {
    /// Creates an empty aggregate for a building.
    #[must_use]
    pub fn new(building_index: usize) -> Self {
        Self {
            building_index,
            ..Self::default()
        }
    }

    /// Folds one listing into the aggregate.
    pub fn add(&mut self, listing: &Listing) {
        self.listing_count += 1;
        self.price += listing.price.unwrap_or(0.0);
        self.accommodates += listing.accommodates.unwrap_or(0.0);
        self.availability_365 += listing.availability_365.unwrap_or(0.0);
        self.beds += listing.beds.unwrap_or(0.0);
        self.bathrooms_text += listing.bathrooms.unwrap_or(0.0);
        self.host_since = match (self.host_since, listing.host_since) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
    }
}
