#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Listing-to-building matcher.
//!
//! Loads classified building polygons and a listings CSV, assigns every
//! listing to one building (containment first, nearest building
//! otherwise), sums listing attributes per building and writes the
//! buildings that received at least one listing.

pub mod aggregate;
pub mod load;
pub mod matching;
pub mod parsing;

use std::path::Path;
use std::sync::Arc;

use stay_atlas_features::FeatureError;
use stay_atlas_listing_models::MatchMethod;
use stay_atlas_progress::ProgressCallback;
use stay_atlas_spatial::PolygonIndex;
use thiserror::Error;

/// Errors that can occur while matching listings to buildings.
#[derive(Debug, Error)]
pub enum ListingError {
    /// The listings CSV could not be read or parsed.
    #[error("CSV error in {path}: {source}")]
    Csv {
        /// File that was being read.
        path: String,
        /// Underlying error.
        source: csv::Error,
    },

    /// A required column is missing from the listings CSV.
    #[error("{path} has no '{column}' column")]
    MissingColumn {
        /// File that was being read.
        path: String,
        /// Name of the missing column.
        column: String,
    },

    /// Reading or writing a feature file failed.
    #[error(transparent)]
    Features(#[from] FeatureError),

    /// Data conversion error.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

/// Outcome of a matching run.
#[derive(Debug, Clone, Default)]
pub struct MatchSummary {
    /// Building features read from the input file.
    pub buildings_loaded: usize,
    /// Data rows in the listings CSV.
    pub listings_total: usize,
    /// Listings with valid coordinates.
    pub listings_valid: usize,
    /// Listings strictly inside a building.
    pub contained: usize,
    /// Listings assigned to their nearest building.
    pub nearest: usize,
    /// Buildings written (those with one or more listings).
    pub buildings_with_listings: usize,
    /// Sum of `listing_count` over written buildings.
    pub listings_assigned: u64,
    /// Sum of nightly prices over written buildings.
    pub total_price: f64,
    /// Sum of guest capacity over written buildings.
    pub total_accommodates: f64,
    /// Sum of available days per year over written buildings.
    pub total_availability_365: f64,
    /// Sum of beds over written buildings.
    pub total_beds: f64,
    /// Sum of bathrooms over written buildings.
    pub total_bathrooms: f64,
    /// Largest `listing_count` of any building.
    pub max_listings_per_building: u64,
}

impl MatchSummary {
    /// Mean listings per written building.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_listings_per_building(&self) -> f64 {
        if self.buildings_with_listings == 0 {
            0.0
        } else {
            self.listings_assigned as f64 / self.buildings_with_listings as f64
        }
    }
}

/// Runs the full matching step and writes the enriched buildings.
///
/// # Errors
///
/// Returns [`ListingError`] if an input cannot be read, no building has
/// polygonal geometry, or the output cannot be written.
pub fn match_listings(
    buildings_path: &Path,
    listings_path: &Path,
    output_path: &Path,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<MatchSummary, ListingError> {
    log::info!("Loading buildings from {}...", buildings_path.display());
    let buildings = stay_atlas_features::read_collection(buildings_path)?;
    let index = PolygonIndex::new(stay_atlas_features::feature_polygons(&buildings));
    if index.is_empty() {
        return Err(ListingError::Conversion {
            message: format!(
                "no building polygons in {} to match listings against",
                buildings_path.display()
            ),
        });
    }

    let loaded = load::load_listings(listings_path)?;

    progress.set_message(format!("Matching {} listings", loaded.listings.len()));
    let assignments = matching::assign_listings(&loaded.listings, &index, progress);
    let aggregates = aggregate::aggregate(&loaded.listings, &assignments);

    let mut summary = MatchSummary {
        buildings_loaded: buildings.len(),
        listings_total: loaded.total_rows,
        listings_valid: loaded.listings.len(),
        ..MatchSummary::default()
    };
    for assignment in &assignments {
        match assignment.method {
            MatchMethod::Contained => summary.contained += 1,
            MatchMethod::Nearest => summary.nearest += 1,
        }
    }
    for agg in aggregates.values() {
        summary.listings_assigned += agg.listing_count;
        summary.total_price += agg.price;
        summary.total_accommodates += agg.accommodates;
        summary.total_availability_365 += agg.availability_365;
        summary.total_beds += agg.beds;
        summary.total_bathrooms += agg.bathrooms_text;
        summary.max_listings_per_building = summary.max_listings_per_building.max(agg.listing_count);
    }

    let enriched = aggregate::enrich_buildings(buildings, &aggregates);
    summary.buildings_with_listings = enriched.len();

    stay_atlas_features::write_collection(output_path, enriched)?;

    Ok(summary)
}
