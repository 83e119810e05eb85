#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Building footprint fetching and classification.
//!
//! Downloads building ways for a municipality from the Overpass API,
//! converts them into `GeoJSON` polygons, labels each with a coarse
//! [`BuildingCategory`](stay_atlas_building_models::BuildingCategory)
//! and writes the classified collection for the listing matcher.

pub mod classify;
pub mod convert;
pub mod fetch;

use std::path::Path;

use stay_atlas_features::FeatureError;
use stay_atlas_region::OverpassConfig;
use thiserror::Error;

use crate::classify::CategoryCounts;

/// Errors that can occur while fetching or classifying buildings.
#[derive(Debug, Error)]
pub enum BuildingError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The Overpass API answered with an error or an unreadable body.
    #[error("Overpass error: {message}")]
    Fetch {
        /// Description of what went wrong.
        message: String,
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

/// Outcome of a fetch/classify run.
#[derive(Debug, Clone)]
pub struct FetchSummary {
    /// Elements returned by Overpass.
    pub elements: usize,
    /// Building polygons written.
    pub buildings: usize,
    /// Buildings per category.
    pub categories: CategoryCounts,
}

/// Fetches, converts, classifies and writes the buildings of an area.
///
/// Nothing is written if the fetch fails or yields no building polygons.
///
/// # Errors
///
/// Returns [`BuildingError`] if fetching fails, the response contains no
/// convertible buildings, or the output cannot be written.
pub async fn fetch_and_classify(
    client: &reqwest::Client,
    config: &OverpassConfig,
    output: &Path,
) -> Result<FetchSummary, BuildingError> {
    let response = fetch::fetch_buildings(client, config).await?;

    let mut features = convert::convert_elements(&response);
    if features.is_empty() {
        return Err(BuildingError::Conversion {
            message: format!(
                "no building polygons among {} Overpass elements",
                response.elements.len()
            ),
        });
    }

    log::info!("Classifying {} buildings...", features.len());
    let categories = classify::classify_features(&mut features);
    for (category, count) in categories.sorted() {
        log::debug!("{category}: {count}");
    }

    let buildings = features.len();
    stay_atlas_features::write_collection(output, features)?;

    Ok(FetchSummary {
        elements: response.elements.len(),
        buildings,
        categories,
    })
}
