//! Listing CSV loader.
//!
//! Reads the listings export by column name, so extra columns and column
//! order do not matter. Rows without plain decimal coordinates in range are
//! dropped.

use std::path::Path;

use serde::Deserialize;
use stay_atlas_listing_models::Listing;

use crate::ListingError;
use crate::parsing::{parse_bathrooms, parse_coordinate, parse_date, parse_number};

const MAX_LATITUDE: f64 = 90.0;
const MAX_LONGITUDE: f64 = 180.0;

/// The subset of CSV columns the matcher uses, kept as raw text.
#[derive(Debug, Deserialize)]
struct RawListing {
    #[serde(default)]
    latitude: Option<String>,
    #[serde(default)]
    longitude: Option<String>,
    #[serde(default)]
    price: Option<String>,
    #[serde(default)]
    accommodates: Option<String>,
    #[serde(default)]
    availability_365: Option<String>,
    #[serde(default)]
    beds: Option<String>,
    #[serde(default)]
    bathrooms_text: Option<String>,
    #[serde(default)]
    host_since: Option<String>,
}

/// Listings read from a CSV file.
#[derive(Debug, Clone, Default)]
pub struct LoadedListings {
    /// Data rows in the file.
    pub total_rows: usize,
    /// Rows with valid coordinates, in file order.
    pub listings: Vec<Listing>,
}

/// Loads listings from a CSV file with a header row.
///
/// # Errors
///
/// Returns [`ListingError`] if the file cannot be read, is not valid CSV,
/// or lacks the `latitude`/`longitude` columns.
pub fn load_listings(path: &Path) -> Result<LoadedListings, ListingError> {
    let csv_err = |source: csv::Error| ListingError::Csv {
        path: path.display().to_string(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    let headers = reader.headers().map_err(csv_err)?.clone();
    for required in ["latitude", "longitude"] {
        if !headers.iter().any(|h| h == required) {
            return Err(ListingError::MissingColumn {
                path: path.display().to_string(),
                column: required.to_string(),
            });
        }
    }

    let mut loaded = LoadedListings::default();
    for (row, result) in reader.deserialize::<RawListing>().enumerate() {
        let raw = result.map_err(csv_err)?;
        loaded.total_rows += 1;

        match to_listing(row, raw) {
            Some(listing) => loaded.listings.push(listing),
            None => log::debug!("Dropping listing row {row}: missing or malformed coordinates"),
        }
    }

    log::info!(
        "Loaded {} listings from {} ({} with valid coordinates)",
        loaded.total_rows,
        path.display(),
        loaded.listings.len()
    );

    Ok(loaded)
}

fn to_listing(row: usize, raw: RawListing) -> Option<Listing> {
    let number = |cell: Option<&String>| cell.and_then(|s| parse_number(s));

    let latitude = parse_coordinate(raw.latitude.as_deref()?, MAX_LATITUDE)?;
    let longitude = parse_coordinate(raw.longitude.as_deref()?, MAX_LONGITUDE)?;

    Some(Listing {
        row,
        longitude,
        latitude,
        price: number(raw.price.as_ref()),
        accommodates: number(raw.accommodates.as_ref()),
        availability_365: number(raw.availability_365.as_ref()),
        beds: number(raw.beds.as_ref()),
        bathrooms: raw.bathrooms_text.as_deref().and_then(parse_bathrooms),
        host_since: raw.host_since.as_deref().and_then(parse_date),
    })
}
