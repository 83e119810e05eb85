//! The three pipeline steps with their console summaries.
//!
//! Each function runs one library step against explicit paths, prints
//! the step's summary block, and returns the library error on failure so
//! nothing after a failed step runs.

use std::path::Path;

use stay_atlas_building::FetchSummary;
use stay_atlas_cli_utils::{IndicatifProgress, MultiProgress};
use stay_atlas_listing::MatchSummary;
use stay_atlas_neighborhood::EnrichSummary;
use stay_atlas_progress::ProgressCallback;
use stay_atlas_region::RegionDefinition;

const RULE_WIDTH: usize = 60;

fn banner(title: &str) {
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("{title}");
    println!("{}", "=".repeat(RULE_WIDTH));
}

/// Builds the HTTP client used for Overpass requests.
///
/// # Errors
///
/// Returns [`reqwest::Error`] if the TLS backend cannot be initialized.
pub fn http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(concat!("stay_atlas/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(std::time::Duration::from_secs(30))
        .build()
}

/// Fetches and classifies the region's buildings.
///
/// # Errors
///
/// Returns an error if the Overpass queries fail or nothing convertible
/// comes back; no output is written in that case.
pub async fn fetch_buildings(
    multi: &MultiProgress,
    region: &RegionDefinition,
    output: &Path,
) -> Result<FetchSummary, Box<dyn std::error::Error>> {
    banner(&format!("{} Building Fetcher and Classifier", region.name()));
    let overpass = &region.overpass;
    println!(
        "Using municipality boundary (relation {}, ISTAT: {})",
        overpass.relation_id, overpass.istat_code
    );

    let client = http_client()?;
    let spinner = IndicatifProgress::spinner(multi, "Querying Overpass...");
    let result = stay_atlas_building::fetch_and_classify(&client, overpass, output).await;
    spinner.finish_and_clear();

    let summary = result.inspect_err(|e| println!("Failed to fetch buildings: {e}"))?;

    println!();
    println!("Building classification statistics:");
    println!("{:<24} {:>8}", "building_type_classified", "count");
    for (category, count) in summary.categories.sorted() {
        println!("{:<24} {count:>8}", category.as_ref());
    }
    let missing = summary.categories.missing();
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|category| category.as_ref()).collect();
        println!("No buildings classified as: {}", names.join(", "));
    }
    println!();
    println!("Saved classified buildings to {}", output.display());
    println!("Overpass elements: {}", summary.elements);
    println!("Total buildings: {}", summary.buildings);
    println!();
    banner("Processing complete!");

    Ok(summary)
}

/// Matches listings to buildings and writes the enriched buildings.
///
/// # Errors
///
/// Returns an error if an input cannot be read or the output cannot be
/// written.
pub fn match_listings(
    multi: &MultiProgress,
    buildings: &Path,
    listings: &Path,
    output: &Path,
) -> Result<MatchSummary, Box<dyn std::error::Error>> {
    banner("Listings to Buildings Matcher");

    let progress = IndicatifProgress::records_bar(multi, "Loading listings and buildings...");
    let summary = stay_atlas_listing::match_listings(buildings, listings, output, &progress)?;

    println!();
    println!("Loaded {} buildings", summary.buildings_loaded);
    println!("Loaded {} listings", summary.listings_total);
    println!("Valid listings with coordinates: {}", summary.listings_valid);
    println!("Listings matched to buildings: {}", summary.contained);
    println!("Listings assigned to closest building: {}", summary.nearest);
    println!("Saved to {}", output.display());
    println!();
    banner("Statistics:");
    println!("Total buildings with listings: {}", summary.buildings_with_listings);
    println!("Total listings assigned: {}", summary.listings_assigned);
    println!(
        "Average listings per building: {:.2}",
        summary.mean_listings_per_building()
    );
    println!("Max listings in a building: {}", summary.max_listings_per_building);
    println!();
    println!("Aggregated values:");
    println!("  Total price: {:.0}", summary.total_price);
    println!("  Total accommodates: {:.0}", summary.total_accommodates);
    println!("  Total availability_365: {:.0}", summary.total_availability_365);
    println!("  Total beds: {:.0}", summary.total_beds);
    println!("  Total bathrooms_text: {:.1}", summary.total_bathrooms);
    println!();
    banner("Processing complete!");

    Ok(summary)
}

/// Rolls building aggregates up into neighborhood statistics.
///
/// # Errors
///
/// Returns an error if an input cannot be read or the output cannot be
/// written.
pub fn enrich_neighborhoods(
    multi: &MultiProgress,
    neighborhoods: &Path,
    buildings: &Path,
    output: &Path,
) -> Result<EnrichSummary, Box<dyn std::error::Error>> {
    banner("Enriching Neighborhoods with Listing Statistics");

    let progress = IndicatifProgress::records_bar(multi, "Loading neighborhoods and buildings...");
    let summary =
        stay_atlas_neighborhood::enrich_neighborhoods(neighborhoods, buildings, output, &progress)?;

    println!();
    println!("Saved enriched neighborhoods to {}", output.display());
    println!();
    banner("Summary Statistics:");
    println!("Total neighborhoods: {}", summary.neighborhoods);
    println!("Neighborhoods with listings: {}", summary.neighborhoods_with_listings);
    println!();
    println!("Aggregated totals across all neighborhoods:");
    println!("  Total listings: {}", summary.listings_total);
    println!("  Total guests per night: {:.0}", summary.total_guests_per_night);
    println!(
        "  Guest-night capacity per year: {:.0}",
        summary.guest_night_capacity_per_year
    );
    println!("  Total price per night: €{:.2}", summary.total_price_per_night);
    println!();
    println!("Top {} neighborhoods by listings:", stay_atlas_neighborhood::TOP_NEIGHBORHOODS);
    for ranked in &summary.top {
        println!(
            "  {}: {} listings, {:.0} guests/night, €{:.2}/night",
            ranked.name,
            ranked.stats.listings_total,
            ranked.stats.total_guests_per_night,
            ranked.stats.total_price_per_night
        );
    }
    println!();
    banner("Enrichment complete!");

    Ok(summary)
}
