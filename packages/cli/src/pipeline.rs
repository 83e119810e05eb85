//! Full pipeline: fetch, match, enrich.
//!
//! Runs the three steps in order with the region's configured paths,
//! each step reading the file the previous one wrote.

use std::time::Instant;

use stay_atlas_cli_utils::{IndicatifProgress, MultiProgress};
use stay_atlas_progress::ProgressCallback;
use stay_atlas_region::RegionDefinition;

use crate::steps;

/// Runs every pipeline step for a region.
///
/// With `skip_fetch` the existing classified building file is reused.
///
/// # Errors
///
/// Returns the first step error; later steps do not run.
pub async fn run(
    multi: &MultiProgress,
    region: &RegionDefinition,
    skip_fetch: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let paths = &region.paths;
    let total_steps = if skip_fetch { 2 } else { 3 };
    let steps_bar = IndicatifProgress::steps_bar(multi, "Pipeline", total_steps);

    if skip_fetch {
        log::info!(
            "Skipping fetch; using {}",
            paths.classified_buildings.display()
        );
    } else {
        steps_bar.set_message("Fetching buildings".to_string());
        steps::fetch_buildings(multi, region, &paths.classified_buildings).await?;
        steps_bar.inc(1);
    }

    steps_bar.set_message("Matching listings".to_string());
    steps::match_listings(
        multi,
        &paths.classified_buildings,
        &paths.listings_csv,
        &paths.listing_buildings,
    )?;
    steps_bar.inc(1);

    steps_bar.set_message("Enriching neighborhoods".to_string());
    steps::enrich_neighborhoods(
        multi,
        &paths.neighborhoods,
        &paths.listing_buildings,
        &paths.neighborhoods,
    )?;
    steps_bar.inc(1);

    steps_bar.finish(format!(
        "Pipeline finished in {:.1}s",
        start.elapsed().as_secs_f64()
    ));

    Ok(())
}
