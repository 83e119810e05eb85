#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the stay atlas toolchain.
//!
//! Each subcommand runs one pipeline step against a region's configured
//! paths, any of which can be overridden by flag. Without a subcommand
//! an interactive menu offers the same tools.
//!
//! Uses `indicatif-log-bridge` (via [`stay_atlas_cli_utils::init_logger`])
//! so log lines and progress bars share the terminal cleanly.

mod pipeline;
mod steps;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dialoguer::{Confirm, Select};
use stay_atlas_cli_utils::MultiProgress;
use stay_atlas_region::RegionDefinition;
use stay_atlas_region::registry::{all_regions, find_region};

const DEFAULT_REGION: &str = "venice";

#[derive(Parser)]
#[command(name = "stay_atlas", about = "Building, listing and neighborhood pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in regions
    Regions,
    /// Fetch building footprints from Overpass and classify them
    FetchBuildings {
        /// Region identifier (e.g., "venice")
        #[arg(long, default_value = DEFAULT_REGION)]
        region: String,
        /// Output `GeoJSON` path (defaults to the region's classified buildings file)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Match listings to buildings and aggregate them per building
    MatchListings {
        /// Region identifier (e.g., "venice")
        #[arg(long, default_value = DEFAULT_REGION)]
        region: String,
        /// Classified buildings `GeoJSON` to match against
        #[arg(long)]
        buildings: Option<PathBuf>,
        /// Listings CSV
        #[arg(long)]
        listings: Option<PathBuf>,
        /// Output `GeoJSON` path for buildings with listings
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Roll building aggregates up into neighborhood statistics
    EnrichNeighborhoods {
        /// Region identifier (e.g., "venice")
        #[arg(long, default_value = DEFAULT_REGION)]
        region: String,
        /// Neighborhood polygons `GeoJSON`
        #[arg(long)]
        neighborhoods: Option<PathBuf>,
        /// Buildings-with-listings `GeoJSON` produced by `match-listings`
        #[arg(long)]
        buildings: Option<PathBuf>,
        /// Output path (defaults to rewriting the neighborhoods file)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Run fetch, match and enrich in order
    Pipeline {
        /// Region identifier (e.g., "venice")
        #[arg(long, default_value = DEFAULT_REGION)]
        region: String,
        /// Reuse the existing classified buildings file instead of fetching
        #[arg(long)]
        skip_fetch: bool,
    },
}

/// Tools offered by the interactive menu.
enum Tool {
    RunPipeline,
    FetchBuildings,
    MatchListings,
    EnrichNeighborhoods,
    ListRegions,
}

impl Tool {
    const ALL: &[Self] = &[
        Self::RunPipeline,
        Self::FetchBuildings,
        Self::MatchListings,
        Self::EnrichNeighborhoods,
        Self::ListRegions,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::RunPipeline => "Run full pipeline",
            Self::FetchBuildings => "Fetch & classify buildings",
            Self::MatchListings => "Match listings to buildings",
            Self::EnrichNeighborhoods => "Enrich neighborhoods",
            Self::ListRegions => "List regions",
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = stay_atlas_cli_utils::init_logger();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return interactive(&multi).await;
    };

    match command {
        Commands::Regions => print_regions(),
        Commands::FetchBuildings { region, output } => {
            let region = find_region(&region)?;
            let output = output.unwrap_or_else(|| region.paths.classified_buildings.clone());
            steps::fetch_buildings(&multi, &region, &output).await?;
        }
        Commands::MatchListings {
            region,
            buildings,
            listings,
            output,
        } => {
            let region = find_region(&region)?;
            let paths = &region.paths;
            steps::match_listings(
                &multi,
                &buildings.unwrap_or_else(|| paths.classified_buildings.clone()),
                &listings.unwrap_or_else(|| paths.listings_csv.clone()),
                &output.unwrap_or_else(|| paths.listing_buildings.clone()),
            )?;
        }
        Commands::EnrichNeighborhoods {
            region,
            neighborhoods,
            buildings,
            output,
        } => {
            let region = find_region(&region)?;
            let paths = &region.paths;
            let neighborhoods = neighborhoods.unwrap_or_else(|| paths.neighborhoods.clone());
            let output = output.unwrap_or_else(|| neighborhoods.clone());
            steps::enrich_neighborhoods(
                &multi,
                &neighborhoods,
                &buildings.unwrap_or_else(|| paths.listing_buildings.clone()),
                &output,
            )?;
        }
        Commands::Pipeline { region, skip_fetch } => {
            let region = find_region(&region)?;
            pipeline::run(&multi, &region, skip_fetch).await?;
        }
    }

    Ok(())
}

fn print_regions() {
    let regions = all_regions();
    println!("{:<12} NAME", "ID");
    println!("{}", "-".repeat(50));
    for region in &regions {
        println!("{:<12} {}", region.id(), region.name());
    }
}

/// Menu-driven flow used when no subcommand is given.
async fn interactive(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    println!("Stay Atlas Toolchain");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();
    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    let tool = &Tool::ALL[idx];
    if matches!(tool, Tool::ListRegions) {
        print_regions();
        return Ok(());
    }

    let region = select_region()?;
    let paths = &region.paths;
    match tool {
        Tool::RunPipeline => {
            let skip_fetch = Confirm::new()
                .with_prompt(format!(
                    "Reuse existing {}?",
                    paths.classified_buildings.display()
                ))
                .default(paths.classified_buildings.exists())
                .interact()?;
            pipeline::run(multi, &region, skip_fetch).await?;
        }
        Tool::FetchBuildings => {
            steps::fetch_buildings(multi, &region, &paths.classified_buildings).await?;
        }
        Tool::MatchListings => {
            steps::match_listings(
                multi,
                &paths.classified_buildings,
                &paths.listings_csv,
                &paths.listing_buildings,
            )?;
        }
        Tool::EnrichNeighborhoods => {
            steps::enrich_neighborhoods(
                multi,
                &paths.neighborhoods,
                &paths.listing_buildings,
                &paths.neighborhoods,
            )?;
        }
        Tool::ListRegions => {}
    }

    Ok(())
}

fn select_region() -> Result<RegionDefinition, Box<dyn std::error::Error>> {
    let mut regions = all_regions();
    if regions.len() == 1 {
        return Ok(regions.remove(0));
    }

    let labels: Vec<String> = regions
        .iter()
        .map(|r| format!("{} ({})", r.name(), r.id()))
        .collect();
    let idx = Select::new()
        .with_prompt("Region")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(regions.swap_remove(idx))
}
