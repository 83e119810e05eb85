#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Region definitions for the stay atlas pipeline.
//!
//! A region bundles everything a run needs to know about one
//! municipality: how to ask Overpass for its buildings and where each
//! pipeline step reads and writes its files. Definitions are TOML files
//! embedded at compile time (see [`registry`]).

pub mod registry;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when resolving a region.
#[derive(Debug, Error)]
pub enum RegionError {
    /// No embedded definition has the requested id.
    #[error("Unknown region '{id}' (available: {available})")]
    Unknown {
        /// Requested region id.
        id: String,
        /// Comma-separated list of known ids.
        available: String,
    },
}

/// A municipality the pipeline can run against, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionDefinition {
    /// Unique region identifier (e.g., `"venice"`).
    pub id: String,
    /// Human-readable name (e.g., "Comune di Venezia").
    pub name: String,
    /// Overpass query parameters.
    pub overpass: OverpassConfig,
    /// Default input and output files for each step.
    pub paths: RegionPaths,
}

impl RegionDefinition {
    /// Returns the region identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the human-readable region name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// How to query the Overpass API for the region's buildings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverpassConfig {
    /// Interpreter endpoint URL.
    pub url: String,
    /// Italian `ref:ISTAT` municipality code used by the primary query.
    pub istat_code: String,
    /// OSM relation id of the municipality boundary, used by the
    /// fallback query.
    pub relation_id: u64,
    /// Server-side and client-side timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

const fn default_timeout_secs() -> u64 {
    600
}

impl OverpassConfig {
    /// Query selecting the area by its `ref:ISTAT` code.
    #[must_use]
    pub fn primary_query(&self) -> String {
        format!(
            "[out:json][timeout:{timeout}];\n\
             area[\"ref:ISTAT\"=\"{code}\"]->.region;\n\
             {body}",
            timeout = self.timeout_secs,
            code = self.istat_code,
            body = BUILDINGS_IN_REGION,
        )
    }

    /// Query deriving the area from the boundary relation.
    #[must_use]
    pub fn fallback_query(&self) -> String {
        format!(
            "[out:json][timeout:{timeout}];\n\
             rel({relation});\n\
             map_to_area;\n\
             ->.region;\n\
             {body}",
            timeout = self.timeout_secs,
            relation = self.relation_id,
            body = BUILDINGS_IN_REGION,
        )
    }
}

/// Selects building ways and relations inside `.region` with inline
/// geometry.
const BUILDINGS_IN_REGION: &str = "(\n  \
    way[\"building\"](area.region);\n  \
    relation[\"building\"](area.region);\n\
    );\n\
    out geom;\n";

/// Default file locations for each pipeline step.
///
/// Each step's output is the next step's input: `classified_buildings`
/// feeds the matcher, whose `listing_buildings` feeds the enricher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionPaths {
    /// Output of the building fetch/classify step.
    pub classified_buildings: PathBuf,
    /// Listings CSV consumed by the matcher.
    pub listings_csv: PathBuf,
    /// Output of the matcher: buildings with aggregated listings.
    pub listing_buildings: PathBuf,
    /// Neighborhood polygons, enriched in place.
    pub neighborhoods: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> OverpassConfig {
        OverpassConfig {
            url: "http://localhost/api/interpreter".to_string(),
            istat_code: "027042".to_string(),
            relation_id: 44741,
            timeout_secs: 600,
        }
    }

    #[test]
    fn primary_query_selects_area_by_istat_code() {
        let query = config().primary_query();
        assert!(query.starts_with("[out:json][timeout:600];"));
        assert!(query.contains("area[\"ref:ISTAT\"=\"027042\"]->.region;"));
        assert!(query.contains("way[\"building\"](area.region);"));
        assert!(query.contains("relation[\"building\"](area.region);"));
        assert!(query.trim_end().ends_with("out geom;"));
    }

    #[test]
    fn fallback_query_maps_relation_to_area() {
        let query = config().fallback_query();
        assert!(query.contains("rel(44741);"));
        assert!(query.contains("map_to_area;"));
        assert!(query.contains("->.region;"));
        assert!(!query.contains("ref:ISTAT"));
    }

    #[test]
    fn timeout_defaults_to_ten_minutes() {
        let parsed: OverpassConfig = toml::de::from_str(
            "url = \"http://x\"\nistat_code = \"1\"\nrelation_id = 2\n",
        )
        .unwrap();
        assert_eq!(parsed.timeout_secs, 600);
    }
}
