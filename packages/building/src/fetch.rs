//! Overpass API fetcher with a single fallback query.
//!
//! The primary query selects the municipality area by its `ref:ISTAT`
//! code. If that request fails or returns no elements, the fallback query
//! derives the area from the boundary relation instead. There is exactly
//! one attempt per query and no retry loop.

use std::time::Duration;

use stay_atlas_building_models::OverpassResponse;
use stay_atlas_region::OverpassConfig;

use crate::BuildingError;

/// Fetches building elements for the configured area.
///
/// # Errors
///
/// Returns [`BuildingError`] if the fallback query fails after the
/// primary query failed or came back empty.
pub async fn fetch_buildings(
    client: &reqwest::Client,
    config: &OverpassConfig,
) -> Result<OverpassResponse, BuildingError> {
    log::info!(
        "Fetching buildings from {} (ISTAT {}, relation {})",
        config.url,
        config.istat_code,
        config.relation_id
    );

    let timeout = Duration::from_secs(config.timeout_secs);
    query_with_fallback(
        config.primary_query(),
        config.fallback_query(),
        |body| post_query(client, &config.url, body, timeout),
    )
    .await
}

/// Runs `primary`, falling back to `fallback` once on error or an empty
/// result.
///
/// `send` performs one request for a query body. An empty fallback
/// result is returned as-is.
///
/// # Errors
///
/// Returns the fallback query's error.
pub async fn query_with_fallback<F, Fut>(
    primary: String,
    fallback: String,
    send: F,
) -> Result<OverpassResponse, BuildingError>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<OverpassResponse, BuildingError>>,
{
    log::info!("Attempting to fetch using ISTAT code...");
    match send(primary).await {
        Ok(response) if !response.elements.is_empty() => {
            log::info!(
                "Fetched {} building elements using ISTAT code",
                response.elements.len()
            );
            return Ok(response);
        }
        Ok(_) => log::warn!("No elements found with ISTAT code, trying relation ID..."),
        Err(e) => log::warn!("ISTAT code query failed: {e}; trying relation ID..."),
    }

    let response = send(fallback).await.inspect_err(|e| {
        log::error!("Relation ID query failed: {e}");
    })?;
    log::info!(
        "Fetched {} building elements using relation ID",
        response.elements.len()
    );
    Ok(response)
}

/// POSTs a raw Overpass QL body and decodes the JSON response.
async fn post_query(
    client: &reqwest::Client,
    url: &str,
    body: String,
    timeout: Duration,
) -> Result<OverpassResponse, BuildingError> {
    let resp = client.post(url).body(body).timeout(timeout).send().await?;
    if !resp.status().is_success() {
        return Err(BuildingError::Fetch {
            message: format!("Overpass request failed with status {}", resp.status()),
        });
    }
    let text = resp.text().await?;

    serde_json::from_str(&text).map_err(|e| BuildingError::Fetch {
        message: format!("Failed to parse Overpass response: {e}"),
    })
}
