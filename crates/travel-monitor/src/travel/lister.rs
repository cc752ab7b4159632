//! City Lister: asks the model for the most visited cities.

use serde::Deserialize;

use crate::config::MAX_CITY_COUNT;
use crate::llm::{decode_json, CompletionModel, CompletionRequest, LlmError};
use crate::region::Region;
use crate::travel::{non_blank, prompt, City, Result, TravelError, LISTING_TEMPERATURE};

#[derive(Debug, Deserialize)]
struct CityListing {
    cities: Vec<RawCity>,
}

#[derive(Debug, Deserialize)]
struct RawCity {
    name: String,
    country: String,
}

/// List up to `count` candidate cities (capped at 20), optionally scoped to `region`.
///
/// Entries with a blank name or country are dropped. An empty result is a
/// listing failure.
pub async fn list_cities<M: CompletionModel>(
    model: &M,
    region: Region,
    count: usize,
) -> Result<Vec<City>> {
    let count = count.clamp(1, MAX_CITY_COUNT);
    let request = CompletionRequest::new(
        prompt::city_listing_prompt(region, count),
        LISTING_TEMPERATURE,
    );

    let content = model
        .complete_json(request)
        .await
        .map_err(TravelError::Listing)?;
    let listing: CityListing = decode_json(&content).map_err(TravelError::Listing)?;

    let cities = validate_listing(listing, count);
    if cities.is_empty() {
        return Err(TravelError::Listing(LlmError::Schema(
            "no valid cities in response".to_string(),
        )));
    }

    log::info!("[Lister] {} candidate cities {}", cities.len(), region.prompt_scope());
    Ok(cities)
}

fn validate_listing(listing: CityListing, count: usize) -> Vec<City> {
    listing
        .cities
        .into_iter()
        .filter_map(|raw| match (non_blank(&raw.name), non_blank(&raw.country)) {
            (Some(name), Some(country)) => Some(City { name, country }),
            _ => {
                log::warn!(
                    "[Lister] dropping incomplete entry name={:?} country={:?}",
                    raw.name,
                    raw.country
                );
                None
            }
        })
        .take(count)
        .collect()
}
