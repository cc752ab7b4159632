//! Weather fan-out: one concurrent fetch per city, failures isolated per city.

use futures::future::join_all;

use crate::travel::{City, CityCandidate};
use crate::weather::WeatherSource;

/// Fetch weather for every city concurrently.
///
/// Waits for all fetches to settle. A failed fetch is logged and leaves that
/// candidate's `weather` as `None`; sibling fetches are unaffected.
pub async fn attach_weather<W: WeatherSource>(source: &W, cities: Vec<City>) -> Vec<CityCandidate> {
    let fetches = cities.into_iter().map(|city| async move {
        let weather = match source.current(&city.name, Some(city.country.as_str())).await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                log::warn!("[Weather] skipping {}, {}: {}", city.name, city.country, e);
                None
            }
        };
        CityCandidate {
            name: city.name,
            country: city.country,
            weather,
        }
    });

    join_all(fetches).await
}

/// Fetch weather for every city and keep only the candidates that succeeded.
pub async fn enrich_cities<W: WeatherSource>(source: &W, cities: Vec<City>) -> Vec<CityCandidate> {
    let requested = cities.len();
    let enriched: Vec<CityCandidate> = attach_weather(source, cities)
        .await
        .into_iter()
        .filter(CityCandidate::has_weather)
        .collect();

    log::info!(
        "[Weather] enriched {}/{} candidates",
        enriched.len(),
        requested
    );
    enriched
}
