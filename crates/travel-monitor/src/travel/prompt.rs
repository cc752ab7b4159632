//! Prompt builders for the three model calls.
//!
//! The model does the ranking; the ideal ranges below are only heuristics
//! communicated in the prompt and never enforced in code.

use crate::region::Region;
use crate::travel::CityCandidate;

/// Ideal temperature range communicated to the model (°C).
pub const IDEAL_TEMPERATURE_C: (u32, u32) = (20, 25);
/// Ideal humidity range communicated to the model (%).
pub const IDEAL_HUMIDITY_PCT: (u32, u32) = (40, 60);
/// Ideal wind speed range communicated to the model (kph).
pub const IDEAL_WIND_KPH: (u32, u32) = (5, 15);

/// Ask for the `count` most visited cities, optionally scoped to a region.
pub fn city_listing_prompt(region: Region, count: usize) -> String {
    format!(
        "List the top {count} most visited tourist cities {scope}. \
         Return only a JSON object with a single key \"cities\" whose value is an array \
         of objects with \"name\" and \"country\" string properties, for example: \
         {{\"cities\": [{{\"name\": \"Paris\", \"country\": \"France\"}}]}}",
        count = count,
        scope = region.prompt_scope(),
    )
}

/// Ask for the single best city among enriched candidates.
///
/// Candidates without weather are skipped.
pub fn recommendation_prompt(candidates: &[CityCandidate]) -> String {
    let mut parts = Vec::new();

    parts.push(format!(
        "Based on this current weather data for top tourist cities, recommend the single best \
         city to visit right now. Consider temperature ({}-{}°C ideal), weather conditions, \
         humidity ({}-{}% ideal), and wind speed ({}-{} kph ideal).",
        IDEAL_TEMPERATURE_C.0,
        IDEAL_TEMPERATURE_C.1,
        IDEAL_HUMIDITY_PCT.0,
        IDEAL_HUMIDITY_PCT.1,
        IDEAL_WIND_KPH.0,
        IDEAL_WIND_KPH.1,
    ));

    parts.push("\nCities and their current conditions:".to_string());
    for candidate in candidates {
        let Some(weather) = &candidate.weather else {
            continue;
        };
        parts.push(format!(
            "\n{}, {}:\n- Temperature: {}°C\n- Weather: {}\n- Humidity: {}%\n- Wind Speed: {} kph",
            candidate.name,
            candidate.country,
            weather.temperature,
            weather.conditions,
            weather.humidity,
            weather.wind_speed,
        ));
    }

    parts.push(
        "\nReturn your response in this JSON format:\n\
         {\n  \"bestCity\": \"city name\",\n  \"country\": \"country name\",\n  \
         \"reasoning\": \"detailed explanation of why this city is the best choice right now\"\n}"
            .to_string(),
    );

    parts.join("\n")
}

/// Ask for `count` activities suited to the city and its current weather.
pub fn activities_prompt(city: &str, country: &str, conditions: &str, count: usize) -> String {
    format!(
        "Given the following city and current weather conditions, suggest {count} activities \
         that would be perfect to do today. Consider both popular tourist attractions and local \
         experiences.\n\
         \n\
         City: {city}, {country}\n\
         Current weather: {conditions}\n\
         \n\
         Return your response as a JSON object with a single key \"activities\" whose value is \
         an array of {count} strings, each string being one suggested activity.",
    )
}
