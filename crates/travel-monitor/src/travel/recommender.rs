//! Recommender: hands the enriched candidates to the model and parses its pick.

use serde::Deserialize;

use crate::llm::{decode_json, CompletionModel, CompletionRequest, LlmError};
use crate::travel::{
    non_blank, prompt, CityCandidate, Recommendation, Result, TravelError,
    RECOMMENDATION_TEMPERATURE,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecommendation {
    best_city: String,
    country: String,
    reasoning: String,
}

/// Ask the model for the single best destination among `candidates`.
///
/// Only candidates with weather are offered to the model; if none have
/// weather the call is not made and [`TravelError::NoCandidates`] is returned.
pub async fn recommend<M: CompletionModel>(
    model: &M,
    candidates: &[CityCandidate],
) -> Result<Recommendation> {
    if !candidates.iter().any(CityCandidate::has_weather) {
        return Err(TravelError::NoCandidates);
    }

    let request = CompletionRequest::new(
        prompt::recommendation_prompt(candidates),
        RECOMMENDATION_TEMPERATURE,
    );
    let content = model
        .complete_json(request)
        .await
        .map_err(TravelError::Recommendation)?;
    let raw: RawRecommendation = decode_json(&content).map_err(TravelError::Recommendation)?;

    let recommendation = validate(raw).map_err(TravelError::Recommendation)?;
    log::info!(
        "[Recommender] model picked {}, {}",
        recommendation.best_city,
        recommendation.country
    );
    Ok(recommendation)
}

fn validate(raw: RawRecommendation) -> std::result::Result<Recommendation, LlmError> {
    let field = |name: &str, value: &str| {
        non_blank(value).ok_or_else(|| LlmError::Schema(format!("{} is empty", name)))
    };
    Ok(Recommendation {
        best_city: field("bestCity", &raw.best_city)?,
        country: field("country", &raw.country)?,
        reasoning: field("reasoning", &raw.reasoning)?,
    })
}

/// Conditions of the recommended city, used to prompt for activities.
///
/// Matches on name case-insensitively and falls back to `"good weather"`
/// when the model named a city outside the candidate set.
pub fn conditions_for<'a>(candidates: &'a [CityCandidate], city: &str) -> &'a str {
    candidates
        .iter()
        .find(|c| c.name.trim().eq_ignore_ascii_case(city.trim()))
        .and_then(|c| c.weather.as_ref())
        .map(|w| w.conditions.as_str())
        .unwrap_or("good weather")
}
