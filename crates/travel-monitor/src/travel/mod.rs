//! The four pipeline steps of one tick and the data they pass along.
//!
//! ```text
//! lister ──► enrich (weather fan-out) ──► recommender ──► activities
//! ```

pub mod activities;
pub mod enrich;
pub mod lister;
pub mod prompt;
pub mod recommender;

use serde::{Deserialize, Serialize};

use crate::llm::LlmError;
pub use crate::weather::WeatherSnapshot;

/// Sampling temperature for the city listing call.
pub const LISTING_TEMPERATURE: f32 = 0.3;
/// Sampling temperature for the recommendation call.
pub const RECOMMENDATION_TEMPERATURE: f32 = 0.5;
/// Sampling temperature for the activity suggestion call.
pub const ACTIVITY_TEMPERATURE: f32 = 0.7;

/// A city as returned by the lister, before weather enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub country: String,
}

/// A city under consideration. `weather` is `None` when enrichment failed;
/// such candidates never reach the recommender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityCandidate {
    pub name: String,
    pub country: String,
    pub weather: Option<WeatherSnapshot>,
}

impl CityCandidate {
    pub fn has_weather(&self) -> bool {
        self.weather.is_some()
    }
}

/// The model's single best pick for the current tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub best_city: String,
    pub country: String,
    pub reasoning: String,
}

/// Errors that end a tick early.
#[derive(Debug, thiserror::Error)]
pub enum TravelError {
    #[error("city listing failed: {0}")]
    Listing(#[source] LlmError),

    #[error("no candidates available: every weather fetch failed")]
    NoCandidates,

    #[error("recommendation failed: {0}")]
    Recommendation(#[source] LlmError),

    #[error("activity suggestion failed: {0}")]
    ActivitySuggestion(#[source] LlmError),
}

pub type Result<T> = std::result::Result<T, TravelError>;

/// Trim and reject blank strings; used when validating model output.
pub(crate) fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
