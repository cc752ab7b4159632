//! One tick of the travel pipeline, plus the state and timer around it.

pub mod change;
pub mod report;
pub mod scheduler;

use crate::config::{ConfigError, Credentials, MonitorConfig};
use crate::llm::{CompletionModel, OpenAiClient};
use crate::region::Region;
use crate::travel::{
    self, activities, enrich, lister, recommender, City, CityCandidate, Recommendation,
};
use crate::weather::{WeatherApiClient, WeatherSource};

/// Knobs that shape a tick, independent of the backends.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub region: Region,
    pub city_count: usize,
    pub include_activities: bool,
    pub activity_count: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from(&MonitorConfig::default())
    }
}

impl From<&MonitorConfig> for PipelineSettings {
    fn from(config: &MonitorConfig) -> Self {
        Self {
            region: config.region,
            city_count: config.city_count,
            include_activities: config.include_activities,
            activity_count: config.activity_count,
        }
    }
}

/// Result of a tick that got all the way through.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub recommendation: Recommendation,
    /// Empty when activities are disabled.
    pub activities: Vec<String>,
    /// How many candidates had weather and were offered to the model.
    pub candidates: usize,
}

/// The List → Fetch → Recommend → Suggest pipeline over a model and a weather source.
pub struct TravelMonitor<M, W> {
    model: M,
    weather: W,
    settings: PipelineSettings,
}

impl TravelMonitor<OpenAiClient, WeatherApiClient> {
    /// Build the production monitor from config and secrets.
    pub fn from_config(config: &MonitorConfig, credentials: &Credentials) -> Result<Self, ConfigError> {
        let model = OpenAiClient::new(
            &config.openai_base_url,
            &credentials.openai_api_key,
            &config.model,
            config.request_timeout(),
        )
        .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        let weather = WeatherApiClient::new(
            &config.weather_base_url,
            &credentials.weather_api_key,
            config.request_timeout(),
        )
        .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self::new(model, weather, PipelineSettings::from(config)))
    }
}

impl<M: CompletionModel, W: WeatherSource> TravelMonitor<M, W> {
    pub fn new(model: M, weather: W, settings: PipelineSettings) -> Self {
        Self {
            model,
            weather,
            settings,
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// City Lister step.
    pub async fn list_cities(&self, region: Region) -> travel::Result<Vec<City>> {
        lister::list_cities(&self.model, region, self.settings.city_count).await
    }

    /// Weather Fetcher step. Only candidates with weather are returned.
    pub async fn fetch_weather(&self, cities: Vec<City>) -> Vec<CityCandidate> {
        enrich::enrich_cities(&self.weather, cities).await
    }

    /// Recommender step.
    pub async fn recommend(&self, candidates: &[CityCandidate]) -> travel::Result<Recommendation> {
        recommender::recommend(&self.model, candidates).await
    }

    /// Activity Suggester step.
    pub async fn suggest_activities(
        &self,
        city: &str,
        country: &str,
        conditions: &str,
    ) -> travel::Result<Vec<String>> {
        activities::suggest_activities(
            &self.model,
            city,
            country,
            conditions,
            self.settings.activity_count,
        )
        .await
    }

    /// Run one full tick. The first failing step ends the tick.
    pub async fn run_tick(&self) -> travel::Result<TickOutcome> {
        let cities = self.list_cities(self.settings.region).await?;
        let candidates = self.fetch_weather(cities).await;
        let recommendation = self.recommend(&candidates).await?;

        let activities = if self.settings.include_activities {
            let conditions = recommender::conditions_for(&candidates, &recommendation.best_city);
            self.suggest_activities(&recommendation.best_city, &recommendation.country, conditions)
                .await?
        } else {
            Vec::new()
        };

        Ok(TickOutcome {
            recommendation,
            activities,
            candidates: candidates.len(),
        })
    }
}

#[cfg(test)]
impl<W: WeatherSource> TravelMonitor<crate::llm::mock::ScriptedModel, W> {
    pub(crate) fn model_requests(&self) -> usize {
        self.model.request_count()
    }
}
