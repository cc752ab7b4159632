//! Current-conditions client for a weatherapi.com compatible service.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, WeatherError>;

/// Current weather at one location. Built fresh per fetch and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Degrees Celsius.
    pub temperature: f64,
    /// Short condition label, e.g. "Partly cloudy".
    pub conditions: String,
    /// Relative humidity percent, 0..=100.
    pub humidity: u8,
    /// Kilometres per hour.
    pub wind_speed: f64,
}

/// Abstraction over the weather backend.
pub trait WeatherSource: Send + Sync + 'static {
    /// Fetch current conditions for `city`. `country` only disambiguates the query.
    fn current(
        &self,
        city: &str,
        country: Option<&str>,
    ) -> impl Future<Output = Result<WeatherSnapshot>> + Send;
}

/// Build the free-text location query ("Paris, France").
pub fn location_query(city: &str, country: Option<&str>) -> String {
    match country.map(str::trim).filter(|c| !c.is_empty()) {
        Some(country) => format!("{}, {}", city.trim(), country),
        None => city.trim().to_string(),
    }
}

// ── Wire format ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    current: CurrentBlock,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    temp_c: f64,
    condition: ConditionBlock,
    humidity: i64,
    wind_kph: f64,
}

#[derive(Debug, Deserialize)]
struct ConditionBlock {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl TryFrom<CurrentBlock> for WeatherSnapshot {
    type Error = WeatherError;

    fn try_from(block: CurrentBlock) -> Result<Self> {
        if !block.temp_c.is_finite() {
            return Err(WeatherError::Parse(format!(
                "temperature is not finite: {}",
                block.temp_c
            )));
        }
        if !block.wind_kph.is_finite() || block.wind_kph < 0.0 {
            return Err(WeatherError::Parse(format!(
                "invalid wind speed: {}",
                block.wind_kph
            )));
        }
        let humidity = u8::try_from(block.humidity)
            .ok()
            .filter(|h| *h <= 100)
            .ok_or_else(|| {
                WeatherError::Parse(format!("humidity out of range: {}", block.humidity))
            })?;
        let conditions = block.condition.text.trim().to_string();
        if conditions.is_empty() {
            return Err(WeatherError::Parse("empty condition text".to_string()));
        }

        Ok(Self {
            temperature: block.temp_c,
            conditions,
            humidity,
            wind_speed: block.wind_kph,
        })
    }
}

/// Map a raw `current.json` body into a snapshot.
pub fn parse_current(body: &str) -> Result<WeatherSnapshot> {
    let response: CurrentResponse =
        serde_json::from_str(body).map_err(|e| WeatherError::Parse(e.to_string()))?;
    WeatherSnapshot::try_from(response.current)
}

// ── Client ──────────────────────────────────────────────────────────

pub struct WeatherApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for WeatherApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl WeatherApiClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }
}

impl WeatherSource for WeatherApiClient {
    async fn current(&self, city: &str, country: Option<&str>) -> Result<WeatherSnapshot> {
        let query = location_query(city, country);
        log::debug!("[Weather] GET current.json q={}", query);

        let response = self
            .client
            .get(format!("{}/current.json", self.base_url))
            .query(&[("key", self.api_key.as_str()), ("q", query.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(WeatherError::Api {
                status: status.as_u16(),
                message,
            });
        }

        parse_current(&body)
    }
}

// ── Static weather for testing ──────────────────────────────────────
