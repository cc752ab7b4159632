use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::region::Region;

/// Environment variable holding the language-model API key.
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Environment variable holding the weather API key.
pub const WEATHER_API_KEY_VAR: &str = "WEATHER_API_KEY";

/// Upper bound on how many cities the lister asks for.
pub const MAX_CITY_COUNT: usize = 20;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is required but not set")]
    MissingSecret(&'static str),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid schedule '{0}': {1}")]
    InvalidSchedule(String, String),
    #[error("Invalid region: {0}")]
    InvalidRegion(#[from] crate::region::UnknownRegion),
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
    #[error("HTTP client setup failed: {0}")]
    HttpClient(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// The two API secrets the monitor cannot run without.
#[derive(Clone)]
pub struct Credentials {
    pub openai_api_key: String,
    pub weather_api_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("openai_api_key", &"<redacted>")
            .field("weather_api_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Read both secrets from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read both secrets through `lookup`. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &'static str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingSecret(name))
        };

        Ok(Self {
            openai_api_key: require(OPENAI_API_KEY_VAR)?,
            weather_api_key: require(WEATHER_API_KEY_VAR)?,
        })
    }
}

/// Monitor configuration, loaded from an optional YAML file.
///
/// Every field has a default, so an empty file (or no file) is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorConfig {
    /// Chat completion model identifier.
    pub model: String,

    /// Cron expression for recurring ticks (5- or 6-field).
    pub schedule: String,

    /// Geographic scope for the city listing.
    pub region: Region,

    /// How many candidate cities to request (1..=20).
    pub city_count: usize,

    /// Whether to ask for activities after each recommendation.
    pub include_activities: bool,

    /// How many activities to request.
    pub activity_count: usize,

    /// Per-request timeout applied to every outbound HTTP call.
    pub request_timeout_secs: u64,

    /// Base URL of the OpenAI-compatible chat completions API.
    pub openai_base_url: String,

    /// Base URL of the weatherapi.com compatible API.
    pub weather_base_url: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4-turbo-preview".to_string(),
            schedule: "0 * * * *".to_string(),
            region: Region::Global,
            city_count: MAX_CITY_COUNT,
            include_activities: true,
            activity_count: 5,
            request_timeout_secs: 30,
            openai_base_url: "https://api.openai.com/v1".to_string(),
            weather_base_url: "https://api.weatherapi.com/v1".to_string(),
        }
    }
}

impl MonitorConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string
    pub fn parse(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges and the cron expression.
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "model",
                reason: "must not be empty".to_string(),
            });
        }
        if !(1..=MAX_CITY_COUNT).contains(&self.city_count) {
            return Err(ConfigError::InvalidValue {
                field: "city_count",
                reason: format!("must be between 1 and {}", MAX_CITY_COUNT),
            });
        }
        if self.activity_count == 0 {
            return Err(ConfigError::InvalidValue {
                field: "activity_count",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        crate::monitor::scheduler::parse_schedule(&self.schedule)
            .map_err(|e| ConfigError::InvalidSchedule(self.schedule.clone(), e.to_string()))?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn credentials_from_lookup() {
        let vars = env(&[(OPENAI_API_KEY_VAR, "sk-test"), (WEATHER_API_KEY_VAR, "wx-test")]);
        let creds = Credentials::from_lookup(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(creds.openai_api_key, "sk-test");
        assert_eq!(creds.weather_api_key, "wx-test");
    }

    #[test]
    fn missing_openai_key_is_fatal() {
        let vars = env(&[(WEATHER_API_KEY_VAR, "wx-test")]);
        let err = Credentials::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSecret(OPENAI_API_KEY_VAR)));
    }

    #[test]
    fn blank_weather_key_counts_as_missing() {
        let vars = env(&[(OPENAI_API_KEY_VAR, "sk-test"), (WEATHER_API_KEY_VAR, "   ")]);
        let err = Credentials::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSecret(WEATHER_API_KEY_VAR)));
    }

    #[test]
    fn debug_redacts_secrets() {
        let creds = Credentials {
            openai_api_key: "sk-secret".into(),
            weather_api_key: "wx-secret".into(),
        };
        let dbg = format!("{:?}", creds);
        assert!(!dbg.contains("secret"));
    }

    #[test]
    fn empty_yaml_gives_defaults() {
        let config = MonitorConfig::parse("").unwrap();
        assert_eq!(config.schedule, "0 * * * *");
        assert_eq!(config.city_count, 20);
        assert_eq!(config.activity_count, 5);
        assert!(config.include_activities);
        assert_eq!(config.region, Region::Global);
    }

    #[test]
    fn parse_partial_yaml() {
        let yaml = r#"
region: north-america
city_count: 10
include_activities: false
request_timeout_secs: 5
"#;
        let config = MonitorConfig::parse(yaml).unwrap();
        assert_eq!(config.region, Region::NorthAmerica);
        assert_eq!(config.city_count, 10);
        assert!(!config.include_activities);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.model, "gpt-4-turbo-preview");
    }

    #[test]
    fn rejects_city_count_above_limit() {
        let err = MonitorConfig::parse("city_count: 21").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "city_count",
                ..
            }
        ));
    }

    #[test]
    fn rejects_bad_cron() {
        let err = MonitorConfig::parse("schedule: \"every hour\"").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSchedule(..)));
    }

    #[test]
    fn rejects_unknown_region() {
        let err = MonitorConfig::parse("region: atlantis").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_unknown_field() {
        let err = MonitorConfig::parse("cites: 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn from_file_reads_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monitor.yaml");
        std::fs::write(&path, "schedule: \"*/30 * * * *\"\nactivity_count: 3\n").unwrap();
        let config = MonitorConfig::from_file(&path).unwrap();
        assert_eq!(config.schedule, "*/30 * * * *");
        assert_eq!(config.activity_count, 3);
    }

    #[test]
    fn from_file_missing_is_io_error() {
        let err = MonitorConfig::from_file("/nonexistent/monitor.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
