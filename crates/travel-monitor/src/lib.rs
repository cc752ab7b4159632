//! Travel Monitor
//!
//! Periodically asks a language model for popular destinations, enriches each
//! one with live weather, and asks the model for the single best place to go
//! right now (plus a few activities), printing the pick whenever it changes.
//!
//! # Architecture
//!
//! ```text
//! Scheduler (cron) ──► TravelMonitor::run_tick ──► MonitorState::observe ──► report
//!                          │
//!                          ├─ lister       (CompletionModel)
//!                          ├─ enrich       (WeatherSource, concurrent fan-out)
//!                          ├─ recommender  (CompletionModel)
//!                          └─ activities   (CompletionModel)
//! ```

pub mod config;
pub mod llm;
pub mod monitor;
pub mod region;
pub mod travel;
pub mod weather;

pub use config::{ConfigError, Credentials, MonitorConfig};
pub use llm::{CompletionModel, CompletionRequest, LlmError, OpenAiClient};
pub use monitor::change::{ChangeEvent, MonitorState};
pub use monitor::scheduler::{Scheduler, SchedulerError};
pub use monitor::{PipelineSettings, TickOutcome, TravelMonitor};
pub use region::Region;
pub use travel::{City, CityCandidate, Recommendation, TravelError, WeatherSnapshot};
pub use weather::{WeatherApiClient, WeatherError, WeatherSource};
