//! Change detection across ticks.

use crate::travel::Recommendation;

/// What a completed tick means for the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    /// The best city differs from the previous tick (or there was none).
    New {
        recommendation: Recommendation,
        activities: Vec<String>,
    },
    /// Same best city as last time.
    Unchanged { city: String },
}

impl ChangeEvent {
    pub fn is_new(&self) -> bool {
        matches!(self, ChangeEvent::New { .. })
    }
}

/// The only state kept between ticks: the last recommended city.
///
/// Owned by one scheduler; starts empty and is never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorState {
    last_recommendation: Option<String>,
}

impl MonitorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a known previous recommendation.
    pub fn with_last_recommendation(city: impl Into<String>) -> Self {
        Self {
            last_recommendation: Some(city.into()),
        }
    }

    pub fn last_recommendation(&self) -> Option<&str> {
        self.last_recommendation.as_deref()
    }

    /// Compare against the stored city and update it when it changed.
    pub fn observe(&mut self, recommendation: Recommendation, activities: Vec<String>) -> ChangeEvent {
        if self.last_recommendation.as_deref() == Some(recommendation.best_city.as_str()) {
            return ChangeEvent::Unchanged {
                city: recommendation.best_city,
            };
        }

        self.last_recommendation = Some(recommendation.best_city.clone());
        ChangeEvent::New {
            recommendation,
            activities,
        }
    }
}
