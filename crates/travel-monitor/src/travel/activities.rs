//! Activity Suggester.

use serde::Deserialize;

use crate::llm::{decode_json, CompletionModel, CompletionRequest, LlmError};
use crate::travel::{non_blank, prompt, Result, TravelError, ACTIVITY_TEMPERATURE};

#[derive(Debug, Deserialize)]
struct ActivityList {
    activities: Vec<String>,
}

/// Ask for `count` activities suited to `city` under `conditions`.
///
/// Returned in the model's order; blank entries are dropped and the list is
/// capped at `count`.
pub async fn suggest_activities<M: CompletionModel>(
    model: &M,
    city: &str,
    country: &str,
    conditions: &str,
    count: usize,
) -> Result<Vec<String>> {
    let count = count.max(1);
    let request = CompletionRequest::new(
        prompt::activities_prompt(city, country, conditions, count),
        ACTIVITY_TEMPERATURE,
    );
    let content = model
        .complete_json(request)
        .await
        .map_err(TravelError::ActivitySuggestion)?;
    let list: ActivityList = decode_json(&content).map_err(TravelError::ActivitySuggestion)?;

    let activities: Vec<String> = list
        .activities
        .iter()
        .filter_map(|a| non_blank(a))
        .take(count)
        .collect();

    if activities.is_empty() {
        return Err(TravelError::ActivitySuggestion(LlmError::Schema(
            "no activities in response".to_string(),
        )));
    }
    if activities.len() < count {
        log::debug!(
            "[Activities] asked for {} activities, got {}",
            count,
            activities.len()
        );
    }
    Ok(activities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::mock::ScriptedModel;

    #[tokio::test]
    async fn returns_ordered_activities() {
        let model = ScriptedModel::new().reply(
            r#"{"activities": ["Walk along the Seine", "Visit the Louvre", "Picnic at Champ de Mars", "Climb Montmartre", "Café crawl in Le Marais"]}"#,
        );
        let activities = suggest_activities(&model, "Paris", "France", "Sunny", 5)
            .await
            .unwrap();
        assert_eq!(activities.len(), 5);
        assert_eq!(activities[0], "Walk along the Seine");
        assert!(activities.iter().all(|a| !a.is_empty()));

        let requests = model.requests.lock().unwrap();
        assert_eq!(requests[0].temperature, ACTIVITY_TEMPERATURE);
        assert!(requests[0].prompt.contains("City: Paris, France"));
    }

    #[tokio::test]
    async fn drops_blank_and_extra_entries() {
        let model = ScriptedModel::new()
            .reply(r#"{"activities": ["", "One", "  ", "Two", "Three", "Four"]}"#);
        let activities = suggest_activities(&model, "Paris", "France", "Sunny", 3)
            .await
            .unwrap();
        assert_eq!(activities, vec!["One", "Two", "Three"]);
    }

    #[tokio::test]
    async fn bare_array_is_schema_error() {
        let model = ScriptedModel::new().reply(r#"["Walk", "Eat"]"#);
        let err = suggest_activities(&model, "Paris", "France", "Sunny", 5)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TravelError::ActivitySuggestion(LlmError::Schema(_))
        ));
    }

    #[tokio::test]
    async fn all_blank_is_activity_error() {
        let model = ScriptedModel::new().reply(r#"{"activities": [" "]}"#);
        let err = suggest_activities(&model, "Paris", "France", "Sunny", 5)
            .await
            .unwrap_err();
        assert!(matches!(err, TravelError::ActivitySuggestion(_)));
    }

    #[tokio::test]
    async fn api_failure_is_activity_error() {
        let model = ScriptedModel::new().fail(LlmError::EmptyResponse);
        let err = suggest_activities(&model, "Paris", "France", "Sunny", 5)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TravelError::ActivitySuggestion(LlmError::EmptyResponse)
        ));
    }
}
