//! Raw reqwest client for an OpenAI-compatible chat completions API.
//!
//! Only the JSON-object response mode is used: every call sends a single
//! user message and expects the assistant content to be one JSON object.
//! Callers decode that object into their own typed structs via
//! [`decode_json`], so a schema mismatch surfaces as [`LlmError::Schema`]
//! instead of a missing-field panic further down the pipeline.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

// ── Errors ──────────────────────────────────────────────────────────

/// Errors from language-model completion calls.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("response contained no message content")]
    EmptyResponse,

    #[error("response is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("response does not match the expected schema: {0}")]
    Schema(String),
}

pub type Result<T> = std::result::Result<T, LlmError>;

// ── Request ─────────────────────────────────────────────────────────

/// One structured-output request: a single user prompt and a sampling temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>, temperature: f32) -> Self {
        Self {
            prompt: prompt.into(),
            temperature,
        }
    }
}

/// Abstraction over the completion backend.
///
/// The travel steps call this trait instead of [`OpenAiClient`] directly,
/// which keeps them testable with scripted responses.
pub trait CompletionModel: Send + Sync + 'static {
    /// Issue a JSON-object completion and return the raw assistant content.
    fn complete_json(
        &self,
        request: CompletionRequest,
    ) -> impl Future<Output = Result<String>> + Send;
}

/// Parse assistant content as JSON and decode it into `T`.
pub fn decode_json<T: DeserializeOwned>(content: &str) -> Result<T> {
    let value: serde_json::Value =
        serde_json::from_str(content).map_err(|e| LlmError::InvalidJson(e.to_string()))?;
    serde_json::from_value(value).map_err(|e| LlmError::Schema(e.to_string()))
}

// ── Wire format ─────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Wire format for the chat completions request (not public).
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    response_format: ResponseFormat,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

// ── Client ──────────────────────────────────────────────────────────

/// A minimal chat completions client.
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl OpenAiClient {
    /// Build a client with a per-request timeout.
    ///
    /// `base_url` is the API root, e.g. `https://api.openai.com/v1`.
    pub fn new(base_url: &str, api_key: &str, model: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl CompletionModel for OpenAiClient {
    async fn complete_json(&self, request: CompletionRequest) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            response_format: ResponseFormat {
                kind: "json_object",
            },
            temperature: request.temperature,
        };

        log::debug!(
            "[LLM] POST chat/completions model={} temperature={} prompt_chars={}",
            self.model,
            request.temperature,
            request.prompt.len()
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)
    }
}

// ── Scripted model for testing ──────────────────────────────────────

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned responses in order and records every request.
    #[derive(Default)]
    pub struct ScriptedModel {
        responses: Mutex<VecDeque<Result<String>>>,
        pub requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedModel {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(self, content: &str) -> Self {
            self.responses
                .lock()
                .unwrap()
                .push_back(Ok(content.to_string()));
            self
        }

        pub fn fail(self, err: LlmError) -> Self {
            self.responses.lock().unwrap().push_back(Err(err));
            self
        }

        pub fn push_reply(&self, content: &str) {
            self.responses
                .lock()
                .unwrap()
                .push_back(Ok(content.to_string()));
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        pub fn prompt(&self, index: usize) -> String {
            self.requests.lock().unwrap()[index].prompt.clone()
        }
    }

    impl CompletionModel for ScriptedModel {
        async fn complete_json(&self, request: CompletionRequest) -> Result<String> {
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(LlmError::EmptyResponse))
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Cities {
        cities: Vec<String>,
    }

    #[test]
    fn request_serializes_json_object_mode() {
        let body = ChatRequest {
            model: "gpt-test",
            messages: [ChatMessage {
                role: "user",
                content: "hello",
            }],
            response_format: ResponseFormat {
                kind: "json_object",
            },
            temperature: 0.3,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["model"], "gpt-test");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "hello");
        assert_eq!(value["response_format"], json!({"type": "json_object"}));
        assert!((value["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn response_deserialization() {
        let raw = r#"{
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "{\"a\":1}"}}]
        }"#;
        let resp: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.choices.len(), 1);
        assert_eq!(resp.choices[0].message.content.as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn decode_json_success() {
        let decoded: Cities = decode_json(r#"{"cities": ["Paris", "Rome"]}"#).unwrap();
        assert_eq!(decoded.cities, vec!["Paris", "Rome"]);
    }

    #[test]
    fn decode_json_rejects_malformed() {
        let err = decode_json::<Cities>("not json").unwrap_err();
        assert!(matches!(err, LlmError::InvalidJson(_)));
    }

    #[test]
    fn decode_json_rejects_missing_field() {
        let err = decode_json::<Cities>(r#"{"places": []}"#).unwrap_err();
        assert!(matches!(err, LlmError::Schema(_)));
    }

    #[test]
    fn client_strips_trailing_slash() {
        let client = OpenAiClient::new(
            "http://localhost:9999/v1/",
            "sk-test",
            "gpt-test",
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(client.base_url, "http://localhost:9999/v1");
        assert_eq!(client.model(), "gpt-test");
        assert!(!format!("{:?}", client).contains("sk-test"));
    }

    #[tokio::test]
    async fn scripted_model_replays_in_order() {
        let model = mock::ScriptedModel::new().reply("{}").fail(LlmError::EmptyResponse);
        let first = model
            .complete_json(CompletionRequest::new("one", 0.1))
            .await
            .unwrap();
        assert_eq!(first, "{}");
        assert!(model
            .complete_json(CompletionRequest::new("two", 0.1))
            .await
            .is_err());
        assert_eq!(model.request_count(), 2);
        assert_eq!(model.prompt(1), "two");
    }
}
