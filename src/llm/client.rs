// OpenRouter client - model list and chat completions
// One request per call, fixed timeout, no retry

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tauri_plugin_http::reqwest;

use super::types::{ChatMessage, ModelInfo};
use crate::profiles::{validate_parameters, ParameterValidationError};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 180;

const SYSTEM_MESSAGE_KEY: &str = "system_message";

/// Error types for OpenRouter calls
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Error: OpenRouter API Key is missing.")]
    MissingApiKey,
    #[error(transparent)]
    Validation(#[from] ParameterValidationError),
    #[error("API Request Failed: {0}")]
    Network(String),
    #[error("API Request Failed: HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("An unexpected error occurred: {0}")]
    MalformedResponse(String),
}

/// Chat completion seam, mocked in session tests
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn chat_completion(
        &self,
        api_key: &str,
        model: &str,
        history: &[ChatMessage],
        settings: &Map<String, Value>,
    ) -> Result<String, LlmError>;
}

#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenRouterClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Available models, sorted by id
    pub async fn fetch_models(&self) -> Result<Vec<ModelInfo>, LlmError> {
        let url = format!("{}/models", self.base_url);
        crate::debug!("Fetching model list from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;
        let body = read_success_body(response).await?;
        let models = parse_models_response(&body)?;

        crate::info!("Fetched {} models", models.len());
        Ok(models)
    }
}

#[async_trait]
impl ChatBackend for OpenRouterClient {
    async fn chat_completion(
        &self,
        api_key: &str,
        model: &str,
        history: &[ChatMessage],
        settings: &Map<String, Value>,
    ) -> Result<String, LlmError> {
        if api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey);
        }
        let payload = build_chat_payload(model, history, settings)?;
        let body = serde_json::to_vec(&payload).map_err(|e| LlmError::MalformedResponse(e.to_string()))?;

        crate::debug!(
            "Sending chat request: model={}, messages={}",
            model,
            history.len()
        );
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key.trim())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let text = read_success_body(response).await?;
        parse_chat_response(&text)
    }
}

async fn read_success_body(response: reqwest::Response) -> Result<String, LlmError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| LlmError::Network(e.to_string()))?;
    if !status.is_success() {
        crate::warn!("OpenRouter returned HTTP {}", status.as_u16());
        return Err(LlmError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

/// Request body: `{model, messages, ...validated parameters}`.
///
/// A non-blank `system_message` setting becomes the first message.
pub fn build_chat_payload(
    model: &str,
    history: &[ChatMessage],
    settings: &Map<String, Value>,
) -> Result<Map<String, Value>, LlmError> {
    let params = validate_parameters(settings)?;

    let mut messages = Vec::with_capacity(history.len() + 1);
    if let Some(system) = settings
        .get(SYSTEM_MESSAGE_KEY)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
    {
        messages.push(ChatMessage::system(system));
    }
    messages.extend_from_slice(history);

    let mut payload = Map::new();
    payload.insert("model".to_string(), Value::String(model.to_string()));
    payload.insert(
        "messages".to_string(),
        serde_json::to_value(&messages).map_err(|e| LlmError::MalformedResponse(e.to_string()))?,
    );
    payload.extend(params.to_payload());
    Ok(payload)
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Reply text from `choices[0].message.content`
pub fn parse_chat_response(body: &str) -> Result<String, LlmError> {
    let completion: ChatCompletion =
        serde_json::from_str(body).map_err(|e| LlmError::MalformedResponse(e.to_string()))?;
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| {
            LlmError::MalformedResponse(format!("no message content in response: {}", body))
        })
}

#[derive(Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelInfo>,
}

pub fn parse_models_response(body: &str) -> Result<Vec<ModelInfo>, LlmError> {
    let list: ModelList =
        serde_json::from_str(body).map_err(|e| LlmError::MalformedResponse(e.to_string()))?;
    let mut models = list.data;
    models.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(models)
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
