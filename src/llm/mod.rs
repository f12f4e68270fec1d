// LLM module - model configurations and the OpenRouter chat client

mod client;
mod configs;
mod types;

pub use client::{
    build_chat_payload, parse_chat_response, parse_models_response, ChatBackend, LlmError,
    OpenRouterClient, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS,
};
pub use configs::{ModelConfig, ModelConfigDetails, ModelConfigError, ModelConfigRow, ModelConfigs};
pub use types::{ChatMessage, ContentPart, ImageUrl, MessageContent, ModelInfo, Role};
