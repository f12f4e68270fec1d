// Application events for frontend notification
// Defines event payloads and emission traits for testability

use serde::Serialize;

use crate::errors::ErrorCategory;

/// Listener-related event names
pub mod listener_events {
    pub const SHORTCUT_EXPANDED: &str = "shortcut_expanded";
    pub const LISTENER_UNAVAILABLE: &str = "listener_unavailable";

    /// Payload for shortcut_expanded event
    #[derive(Debug, Clone, serde::Serialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    pub struct ShortcutExpandedPayload {
        /// The trigger text that was replaced
        pub trigger: String,
        /// Configuration opened by an alias, None for text shortcuts
        pub config_name: Option<String>,
        /// ISO 8601 timestamp
        pub timestamp: String,
    }

    /// Payload for listener_unavailable event
    #[derive(Debug, Clone, serde::Serialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    pub struct ListenerUnavailablePayload {
        /// Reason the global keyboard hook could not run
        pub reason: String,
        /// ISO 8601 timestamp when the issue was detected
        pub timestamp: String,
    }
}

/// Model list event names
pub mod model_events {
    pub const MODELS_REFRESHED: &str = "models_refreshed";
    pub const MODELS_REFRESH_FAILED: &str = "models_refresh_failed";

    #[derive(Debug, Clone, serde::Serialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    pub struct ModelsRefreshedPayload {
        /// Number of models now available
        pub count: usize,
    }

    #[derive(Debug, Clone, serde::Serialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    pub struct ModelsRefreshFailedPayload {
        pub message: String,
    }
}

/// Chat window event names
pub mod chat_events {
    pub const CHAT_RESPONSE: &str = "chat_response";
    pub const CHAT_ERROR: &str = "chat_error";
    pub const CHAT_NOTICE: &str = "chat_notice";
}

/// Payload for chat_response event
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponsePayload {
    pub config_name: String,
    /// Assistant reply text
    pub content: String,
}

/// Payload for chat_error event
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatErrorPayload {
    pub config_name: String,
    pub message: String,
    pub category: ErrorCategory,
}

/// Payload for chat_notice event (system lines shown in the transcript)
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatNoticePayload {
    pub config_name: String,
    pub message: String,
}

/// Trait for emitting listener events
/// Allows mocking in tests while using real Tauri AppHandle in production
pub trait ListenerEventEmitter: Send + Sync {
    /// Emit shortcut_expanded event
    fn emit_shortcut_expanded(&self, payload: listener_events::ShortcutExpandedPayload);

    /// Emit listener_unavailable event
    fn emit_listener_unavailable(&self, payload: listener_events::ListenerUnavailablePayload);
}

/// Trait for emitting model list events
pub trait ModelEventEmitter: Send + Sync {
    fn emit_models_refreshed(&self, payload: model_events::ModelsRefreshedPayload);

    fn emit_models_refresh_failed(&self, payload: model_events::ModelsRefreshFailedPayload);
}

/// Trait for emitting chat events
pub trait ChatEventEmitter: Send + Sync {
    fn emit_chat_response(&self, payload: ChatResponsePayload);

    fn emit_chat_error(&self, payload: ChatErrorPayload);

    fn emit_chat_notice(&self, payload: ChatNoticePayload);
}

/// Get the current timestamp in ISO 8601 format
pub fn current_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
#[path = "events_test.rs"]
pub(crate) mod tests;
