use super::*;
use std::sync::{Arc, Mutex};

/// Mock emitter that records all emitted events for testing
#[derive(Default)]
pub struct MockEventEmitter {
    pub expanded_events: Arc<Mutex<Vec<listener_events::ShortcutExpandedPayload>>>,
    pub unavailable_events: Arc<Mutex<Vec<listener_events::ListenerUnavailablePayload>>>,
    pub refreshed_events: Arc<Mutex<Vec<model_events::ModelsRefreshedPayload>>>,
    pub refresh_failed_events: Arc<Mutex<Vec<model_events::ModelsRefreshFailedPayload>>>,
    pub chat_responses: Arc<Mutex<Vec<ChatResponsePayload>>>,
    pub chat_errors: Arc<Mutex<Vec<ChatErrorPayload>>>,
    pub chat_notices: Arc<Mutex<Vec<ChatNoticePayload>>>,
}

impl MockEventEmitter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ListenerEventEmitter for MockEventEmitter {
    fn emit_shortcut_expanded(&self, payload: listener_events::ShortcutExpandedPayload) {
        self.expanded_events.lock().unwrap().push(payload);
    }

    fn emit_listener_unavailable(&self, payload: listener_events::ListenerUnavailablePayload) {
        self.unavailable_events.lock().unwrap().push(payload);
    }
}

impl ModelEventEmitter for MockEventEmitter {
    fn emit_models_refreshed(&self, payload: model_events::ModelsRefreshedPayload) {
        self.refreshed_events.lock().unwrap().push(payload);
    }

    fn emit_models_refresh_failed(&self, payload: model_events::ModelsRefreshFailedPayload) {
        self.refresh_failed_events.lock().unwrap().push(payload);
    }
}

impl ChatEventEmitter for MockEventEmitter {
    fn emit_chat_response(&self, payload: ChatResponsePayload) {
        self.chat_responses.lock().unwrap().push(payload);
    }

    fn emit_chat_error(&self, payload: ChatErrorPayload) {
        self.chat_errors.lock().unwrap().push(payload);
    }

    fn emit_chat_notice(&self, payload: ChatNoticePayload) {
        self.chat_notices.lock().unwrap().push(payload);
    }
}

#[test]
fn test_shortcut_expanded_payload_serializes_camel_case() {
    let payload = listener_events::ShortcutExpandedPayload {
        trigger: "__2".to_string(),
        config_name: Some("Smart".to_string()),
        timestamp: "2025-01-01T00:00:00Z".to_string(),
    };

    let json = serde_json::to_value(&payload).unwrap();
    assert_eq!(json["trigger"], "__2");
    assert_eq!(json["configName"], "Smart");
}

#[test]
fn test_chat_error_payload_carries_category() {
    let payload = ChatErrorPayload {
        config_name: "Fast".to_string(),
        message: "API Request Failed: timeout".to_string(),
        category: ErrorCategory::Network,
    };

    let json = serde_json::to_value(&payload).unwrap();
    assert_eq!(json["configName"], "Fast");
    assert_eq!(json["category"], "network");
}

#[test]
fn test_mock_emitter_records_events() {
    let emitter = MockEventEmitter::new();
    emitter.emit_models_refreshed(model_events::ModelsRefreshedPayload { count: 3 });
    emitter.emit_chat_notice(ChatNoticePayload {
        config_name: "Fast".to_string(),
        message: "--- New conversation started ---".to_string(),
    });

    assert_eq!(emitter.refreshed_events.lock().unwrap()[0].count, 3);
    assert_eq!(emitter.chat_notices.lock().unwrap().len(), 1);
}

#[test]
fn test_current_timestamp_is_rfc3339() {
    let timestamp = current_timestamp();
    assert!(chrono::DateTime::parse_from_rfc3339(&timestamp).is_ok());
}
