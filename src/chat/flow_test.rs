// Tests for send_prompt using a scripted backend

use super::*;
use crate::errors::ErrorCategory;
use crate::events::tests::MockEventEmitter;
use crate::llm::{ChatMessage, LlmError, ModelConfig};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Backend that returns a fixed result and records calls
struct ScriptedBackend {
    reply: fn() -> Result<String, LlmError>,
    calls: parking_lot::Mutex<Vec<(String, usize)>>,
}

impl ScriptedBackend {
    fn new(reply: fn() -> Result<String, LlmError>) -> Self {
        Self {
            reply,
            calls: parking_lot::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn chat_completion(
        &self,
        _api_key: &str,
        model: &str,
        history: &[ChatMessage],
        _settings: &Map<String, Value>,
    ) -> Result<String, LlmError> {
        self.calls.lock().push((model.to_string(), history.len()));
        (self.reply)()
    }
}

fn sessions_with_fast() -> Mutex<ChatSessions> {
    let mut sessions = ChatSessions::new();
    sessions.open(
        ModelConfig {
            name: "Fast".to_string(),
            api_key: "sk".to_string(),
            model: "openai/gpt-4o-mini".to_string(),
        },
        None,
        None,
    );
    Mutex::new(sessions)
}

#[tokio::test]
async fn test_successful_send_appends_and_emits() {
    let sessions = sessions_with_fast();
    let backend = ScriptedBackend::new(|| Ok("Hi there".to_string()));
    let emitter = Arc::new(MockEventEmitter::new());

    send_prompt(&sessions, &backend, emitter.as_ref(), "Fast", "Hello").await.unwrap();

    assert_eq!(backend.calls.lock().clone(), vec![("openai/gpt-4o-mini".to_string(), 1)]);
    let responses = emitter.chat_responses.lock().unwrap();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].content, "Hi there");
    let guard = sessions.lock();
    let session = guard.get("Fast").unwrap();
    assert_eq!(session.history().len(), 2);
    assert!(!session.is_in_flight());
}

#[tokio::test]
async fn test_backend_failure_is_emitted_not_returned() {
    let sessions = sessions_with_fast();
    let backend = ScriptedBackend::new(|| Err(LlmError::Network("timed out".to_string())));
    let emitter = Arc::new(MockEventEmitter::new());

    let result = send_prompt(&sessions, &backend, emitter.as_ref(), "Fast", "Hello").await;
    assert!(result.is_ok());

    let errors = emitter.chat_errors.lock().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "API Request Failed: timed out");
    assert_eq!(errors[0].category, ErrorCategory::Network);
    assert!(!sessions.lock().get("Fast").unwrap().is_in_flight());
}

#[tokio::test]
async fn test_unknown_session_and_empty_prompt_never_call_backend() {
    let sessions = sessions_with_fast();
    let backend = ScriptedBackend::new(|| Ok(String::new()));
    let emitter = Arc::new(MockEventEmitter::new());

    let missing = send_prompt(&sessions, &backend, emitter.as_ref(), "Nope", "Hello").await;
    assert!(matches!(missing, Err(ChatError::SessionNotFound(_))));

    let empty = send_prompt(&sessions, &backend, emitter.as_ref(), "Fast", "  ").await;
    assert!(matches!(empty, Err(ChatError::NothingToSend)));

    assert!(backend.calls.lock().is_empty());
}
