// Send flow - detach the request from the session lock, await the backend,
// then deliver the reply to whichever session is still live

use parking_lot::Mutex;

use super::{ChatError, ChatSessions};
use crate::errors::llm_category;
use crate::events::{ChatErrorPayload, ChatEventEmitter, ChatResponsePayload};
use crate::llm::ChatBackend;

/// Send `prompt` from the session for `config_name`.
///
/// Backend failures are reported only through `emitter` as chat errors; the
/// returned error covers a missing session or a send the session refused.
/// A reply for a closed or restarted session is dropped silently.
pub async fn send_prompt(
    sessions: &Mutex<ChatSessions>,
    backend: &dyn ChatBackend,
    emitter: &dyn ChatEventEmitter,
    config_name: &str,
    prompt: &str,
) -> Result<(), ChatError> {
    let request = sessions.lock().get_mut(config_name)?.begin_send(prompt)?;

    let result = backend
        .chat_completion(&request.api_key, &request.model, &request.history, &request.settings)
        .await;

    let delivered = sessions
        .lock()
        .complete(config_name, &request.ticket, result.as_ref().ok().map(String::as_str));
    if !delivered {
        return Ok(());
    }

    match result {
        Ok(content) => {
            emitter.emit_chat_response(ChatResponsePayload {
                config_name: config_name.to_string(),
                content,
            });
        }
        Err(e) => {
            crate::warn!("Chat request for '{}' failed: {}", config_name, e);
            emitter.emit_chat_error(ChatErrorPayload {
                config_name: config_name.to_string(),
                message: e.to_string(),
                category: llm_category(&e),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "flow_test.rs"]
mod tests;
