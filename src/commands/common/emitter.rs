//! Tauri event emitter implementation.
//!
//! Provides TauriEventEmitter which implements all event emitter traits
//! for production use with Tauri's event system.

use tauri::{AppHandle, Emitter};

use crate::emit_or_warn;
use crate::events::{
    chat_events, listener_events, model_events, ChatErrorPayload, ChatEventEmitter,
    ChatNoticePayload, ChatResponsePayload, ListenerEventEmitter, ModelEventEmitter,
};

/// Tauri AppHandle-based event emitter for production use.
///
/// Events are broadcast to every window; query windows filter chat events
/// by `configName`.
#[derive(Clone)]
pub struct TauriEventEmitter {
    app_handle: AppHandle,
}

impl TauriEventEmitter {
    /// Create a new TauriEventEmitter with the given AppHandle.
    pub fn new(app_handle: AppHandle) -> Self {
        Self { app_handle }
    }
}

impl ListenerEventEmitter for TauriEventEmitter {
    fn emit_shortcut_expanded(&self, payload: listener_events::ShortcutExpandedPayload) {
        emit_or_warn!(self.app_handle, listener_events::SHORTCUT_EXPANDED, payload);
    }

    fn emit_listener_unavailable(&self, payload: listener_events::ListenerUnavailablePayload) {
        emit_or_warn!(self.app_handle, listener_events::LISTENER_UNAVAILABLE, payload);
    }
}

impl ModelEventEmitter for TauriEventEmitter {
    fn emit_models_refreshed(&self, payload: model_events::ModelsRefreshedPayload) {
        emit_or_warn!(self.app_handle, model_events::MODELS_REFRESHED, payload);
    }

    fn emit_models_refresh_failed(&self, payload: model_events::ModelsRefreshFailedPayload) {
        emit_or_warn!(self.app_handle, model_events::MODELS_REFRESH_FAILED, payload);
    }
}

impl ChatEventEmitter for TauriEventEmitter {
    fn emit_chat_response(&self, payload: ChatResponsePayload) {
        emit_or_warn!(self.app_handle, chat_events::CHAT_RESPONSE, payload);
    }

    fn emit_chat_error(&self, payload: ChatErrorPayload) {
        emit_or_warn!(self.app_handle, chat_events::CHAT_ERROR, payload);
    }

    fn emit_chat_notice(&self, payload: ChatNoticePayload) {
        emit_or_warn!(self.app_handle, chat_events::CHAT_NOTICE, payload);
    }
}

#[cfg(test)]
#[path = "emitter_test.rs"]
mod tests;
