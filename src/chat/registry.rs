// Chat session registry - at most one open session per configuration name

use std::collections::HashMap;

use super::session::{ChatSession, RequestTicket};
use super::ChatError;
use crate::llm::ModelConfig;

/// Result of opening a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenedSession {
    /// New session; the caller creates its window
    Created { session_id: String },
    /// Already open; the caller focuses the existing window
    Existing { session_id: String },
}

impl OpenedSession {
    pub fn session_id(&self) -> &str {
        match self {
            OpenedSession::Created { session_id } | OpenedSession::Existing { session_id } => session_id,
        }
    }
}

#[derive(Debug, Default)]
pub struct ChatSessions {
    sessions: HashMap<String, ChatSession>,
}

impl ChatSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session for `config`, optionally seeded with a saved prompt/response.
    /// An already-open session is left untouched.
    pub fn open(
        &mut self,
        config: ModelConfig,
        prompt: Option<&str>,
        response: Option<&str>,
    ) -> OpenedSession {
        if let Some(existing) = self.sessions.get(&config.name) {
            return OpenedSession::Existing {
                session_id: existing.id().to_string(),
            };
        }

        let name = config.name.clone();
        let session = ChatSession::seeded(config, prompt, response);
        let session_id = session.id().to_string();
        crate::info!("Opened chat session {} for '{}'", session_id, name);
        self.sessions.insert(name, session);
        OpenedSession::Created { session_id }
    }

    pub fn get(&self, config_name: &str) -> Result<&ChatSession, ChatError> {
        self.sessions
            .get(config_name)
            .ok_or_else(|| ChatError::SessionNotFound(config_name.to_string()))
    }

    pub fn get_mut(&mut self, config_name: &str) -> Result<&mut ChatSession, ChatError> {
        self.sessions
            .get_mut(config_name)
            .ok_or_else(|| ChatError::SessionNotFound(config_name.to_string()))
    }

    /// Configuration name of the session with `session_id`
    pub fn name_for_id(&self, session_id: &str) -> Option<String> {
        self.sessions
            .iter()
            .find(|(_, s)| s.id() == session_id)
            .map(|(name, _)| name.clone())
    }

    pub fn close(&mut self, config_name: &str) -> bool {
        let closed = self.sessions.remove(config_name).is_some();
        if closed {
            crate::info!("Closed chat session for '{}'", config_name);
        }
        closed
    }

    /// Close the session with `session_id` (its window was destroyed)
    pub fn close_by_id(&mut self, session_id: &str) -> bool {
        match self.name_for_id(session_id) {
            Some(name) => self.close(&name),
            None => false,
        }
    }

    /// Deliver a reply. Returns false when the session is gone or restarted.
    pub fn complete(&mut self, config_name: &str, ticket: &RequestTicket, reply: Option<&str>) -> bool {
        match self.sessions.get_mut(config_name) {
            Some(session) => session.complete(ticket, reply),
            None => {
                crate::debug!("Discarding reply for closed session '{}'", config_name);
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
