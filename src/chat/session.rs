// Chat session - history and request bookkeeping for one query window

use base64::Engine;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use super::ChatError;
use crate::library::{read_text, SavedFile};
use crate::llm::{ChatMessage, ContentPart, ImageUrl, MessageContent, ModelConfig, Role};
use crate::profiles::DEFAULT_PROFILE_NAME;

const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "webp", "gif"];

/// Identifies the request a reply belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub session_id: String,
    pub generation: u64,
}

/// Everything the backend needs, detached from the session lock
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub ticket: RequestTicket,
    pub api_key: String,
    pub model: String,
    pub history: Vec<ChatMessage>,
    pub settings: Map<String, Value>,
}

#[derive(Debug, Clone)]
struct PendingImage {
    filename: String,
    data_url: String,
}

/// Snapshot of a session for the query window
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatSessionView {
    pub session_id: String,
    pub config_name: String,
    pub model: String,
    pub title: String,
    pub profile_name: String,
    pub transcript: String,
    pub history: Vec<ChatMessage>,
    pub draft: String,
    pub pending_image: Option<String>,
    pub in_flight: bool,
}

#[derive(Debug)]
pub struct ChatSession {
    id: String,
    config: ModelConfig,
    profile_name: String,
    settings: Map<String, Value>,
    history: Vec<ChatMessage>,
    pending_image: Option<PendingImage>,
    in_flight: bool,
    generation: u64,
    draft: String,
    /// System lines shown in the transcript, keyed by the history length when added
    notices: Vec<(usize, String)>,
}

impl ChatSession {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            config,
            profile_name: DEFAULT_PROFILE_NAME.to_string(),
            settings: Map::new(),
            history: Vec::new(),
            pending_image: None,
            in_flight: false,
            generation: 0,
            draft: String::new(),
            notices: Vec::new(),
        }
    }

    /// Session seeded from a saved item: prompt goes to the draft, response to history
    pub fn seeded(config: ModelConfig, prompt: Option<&str>, response: Option<&str>) -> Self {
        let mut session = Self::new(config);
        if let Some(prompt) = prompt.filter(|p| !p.is_empty()) {
            session.draft = prompt.to_string();
        }
        if let Some(response) = response.filter(|r| !r.is_empty()) {
            session.history.push(ChatMessage::assistant(response));
        }
        session
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    #[cfg(test)]
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    #[cfg(test)]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn title(&self) -> String {
        format!("Query: {} (Profile: {})", self.config.name, self.profile_name)
    }

    /// Start a request for `prompt`.
    ///
    /// A non-empty prompt and/or the pending image become one user message.
    /// With neither, the existing history is resent.
    pub fn begin_send(&mut self, prompt: &str) -> Result<PendingRequest, ChatError> {
        if self.in_flight {
            return Err(ChatError::InFlight);
        }
        let prompt = prompt.trim();
        if prompt.is_empty() && self.pending_image.is_none() && self.history.is_empty() {
            return Err(ChatError::NothingToSend);
        }

        let mut parts = Vec::new();
        if !prompt.is_empty() {
            parts.push(ContentPart::Text {
                text: prompt.to_string(),
            });
        }
        if let Some(image) = self.pending_image.take() {
            parts.push(ContentPart::ImageUrl {
                image_url: ImageUrl { url: image.data_url },
            });
        }
        if !parts.is_empty() {
            self.history.push(ChatMessage {
                role: Role::User,
                content: MessageContent::Parts(parts),
            });
        }

        self.draft.clear();
        self.in_flight = true;
        Ok(PendingRequest {
            ticket: self.ticket(),
            api_key: self.config.api_key.clone(),
            model: self.config.model.clone(),
            history: self.history.clone(),
            settings: self.settings.clone(),
        })
    }

    /// Record the outcome of a request. Returns false when the ticket belongs
    /// to an earlier conversation and the reply was dropped.
    pub fn complete(&mut self, ticket: &RequestTicket, reply: Option<&str>) -> bool {
        if *ticket != self.ticket() {
            crate::debug!("Discarding reply for stale request in session {}", self.id);
            return false;
        }
        self.in_flight = false;
        if let Some(content) = reply {
            self.history.push(ChatMessage::assistant(content));
        }
        true
    }

    /// Clear history and pending image; replies still in flight are discarded
    pub fn new_conversation(&mut self) -> String {
        self.history.clear();
        self.pending_image = None;
        self.draft.clear();
        self.in_flight = false;
        self.generation += 1;
        self.notices.clear();
        self.note("--- New conversation started ---".to_string())
    }

    pub fn apply_profile(&mut self, name: &str, settings: Map<String, Value>) -> String {
        self.profile_name = name.to_string();
        self.settings = settings;
        self.note(format!("--- Applied settings profile: {} ---", name))
    }

    /// Load an image as a data URL to go out with the next message
    pub fn attach_image(&mut self, path: &Path) -> Result<String, ChatError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if !IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ChatError::UnsupportedImage(path.display().to_string()));
        }
        let subtype = if extension == "jpg" { "jpeg" } else { extension.as_str() };

        let bytes = fs::read(path).map_err(ChatError::ImageRead)?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.pending_image = Some(PendingImage {
            data_url: format!("data:image/{};base64,{}", subtype, encoded),
            filename: filename.clone(),
        });
        Ok(self.note(format!("[Image Uploaded: {}]", filename)))
    }

    /// Add a saved file's text to the history as a user message
    pub fn add_file_context(&mut self, file: &SavedFile) -> Result<(), ChatError> {
        let content = read_text(file).map_err(ChatError::FileRead)?;
        let text = format!(
            "--- Using File: {} ---\n\n{}\n\n--- End of File ---",
            file.filename, content
        );
        self.history.push(ChatMessage::user(&text));
        Ok(())
    }

    fn note(&mut self, message: String) -> String {
        self.notices.push((self.history.len(), message.clone()));
        message
    }

    pub fn last_prompt(&self) -> Result<String, ChatError> {
        self.last_text(Role::User).ok_or(ChatError::NoPrompt)
    }

    pub fn last_response(&self) -> Result<String, ChatError> {
        self.last_text(Role::Assistant).ok_or(ChatError::NoResponse)
    }

    fn last_text(&self, role: Role) -> Option<String> {
        self.history
            .iter()
            .rev()
            .find(|m| m.role == role)
            .map(|m| m.content.text())
            .filter(|text| !text.is_empty())
    }

    /// Plain-text rendering of the conversation, notices included
    pub fn transcript(&self) -> String {
        self.render(true)
    }

    fn render(&self, with_notices: bool) -> String {
        let mut out = String::new();
        let push_notices = |out: &mut String, at: usize| {
            if !with_notices {
                return;
            }
            for (_, notice) in self.notices.iter().filter(|(pos, _)| *pos == at) {
                out.push_str(notice);
                out.push('\n');
            }
        };

        for (index, message) in self.history.iter().enumerate() {
            push_notices(&mut out, index);
            match message.role {
                Role::User => {
                    out.push_str("You: ");
                    match &message.content {
                        MessageContent::Text(text) => {
                            out.push_str(text);
                            out.push('\n');
                        }
                        MessageContent::Parts(parts) => {
                            for part in parts {
                                match part {
                                    ContentPart::Text { text } => {
                                        out.push_str(text);
                                        out.push('\n');
                                    }
                                    ContentPart::ImageUrl { .. } => out.push_str("[Image]\n"),
                                }
                            }
                        }
                    }
                }
                Role::Assistant => {
                    out.push_str("Assistant: ");
                    out.push_str(&message.content.text());
                    out.push_str("\n\n");
                }
                Role::System => {}
            }
        }
        push_notices(&mut out, self.history.len());
        out
    }

    /// Transcript for saving as a History item
    pub fn history_text(&self) -> Result<String, ChatError> {
        let text = self.render(false).trim().to_string();
        if text.is_empty() {
            return Err(ChatError::EmptyHistory);
        }
        Ok(text)
    }

    pub fn view(&self) -> ChatSessionView {
        ChatSessionView {
            session_id: self.id.clone(),
            config_name: self.config.name.clone(),
            model: self.config.model.clone(),
            title: self.title(),
            profile_name: self.profile_name.clone(),
            transcript: self.transcript(),
            history: self.history.clone(),
            draft: self.draft.clone(),
            pending_image: self.pending_image.as_ref().map(|i| i.filename.clone()),
            in_flight: self.in_flight,
        }
    }

    fn ticket(&self) -> RequestTicket {
        RequestTicket {
            session_id: self.id.clone(),
            generation: self.generation,
        }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
