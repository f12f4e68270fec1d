// Chat module - one query session per model configuration

mod flow;
mod registry;
mod session;

pub use flow::send_prompt;
pub use registry::{ChatSessions, OpenedSession};
pub use session::{ChatSession, ChatSessionView, PendingRequest, RequestTicket};

use std::io;

/// Error types for chat sessions
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("A request is already in progress for this window")]
    InFlight,
    #[error("Nothing to send")]
    NothingToSend,
    #[error("No prompt found in history.")]
    NoPrompt,
    #[error("No response found in history.")]
    NoResponse,
    #[error("History is empty.")]
    EmptyHistory,
    #[error("Unsupported image type: {0}")]
    UnsupportedImage(String),
    #[error("Failed to load image: {0}")]
    ImageRead(#[source] io::Error),
    #[error("Could not read file: {0}")]
    FileRead(#[source] io::Error),
    #[error("No query window is open for '{0}'")]
    SessionNotFound(String),
    #[error("No LLM configuration found for model '{0}'. Please create one first.")]
    NoConfigForModel(String),
}
