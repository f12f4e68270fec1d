// Library module - saved chat items, saved files and tool definitions

pub mod files;
pub mod saved_items;
pub mod tools;

pub use files::{read_text, FileLibrary, SavedFile};
pub use saved_items::{SavedItem, SavedItemKind, SavedItemRow};
pub use tools::{ToolDefinition, ToolFunction, ToolRow};

use std::io;

/// Timestamp format used for saved items and files
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Error types for library operations
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("Tool name is required")]
    EmptyToolName,
    /// Caller should confirm and retry with overwrite
    #[error("A tool named '{0}' already exists")]
    ToolExists(String),
    #[error("Invalid JSON in tool parameters: {0}")]
    InvalidToolParameters(String),
    /// Caller should confirm and retry with overwrite
    #[error("A file named '{0}' already exists")]
    FileExists(String),
    #[error("Not a file: {0}")]
    NotAFile(String),
    #[error("No item at position {0}")]
    IndexOutOfRange(usize),
    #[error("File error: {0}")]
    Io(#[from] io::Error),
}

fn now_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}
