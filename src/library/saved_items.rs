// Saved items - prompts, responses and full transcripts kept from chat windows

use serde::{Deserialize, Serialize};

use super::{now_timestamp, LibraryError};

const PREVIEW_CHARS: usize = 75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SavedItemKind {
    Prompt,
    Response,
    History,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedItem {
    #[serde(default)]
    pub timestamp: String,
    #[serde(rename = "type")]
    pub kind: SavedItemKind,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub response: String,
}

/// List row for the saved items view
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedItemRow {
    pub index: usize,
    pub timestamp: String,
    pub kind: SavedItemKind,
    pub model: String,
    pub preview: String,
}

impl SavedItem {
    /// New item stamped with the local time
    pub fn new(kind: SavedItemKind, model: &str, prompt: &str, response: &str) -> Self {
        Self {
            timestamp: now_timestamp(),
            kind,
            model: model.to_string(),
            prompt: prompt.to_string(),
            response: response.to_string(),
        }
    }

    /// First characters of prompt + response on one line
    pub fn preview(&self) -> String {
        let joined: String = self
            .prompt
            .chars()
            .chain(self.response.chars())
            .take(PREVIEW_CHARS)
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();
        format!("{}...", joined)
    }
}

pub fn rows(items: &[SavedItem]) -> Vec<SavedItemRow> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| SavedItemRow {
            index,
            timestamp: item.timestamp.clone(),
            kind: item.kind,
            model: item.model.clone(),
            preview: item.preview(),
        })
        .collect()
}

pub fn remove(items: &mut Vec<SavedItem>, index: usize) -> Result<SavedItem, LibraryError> {
    if index >= items.len() {
        return Err(LibraryError::IndexOutOfRange(index));
    }
    Ok(items.remove(index))
}

#[cfg(test)]
#[path = "saved_items_test.rs"]
mod tests;
