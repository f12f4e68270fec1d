// Trigger matcher - drives the key buffer and detects alias or shortcut suffixes
//
// Called synchronously from the keyboard hook, so it must never block.

use super::alias::{resolve_alias, trailing_alias};
use super::buffer::KeyBuffer;
use super::snapshot::TriggerSnapshot;

/// Keyboard input as seen by the matcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyInput {
    /// Printable text produced by a key press
    Text(String),
    Space,
    Backspace,
    /// Any other key (modifiers, arrows, enter, function keys, ...)
    Other,
}

/// What to do after the typed trigger is erased
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerAction {
    OpenQueryWindow { config_name: String },
    InjectText { output: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerMatch {
    /// The matched text as typed (`__3` for aliases)
    pub trigger: String,
    /// Number of backspaces needed to erase the trigger
    pub erase_count: usize,
    pub action: TriggerAction,
}

/// Owns the key buffer. Lives on the listener thread only.
#[derive(Debug, Default)]
pub struct TriggerMatcher {
    buffer: KeyBuffer,
}

impl TriggerMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one key press. Returns the match to act on, if any.
    ///
    /// Aliases are checked before shortcuts. The first enabled shortcut in
    /// table order whose trigger ends the buffer wins. Any match resets the buffer.
    pub fn on_key(&mut self, input: &KeyInput, snapshot: &TriggerSnapshot) -> Option<TriggerMatch> {
        match input {
            KeyInput::Text(text) => self.buffer.push_str(text, snapshot.buffer_capacity()),
            KeyInput::Space => self.buffer.push_str(" ", snapshot.buffer_capacity()),
            KeyInput::Backspace => {
                self.buffer.pop();
                return None;
            }
            KeyInput::Other => {
                self.buffer.clear();
                return None;
            }
        }

        let found = self
            .match_alias(snapshot)
            .or_else(|| self.match_shortcut(snapshot));
        if found.is_some() {
            self.buffer.clear();
        }
        found
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    pub fn buffer(&self) -> &str {
        self.buffer.as_str()
    }

    fn match_alias(&self, snapshot: &TriggerSnapshot) -> Option<TriggerMatch> {
        let suffix = trailing_alias(self.buffer.as_str())?;
        let config_name = resolve_alias(snapshot.config_names(), suffix.number?)?;
        let text = self.buffer.as_str();

        Some(TriggerMatch {
            trigger: text[text.len() - suffix.char_len..].to_string(),
            erase_count: suffix.char_len,
            action: TriggerAction::OpenQueryWindow {
                config_name: config_name.to_string(),
            },
        })
    }

    fn match_shortcut(&self, snapshot: &TriggerSnapshot) -> Option<TriggerMatch> {
        let text = self.buffer.as_str();
        snapshot
            .shortcuts()
            .iter()
            .filter(|shortcut| shortcut.enabled)
            .find(|shortcut| text.ends_with(shortcut.trigger.as_str()))
            .map(|shortcut| TriggerMatch {
                trigger: shortcut.trigger.clone(),
                erase_count: shortcut.char_len,
                action: TriggerAction::InjectText {
                    output: shortcut.output.clone(),
                },
            })
    }
}

#[cfg(test)]
#[path = "matcher_test.rs"]
mod tests;
