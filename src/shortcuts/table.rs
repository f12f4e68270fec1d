// Trigger table - ordered mapping from trigger text to replacement output
// Insertion order is the match order used by the keystroke matcher

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

/// Replacement text and enabled flag stored for a trigger
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShortcutDetails {
    /// Text injected in place of the trigger
    pub output: String,
    /// Disabled shortcuts stay in the table but never match
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

/// Borrowed view of one table row, as returned by `TriggerTable::list`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortcutView<'a> {
    pub trigger: &'a str,
    pub output: &'a str,
    pub enabled: bool,
}

/// Error types for trigger table operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TriggerTableError {
    /// Trigger already present in the table
    #[error("Shortcut '{0}' already exists")]
    DuplicateTrigger(String),
    /// Trigger or output was blank
    #[error("Both trigger and output are required")]
    EmptyField,
    /// Toggle requested for a trigger that is not in the table
    #[error("Shortcut '{0}' not found")]
    NotFound(String),
}

/// Insertion-ordered trigger table, persisted as the `shortcuts` mapping
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct TriggerTable {
    entries: IndexMap<String, ShortcutDetails>,
}

impl TriggerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an enabled shortcut at the end of the table.
    ///
    /// Duplicates are rejected rather than overwritten.
    #[must_use = "this returns a Result that should be handled"]
    pub fn add(&mut self, trigger: &str, output: &str) -> Result<(), TriggerTableError> {
        if trigger.is_empty() || output.is_empty() {
            return Err(TriggerTableError::EmptyField);
        }
        if self.entries.contains_key(trigger) {
            return Err(TriggerTableError::DuplicateTrigger(trigger.to_string()));
        }

        self.entries.insert(
            trigger.to_string(),
            ShortcutDetails {
                output: output.to_string(),
                enabled: true,
            },
        );
        Ok(())
    }

    /// Remove a shortcut. Absent triggers are ignored.
    ///
    /// Returns true if something was removed.
    pub fn remove(&mut self, trigger: &str) -> bool {
        // shift_remove keeps the relative order of the remaining rows
        self.entries.shift_remove(trigger).is_some()
    }

    #[must_use = "this returns a Result that should be handled"]
    pub fn set_enabled(&mut self, trigger: &str, enabled: bool) -> Result<(), TriggerTableError> {
        let details = self
            .entries
            .get_mut(trigger)
            .ok_or_else(|| TriggerTableError::NotFound(trigger.to_string()))?;
        details.enabled = enabled;
        Ok(())
    }

    /// Iterate rows in insertion order. Call again to restart.
    pub fn list(&self) -> impl Iterator<Item = ShortcutView<'_>> + '_ {
        self.entries.iter().map(|(trigger, details)| ShortcutView {
            trigger,
            output: &details.output,
            enabled: details.enabled,
        })
    }

    pub fn get(&self, trigger: &str) -> Option<&ShortcutDetails> {
        self.entries.get(trigger)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "table_test.rs"]
mod tests;
