// Trigger snapshots - immutable copies of the trigger table and configuration order
// published by the UI side and read lock-free by the listener thread

use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::llm::ModelConfigs;
use crate::shortcuts::TriggerTable;

/// Lower bound for the key buffer cap
const MIN_BUFFER_CHARS: usize = 64;

/// Slack kept beyond the longest trigger so alias digits always fit
const BUFFER_SLACK_CHARS: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotShortcut {
    pub trigger: String,
    pub output: String,
    pub enabled: bool,
    /// Trigger length in characters (backspaces needed to erase it)
    pub char_len: usize,
}

/// Point-in-time view of everything the matcher reads
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerSnapshot {
    shortcuts: Vec<SnapshotShortcut>,
    config_names: Vec<String>,
    longest_trigger: usize,
}

impl TriggerSnapshot {
    pub fn new(table: &TriggerTable, configs: &ModelConfigs) -> Self {
        let shortcuts: Vec<SnapshotShortcut> = table
            .list()
            .map(|row| SnapshotShortcut {
                trigger: row.trigger.to_string(),
                output: row.output.to_string(),
                enabled: row.enabled,
                char_len: row.trigger.chars().count(),
            })
            .collect();
        let longest_trigger = shortcuts.iter().map(|s| s.char_len).max().unwrap_or(0);

        Self {
            shortcuts,
            config_names: configs.names(),
            longest_trigger,
        }
    }

    /// Shortcuts in match order
    pub fn shortcuts(&self) -> &[SnapshotShortcut] {
        &self.shortcuts
    }

    /// Configuration names in alias order
    pub fn config_names(&self) -> &[String] {
        &self.config_names
    }

    /// Maximum buffer length worth keeping for this snapshot
    pub fn buffer_capacity(&self) -> usize {
        (self.longest_trigger + BUFFER_SLACK_CHARS).max(MIN_BUFFER_CHARS)
    }
}

/// Copy-on-write handoff between the UI side (writer) and the listener (reader).
#[derive(Debug, Default)]
pub struct SharedTriggers {
    current: RwLock<Arc<TriggerSnapshot>>,
    reset_requested: AtomicBool,
}

impl SharedTriggers {
    pub fn new(snapshot: TriggerSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
            reset_requested: AtomicBool::new(false),
        }
    }

    /// Replace the current snapshot. Readers holding the old one keep it.
    pub fn publish(&self, snapshot: TriggerSnapshot) {
        crate::debug!(
            "Publishing trigger snapshot: {} shortcuts, {} configurations",
            snapshot.shortcuts.len(),
            snapshot.config_names.len()
        );
        *self.current.write() = Arc::new(snapshot);
    }

    /// Take a reference to the current snapshot. The lock is released on return.
    pub fn load(&self) -> Arc<TriggerSnapshot> {
        self.current.read().clone()
    }

    /// Ask the listener to clear its key buffer on the next event
    pub fn request_buffer_reset(&self) {
        self.reset_requested.store(true, Ordering::SeqCst);
    }

    /// Consume a pending reset request
    pub fn take_reset_request(&self) -> bool {
        self.reset_requested.swap(false, Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod tests;
