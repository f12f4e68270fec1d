// Trigger matching engine - keystroke buffer, alias resolution and suffix matching
//
// The listener thread owns a TriggerMatcher and reads immutable TriggerSnapshots
// published by the UI side through SharedTriggers.

mod alias;
mod buffer;
mod matcher;
mod snapshot;

pub use alias::{resolve_alias, trailing_alias, AliasSuffix};
pub use buffer::KeyBuffer;
pub use matcher::{KeyInput, TriggerAction, TriggerMatch, TriggerMatcher};
pub use snapshot::{SharedTriggers, SnapshotShortcut, TriggerSnapshot};
