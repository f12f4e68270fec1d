// Shortcuts module - user-defined text triggers and their replacement text

mod table;

pub use table::{ShortcutDetails, ShortcutView, TriggerTable, TriggerTableError};
