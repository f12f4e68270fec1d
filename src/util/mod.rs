//! Shared utilities for the textpilot backend.
//!
//! - `settings`: SettingsAccess trait and the tunables read from the settings store

mod settings;

pub use settings::{AppSettings, SettingsAccess, SETTINGS_FILE};

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
