//! Unified settings access utilities.
//!
//! Application tunables live in the `tauri-plugin-store` file `settings.json`
//! and are read once at startup. User data (shortcuts, configurations,
//! profiles) lives in the config file instead, see `crate::config`.

use serde_json::Value;
use std::time::Duration;
use tauri::AppHandle;
use tauri_plugin_store::StoreExt;

use crate::keyboard::{DEFAULT_KEYSTROKE_DELAY_MS, DEFAULT_SETTLE_MS};
use crate::llm::{DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS};

/// Settings store file name
pub const SETTINGS_FILE: &str = "settings.json";

pub mod keys {
    pub const KEYSTROKE_DELAY_MS: &str = "injection.keystrokeDelayMs";
    pub const SETTLE_MS: &str = "injection.settleMs";
    pub const LLM_BASE_URL: &str = "llm.baseUrl";
    pub const REQUEST_TIMEOUT_SECS: &str = "llm.requestTimeoutSecs";
}

/// Trait for unified settings access on types that can provide an AppHandle.
pub trait SettingsAccess {
    /// Get the associated AppHandle.
    fn app_handle(&self) -> Option<&AppHandle>;

    /// Raw JSON value for a dot-notation key, e.g. "injection.settleMs"
    fn get_setting_value(&self, key: &str) -> Option<Value> {
        let app = self.app_handle()?;
        app.store(SETTINGS_FILE).ok().and_then(|store| store.get(key))
    }

    /// Get a setting value as a string.
    fn get_setting(&self, key: &str) -> Option<String> {
        self.get_setting_value(key)
            .and_then(|v| v.as_str().map(|s| s.to_string()))
    }
}

impl SettingsAccess for AppHandle {
    fn app_handle(&self) -> Option<&AppHandle> {
        Some(self)
    }
}

/// Tunables read at startup. Missing or malformed values fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    /// Pause between synthetic backspace events
    pub keystroke_delay: Duration,
    /// Quiet period after injection during which observed keys are ignored
    pub settle: Duration,
    pub llm_base_url: String,
    pub request_timeout: Duration,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            keystroke_delay: Duration::from_millis(DEFAULT_KEYSTROKE_DELAY_MS),
            settle: Duration::from_millis(DEFAULT_SETTLE_MS),
            llm_base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl AppSettings {
    pub fn load<S: SettingsAccess + ?Sized>(access: &S) -> Self {
        Self::from_lookup(|key| access.get_setting_value(key))
    }

    /// Build settings from a key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<Value>,
    {
        let defaults = Self::default();
        let number = |key: &str| lookup(key).and_then(|v| as_u64(key, &v));

        Self {
            keystroke_delay: number(keys::KEYSTROKE_DELAY_MS)
                .map(Duration::from_millis)
                .unwrap_or(defaults.keystroke_delay),
            settle: number(keys::SETTLE_MS)
                .map(Duration::from_millis)
                .unwrap_or(defaults.settle),
            llm_base_url: lookup(keys::LLM_BASE_URL)
                .and_then(|v| v.as_str().map(str::trim).map(str::to_string))
                .filter(|url| url.starts_with("http://") || url.starts_with("https://"))
                .unwrap_or(defaults.llm_base_url),
            request_timeout: number(keys::REQUEST_TIMEOUT_SECS)
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        }
    }
}

/// Accepts JSON numbers and numeric strings
fn as_u64(key: &str, value: &Value) -> Option<u64> {
    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    if parsed.is_none() {
        crate::warn!("Ignoring malformed setting {}: {}", key, value);
    }
    parsed
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
