//! Application state shared by commands, windows and the listener.
//!
//! All edits to user data go through [`AppState::mutate`], which applies the
//! change to a copy, persists the copy, swaps it in, and republishes the
//! trigger snapshot. A failed edit or failed write leaves memory untouched.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::chat::ChatSessions;
use crate::config::{ConfigError, ConfigFile, ConfigStore};
use crate::errors::AppError;
use crate::library::FileLibrary;
use crate::llm::ModelInfo;
use crate::triggers::{SharedTriggers, TriggerSnapshot};

pub struct AppState {
    config: Mutex<ConfigFile>,
    store: ConfigStore,
    files: FileLibrary,
    triggers: Arc<SharedTriggers>,
    models: Mutex<Vec<ModelInfo>>,
    sessions: Mutex<ChatSessions>,
    load_warning: Option<String>,
    listener_error: Mutex<Option<String>>,
}

impl AppState {
    /// Load the config file. A malformed file is kept aside as a backup, the
    /// app starts empty, and the reason is reported as the load warning.
    pub fn load(store: ConfigStore, files: FileLibrary) -> Self {
        match store.load() {
            Ok(config) => Self::with_config(config, store, files, None),
            Err(e) => {
                crate::error!("{}", e);
                let mut warning = e.to_string();
                if let ConfigError::Load { path, .. } = &e {
                    let backup = path.with_extension("json.bak");
                    match std::fs::copy(path, &backup) {
                        Ok(_) => warning.push_str(&format!(" (previous file kept at {})", backup.display())),
                        Err(copy_err) => crate::warn!("Could not back up config file: {}", copy_err),
                    }
                }
                Self::with_config(ConfigFile::default(), store, files, Some(warning))
            }
        }
    }

    pub fn with_config(
        config: ConfigFile,
        store: ConfigStore,
        files: FileLibrary,
        load_warning: Option<String>,
    ) -> Self {
        let triggers = Arc::new(SharedTriggers::new(TriggerSnapshot::new(
            &config.shortcuts,
            &config.llm_configs,
        )));
        Self {
            config: Mutex::new(config),
            store,
            files,
            triggers,
            models: Mutex::new(Vec::new()),
            sessions: Mutex::new(ChatSessions::new()),
            load_warning,
            listener_error: Mutex::new(None),
        }
    }

    /// Read-only access to the current config
    pub fn read<R>(&self, f: impl FnOnce(&ConfigFile) -> R) -> R {
        f(&self.config.lock())
    }

    /// Apply `f` to a copy of the config, persist it, then make it current.
    pub fn mutate<R, E>(&self, f: impl FnOnce(&mut ConfigFile) -> Result<R, E>) -> Result<R, AppError>
    where
        AppError: From<E>,
    {
        let mut guard = self.config.lock();
        let mut draft = guard.clone();
        let result = f(&mut draft)?;
        self.store.save(&draft)?;
        self.triggers
            .publish(TriggerSnapshot::new(&draft.shortcuts, &draft.llm_configs));
        *guard = draft;
        Ok(result)
    }

    /// Write the current config, used on shutdown
    pub fn save(&self) -> Result<(), AppError> {
        let guard = self.config.lock();
        self.store.save(&guard)?;
        Ok(())
    }

    pub fn triggers(&self) -> Arc<SharedTriggers> {
        self.triggers.clone()
    }

    pub fn files(&self) -> &FileLibrary {
        &self.files
    }

    pub fn sessions(&self) -> &Mutex<ChatSessions> {
        &self.sessions
    }

    pub fn load_warning(&self) -> Option<&str> {
        self.load_warning.as_deref()
    }

    /// Recorded when the keyboard hook fails, so a window opened later can still show it
    pub fn set_listener_error(&self, reason: String) {
        *self.listener_error.lock() = Some(reason);
    }

    pub fn listener_error(&self) -> Option<String> {
        self.listener_error.lock().clone()
    }

    pub fn set_models(&self, models: Vec<ModelInfo>) {
        *self.models.lock() = models;
    }

    pub fn models(&self) -> Vec<ModelInfo> {
        self.models.lock().clone()
    }

    /// Parameters the model advertises, if the model list knows it
    pub fn supported_parameters(&self, model: &str) -> Option<Vec<String>> {
        self.models
            .lock()
            .iter()
            .find(|m| m.id == model)
            .and_then(|m| m.supported_parameters.clone())
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
