// Config store - loads and saves the JSON file holding all user data
// Keys: shortcuts, llm_configs, llm_profiles, saved_items, files, tools

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::library::{SavedFile, SavedItem, ToolDefinition};
use crate::llm::ModelConfigs;
use crate::profiles::ProfileStore;
use crate::shortcuts::TriggerTable;

/// Everything persisted in config.json. Missing keys load as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConfigFile {
    pub shortcuts: TriggerTable,
    pub llm_configs: ModelConfigs,
    pub llm_profiles: ProfileStore,
    pub saved_items: Vec<SavedItem>,
    pub files: Vec<SavedFile>,
    pub tools: Vec<ToolDefinition>,
}

/// Error types for config persistence
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Unreadable or malformed file; the app continues with empty defaults
    #[error("Could not load configuration from {path}: {reason}")]
    Load { path: PathBuf, reason: String },
    #[error("Failed to save configuration: {0}")]
    Save(String),
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the config file. A missing file is an empty config.
    pub fn load(&self) -> Result<ConfigFile, ConfigError> {
        crate::debug!("Loading configuration from {:?}", self.path);

        if !self.path.exists() {
            crate::info!("No configuration file found, starting empty");
            return Ok(ConfigFile::default());
        }

        let load_error = |reason: String| ConfigError::Load {
            path: self.path.clone(),
            reason,
        };
        let content = fs::read_to_string(&self.path).map_err(|e| load_error(e.to_string()))?;
        let config: ConfigFile =
            serde_json::from_str(&content).map_err(|e| load_error(e.to_string()))?;

        crate::info!(
            "Loaded configuration: {} shortcuts, {} model configurations, {} profiles",
            config.shortcuts.len(),
            config.llm_configs.len(),
            config.llm_profiles.names().len()
        );
        Ok(config)
    }

    /// Persist the config using atomic write (temp file + rename)
    #[must_use = "this returns a Result that should be handled"]
    pub fn save(&self, config: &ConfigFile) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Save(e.to_string()))?;
        }

        let content =
            serde_json::to_string_pretty(config).map_err(|e| ConfigError::Save(e.to_string()))?;
        let temp_path = self.path.with_extension("tmp");

        {
            let mut file = File::create(&temp_path)
                .map_err(|e| ConfigError::Save(format!("Failed to create temp file: {}", e)))?;
            file.write_all(content.as_bytes())
                .map_err(|e| ConfigError::Save(format!("Failed to write: {}", e)))?;
            file.sync_all()
                .map_err(|e| ConfigError::Save(format!("Failed to sync: {}", e)))?;
        }

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            ConfigError::Save(format!("Failed to rename: {}", e))
        })?;

        crate::debug!("Configuration saved to {:?}", self.path);
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
