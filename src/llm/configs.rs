// Model configurations - named API key + model pairs
// Position in the list defines the `__N` alias, so order is preserved on every edit

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Credentials and model id stored under a configuration name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelConfigDetails {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub model: String,
}

/// A named configuration, as handed to query windows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    pub name: String,
    pub api_key: String,
    pub model: String,
}

/// Display row for the configuration list
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfigRow {
    /// Numeric alias typed to open this configuration, e.g. "__2"
    pub alias: String,
    pub name: String,
    pub model: String,
}

/// Error types for model configuration edits
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelConfigError {
    #[error("Configuration name, API key and model are all required")]
    EmptyField,
    #[error("Configuration '{0}' already exists")]
    Duplicate(String),
    #[error("Configuration '{0}' not found")]
    NotFound(String),
}

/// Ordered set of model configurations, persisted as `llm_configs`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ModelConfigs {
    entries: IndexMap<String, ModelConfigDetails>,
}

impl ModelConfigs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a configuration. Existing names are never overwritten.
    #[must_use = "this returns a Result that should be handled"]
    pub fn add(&mut self, name: &str, api_key: &str, model: &str) -> Result<(), ModelConfigError> {
        let name = name.trim();
        let api_key = api_key.trim();
        let model = model.trim();
        if name.is_empty() || api_key.is_empty() || model.is_empty() {
            return Err(ModelConfigError::EmptyField);
        }
        if self.entries.contains_key(name) {
            return Err(ModelConfigError::Duplicate(name.to_string()));
        }

        self.entries.insert(
            name.to_string(),
            ModelConfigDetails {
                api_key: api_key.to_string(),
                model: model.to_string(),
            },
        );
        Ok(())
    }

    /// Remove a configuration. Later configurations move up one alias.
    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.shift_remove(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<ModelConfig> {
        self.entries.get(name).map(|details| ModelConfig {
            name: name.to_string(),
            api_key: details.api_key.clone(),
            model: details.model.clone(),
        })
    }

    /// First configuration (in list order) that uses `model`
    pub fn find_by_model(&self, model: &str) -> Option<ModelConfig> {
        self.entries
            .iter()
            .find(|(_, details)| details.model == model)
            .and_then(|(name, _)| self.get(name))
    }

    /// Ordered snapshot of configuration names for alias resolution
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn rows(&self) -> Vec<ModelConfigRow> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, (name, details))| ModelConfigRow {
                alias: format!("__{}", index + 1),
                name: name.clone(),
                model: details.model.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "configs_test.rs"]
mod tests;
