// Profile store - saves validated parameter sets under a case-sensitive name
// Persisted as `llm_profiles`: name -> settings map including `model`

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::params::{validate_parameters, ParameterValidationError};

/// Profile name used by chat windows before any profile is applied
pub const DEFAULT_PROFILE_NAME: &str = "Default";

/// Prompt text kept alongside the parameters; never filtered by model support
const SYSTEM_MESSAGE_KEY: &str = "system_message";
const MODEL_KEY: &str = "model";

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub model: String,
    /// Stored settings, including `model` and `system_message` when set
    pub settings: Map<String, Value>,
}

/// Error types for profile operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("Profile name cannot be empty")]
    EmptyName,
    #[error("Please select a model for the profile")]
    MissingModel,
    /// Caller should confirm and retry with overwrite
    #[error("A profile named '{0}' already exists")]
    AlreadyExists(String),
    #[error("Profile '{0}' not found")]
    NotFound(String),
    #[error(transparent)]
    Validation(#[from] ParameterValidationError),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ProfileStore {
    profiles: IndexMap<String, Map<String, Value>>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `form` and store it under `name`.
    ///
    /// When `supported` is known, fields the model does not advertise are dropped
    /// before validation.
    #[must_use = "this returns a Result that should be handled"]
    pub fn save(
        &mut self,
        name: &str,
        model: &str,
        form: &Map<String, Value>,
        supported: Option<&[String]>,
        overwrite: bool,
    ) -> Result<Profile, ProfileError> {
        let name = name.trim();
        let model = model.trim();
        if name.is_empty() {
            return Err(ProfileError::EmptyName);
        }
        if model.is_empty() {
            return Err(ProfileError::MissingModel);
        }
        if self.profiles.contains_key(name) && !overwrite {
            return Err(ProfileError::AlreadyExists(name.to_string()));
        }

        let candidates: Map<String, Value> = form
            .iter()
            .filter(|(key, _)| key.as_str() != MODEL_KEY && key.as_str() != SYSTEM_MESSAGE_KEY)
            .filter(|(key, _)| supported.map_or(true, |list| list.iter().any(|s| s == *key)))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        let params = validate_parameters(&candidates)?;

        let mut settings = Map::new();
        settings.insert(MODEL_KEY.to_string(), Value::String(model.to_string()));
        if let Some(message) = form
            .get(SYSTEM_MESSAGE_KEY)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|m| !m.is_empty())
        {
            settings.insert(
                SYSTEM_MESSAGE_KEY.to_string(),
                Value::String(message.to_string()),
            );
        }
        settings.extend(params.to_payload());

        crate::info!("Saving profile '{}' for model {}", name, model);
        self.profiles.insert(name.to_string(), settings.clone());
        Ok(Profile {
            name: name.to_string(),
            model: model.to_string(),
            settings,
        })
    }

    /// Remove a profile. Returns true if it existed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.profiles.shift_remove(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<Profile> {
        self.profiles.get(name).map(|settings| Profile {
            name: name.to_string(),
            model: settings
                .get(MODEL_KEY)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            settings: settings.clone(),
        })
    }

    /// Profile names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.profiles.keys().cloned().collect();
        names.sort();
        names
    }

    /// Stored settings rendered back into editable form values.
    ///
    /// Numbers become decimal text and JSON fields become pretty-printed text,
    /// so saving the result again reproduces the same settings.
    pub fn form_values(&self, name: &str) -> Result<Map<String, Value>, ProfileError> {
        let settings = self
            .profiles
            .get(name)
            .ok_or_else(|| ProfileError::NotFound(name.to_string()))?;

        Ok(settings
            .iter()
            .map(|(key, value)| (key.clone(), form_value(value)))
            .collect())
    }
}

fn form_value(value: &Value) -> Value {
    match value {
        Value::Number(n) => Value::String(n.to_string()),
        Value::Array(_) | Value::Object(_) => {
            Value::String(serde_json::to_string_pretty(value).unwrap_or_default())
        }
        other => other.clone(),
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
