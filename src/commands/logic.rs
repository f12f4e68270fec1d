// Command implementation logic - testable functions separate from Tauri wrappers
// Window creation stays in the wrappers; everything else happens here

use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;

use crate::app::AppState;
use crate::chat::{self, ChatError, ChatSessionView, OpenedSession};
use crate::errors::AppError;
use crate::events::{model_events, ChatEventEmitter, ChatNoticePayload, ModelEventEmitter};
use crate::library::{saved_items, tools, LibraryError, SavedFile, SavedItem, SavedItemKind, SavedItemRow, ToolRow};
use crate::llm::{ChatBackend, ModelConfigError, ModelConfigRow, ModelInfo, OpenRouterClient};
use crate::profiles::{Profile, ProfileError};

/// Shortcut row for the shortcuts view
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShortcutRow {
    pub trigger: String,
    pub output: String,
    pub enabled: bool,
}

/// Problems found during startup, fetched by the main window once it loads
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StartupStatus {
    pub config_warning: Option<String>,
    pub listener_error: Option<String>,
}

pub fn startup_status_impl(state: &AppState) -> StartupStatus {
    StartupStatus {
        config_warning: state.load_warning().map(str::to_string),
        listener_error: state.listener_error(),
    }
}

// ---------------------------------------------------------------------------
// Shortcuts
// ---------------------------------------------------------------------------

pub fn list_shortcuts_impl(state: &AppState) -> Vec<ShortcutRow> {
    state.read(|config| {
        config
            .shortcuts
            .list()
            .map(|s| ShortcutRow {
                trigger: s.trigger.to_string(),
                output: s.output.to_string(),
                enabled: s.enabled,
            })
            .collect()
    })
}

pub fn add_shortcut_impl(state: &AppState, trigger: &str, output: &str) -> Result<(), AppError> {
    state.mutate(|config| config.shortcuts.add(trigger, output))?;
    crate::info!("Added shortcut {:?}", trigger);
    Ok(())
}

/// Deleting an unknown trigger is a no-op
pub fn delete_shortcut_impl(state: &AppState, trigger: &str) -> Result<bool, AppError> {
    state.mutate(|config| Ok::<_, AppError>(config.shortcuts.remove(trigger)))
}

pub fn set_shortcut_enabled_impl(state: &AppState, trigger: &str, enabled: bool) -> Result<(), AppError> {
    state.mutate(|config| config.shortcuts.set_enabled(trigger, enabled))
}

// ---------------------------------------------------------------------------
// Model configurations and the model list
// ---------------------------------------------------------------------------

pub fn list_model_configs_impl(state: &AppState) -> Vec<ModelConfigRow> {
    state.read(|config| config.llm_configs.rows())
}

pub fn add_model_config_impl(state: &AppState, name: &str, api_key: &str, model: &str) -> Result<(), AppError> {
    state.mutate(|config| config.llm_configs.add(name, api_key, model))?;
    crate::info!("Added model configuration {:?}", name);
    Ok(())
}

pub fn delete_model_config_impl(state: &AppState, name: &str) -> Result<(), AppError> {
    state.mutate(|config| {
        if config.llm_configs.remove(name) {
            Ok(())
        } else {
            Err(ModelConfigError::NotFound(name.to_string()))
        }
    })
}

/// Fetch the model list and keep it for profile editing.
/// Failures are reported through the emitter and the previous list is kept.
pub async fn refresh_models_impl(
    state: &AppState,
    client: &OpenRouterClient,
    emitter: &dyn ModelEventEmitter,
) -> Result<usize, AppError> {
    match client.fetch_models().await {
        Ok(models) => {
            let count = models.len();
            state.set_models(models);
            emitter.emit_models_refreshed(model_events::ModelsRefreshedPayload { count });
            Ok(count)
        }
        Err(e) => {
            crate::warn!("Failed to fetch models: {}", e);
            emitter.emit_models_refresh_failed(model_events::ModelsRefreshFailedPayload {
                message: e.to_string(),
            });
            Err(e.into())
        }
    }
}

pub fn list_models_impl(state: &AppState) -> Vec<ModelInfo> {
    state.models()
}

pub fn supported_parameters_impl(state: &AppState, model: &str) -> Option<Vec<String>> {
    state.supported_parameters(model)
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

pub fn list_profiles_impl(state: &AppState) -> Vec<String> {
    state.read(|config| config.llm_profiles.names())
}

pub fn get_profile_form_impl(state: &AppState, name: &str) -> Result<Map<String, Value>, AppError> {
    Ok(state.read(|config| config.llm_profiles.form_values(name))?)
}

pub fn save_profile_impl(
    state: &AppState,
    name: &str,
    model: &str,
    form: &Map<String, Value>,
    overwrite: bool,
) -> Result<Profile, AppError> {
    let supported = state.supported_parameters(model.trim());
    state.mutate(|config| {
        config
            .llm_profiles
            .save(name, model, form, supported.as_deref(), overwrite)
    })
}

pub fn delete_profile_impl(state: &AppState, name: &str) -> Result<(), AppError> {
    state.mutate(|config| {
        if config.llm_profiles.remove(name) {
            Ok(())
        } else {
            Err(ProfileError::NotFound(name.to_string()))
        }
    })
}

// ---------------------------------------------------------------------------
// Tools
// ---------------------------------------------------------------------------

pub fn list_tools_impl(state: &AppState) -> Vec<ToolRow> {
    state.read(|config| tools::rows(&config.tools))
}

pub fn save_tool_impl(
    state: &AppState,
    name: &str,
    description: &str,
    parameters: &str,
    overwrite: bool,
) -> Result<(), AppError> {
    state.mutate(|config| tools::save_tool(&mut config.tools, name, description, parameters, overwrite))
}

pub fn delete_tool_impl(state: &AppState, index: usize) -> Result<(), AppError> {
    state.mutate(|config| tools::delete_tool(&mut config.tools, index).map(|_| ()))
}

pub fn select_tools_impl(state: &AppState, names: &[String]) -> String {
    state.read(|config| tools::select_tools(&config.tools, names))
}

// ---------------------------------------------------------------------------
// Saved items and files
// ---------------------------------------------------------------------------

pub fn list_saved_items_impl(state: &AppState) -> Vec<SavedItemRow> {
    state.read(|config| saved_items::rows(&config.saved_items))
}

pub fn get_saved_item_impl(state: &AppState, index: usize) -> Result<SavedItem, AppError> {
    state
        .read(|config| config.saved_items.get(index).cloned())
        .ok_or_else(|| LibraryError::IndexOutOfRange(index).into())
}

pub fn delete_saved_item_impl(state: &AppState, index: usize) -> Result<(), AppError> {
    state.mutate(|config| saved_items::remove(&mut config.saved_items, index).map(|_| ()))
}

/// Open a session for a saved item, using the first configuration on its model
pub fn use_saved_item_impl(state: &AppState, index: usize) -> Result<(String, OpenedSession), AppError> {
    let item = get_saved_item_impl(state, index)?;
    let config = state
        .read(|config| config.llm_configs.find_by_model(&item.model))
        .ok_or_else(|| ChatError::NoConfigForModel(item.model.clone()))?;

    let name = config.name.clone();
    let opened = state
        .sessions()
        .lock()
        .open(config, Some(&item.prompt), Some(&item.response));
    Ok((name, opened))
}

pub fn list_files_impl(state: &AppState) -> Vec<SavedFile> {
    state.read(|config| config.files.clone())
}

pub fn add_file_impl(state: &AppState, source: &Path, overwrite: bool) -> Result<SavedFile, AppError> {
    state.mutate(|config| state.files().add_file(&mut config.files, source, overwrite))
}

pub fn delete_file_impl(state: &AppState, index: usize) -> Result<(), AppError> {
    state.mutate(|config| state.files().delete_file(&mut config.files, index).map(|_| ()))
}

// ---------------------------------------------------------------------------
// Chat sessions
// ---------------------------------------------------------------------------

/// Open (or find) the session for a configuration
pub fn open_chat_impl(state: &AppState, config_name: &str) -> Result<OpenedSession, AppError> {
    let config = state
        .read(|config| config.llm_configs.get(config_name))
        .ok_or_else(|| ModelConfigError::NotFound(config_name.to_string()))?;
    Ok(state.sessions().lock().open(config, None, None))
}

pub fn chat_state_impl(state: &AppState, config_name: &str) -> Result<ChatSessionView, AppError> {
    Ok(state.sessions().lock().get(config_name)?.view())
}

/// Session view for the window showing `session_id`
pub fn chat_state_for_session_impl(state: &AppState, session_id: &str) -> Result<ChatSessionView, AppError> {
    let sessions = state.sessions().lock();
    let name = sessions
        .name_for_id(session_id)
        .ok_or_else(|| ChatError::SessionNotFound(session_id.to_string()))?;
    Ok(sessions.get(&name)?.view())
}

pub fn close_chat_window_impl(state: &AppState, session_id: &str) -> bool {
    state.sessions().lock().close_by_id(session_id)
}

pub async fn send_chat_impl(
    state: &AppState,
    backend: &dyn ChatBackend,
    emitter: &dyn ChatEventEmitter,
    config_name: &str,
    prompt: &str,
) -> Result<ChatSessionView, AppError> {
    chat::send_prompt(state.sessions(), backend, emitter, config_name, prompt).await?;
    chat_state_impl(state, config_name)
}

fn emit_notice(emitter: &dyn ChatEventEmitter, config_name: &str, message: String) {
    emitter.emit_chat_notice(ChatNoticePayload {
        config_name: config_name.to_string(),
        message,
    });
}

pub fn new_conversation_impl(
    state: &AppState,
    emitter: &dyn ChatEventEmitter,
    config_name: &str,
) -> Result<ChatSessionView, AppError> {
    let (notice, view) = {
        let mut sessions = state.sessions().lock();
        let session = sessions.get_mut(config_name)?;
        (session.new_conversation(), session.view())
    };
    state.triggers().request_buffer_reset();
    emit_notice(emitter, config_name, notice);
    Ok(view)
}

pub fn apply_profile_impl(
    state: &AppState,
    emitter: &dyn ChatEventEmitter,
    config_name: &str,
    profile_name: &str,
) -> Result<ChatSessionView, AppError> {
    let profile = state
        .read(|config| config.llm_profiles.get(profile_name))
        .ok_or_else(|| ProfileError::NotFound(profile_name.to_string()))?;

    let (notice, view) = {
        let mut sessions = state.sessions().lock();
        let session = sessions.get_mut(config_name)?;
        (session.apply_profile(&profile.name, profile.settings), session.view())
    };
    emit_notice(emitter, config_name, notice);
    Ok(view)
}

pub fn attach_image_impl(
    state: &AppState,
    emitter: &dyn ChatEventEmitter,
    config_name: &str,
    path: &Path,
) -> Result<ChatSessionView, AppError> {
    let (notice, view) = {
        let mut sessions = state.sessions().lock();
        let session = sessions.get_mut(config_name)?;
        (session.attach_image(path)?, session.view())
    };
    emit_notice(emitter, config_name, notice);
    Ok(view)
}

pub fn use_file_impl(state: &AppState, config_name: &str, index: usize) -> Result<ChatSessionView, AppError> {
    let file = state
        .read(|config| config.files.get(index).cloned())
        .ok_or(LibraryError::IndexOutOfRange(index))?;

    let mut sessions = state.sessions().lock();
    let session = sessions.get_mut(config_name)?;
    session.add_file_context(&file)?;
    Ok(session.view())
}

/// What to keep from a chat window
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SaveTarget {
    LastPrompt,
    LastResponse,
    FullHistory,
}

pub fn save_from_chat_impl(state: &AppState, config_name: &str, target: SaveTarget) -> Result<SavedItem, AppError> {
    let item = {
        let sessions = state.sessions().lock();
        let session = sessions.get(config_name)?;
        let model = session.config().model.as_str();
        match target {
            SaveTarget::LastPrompt => {
                SavedItem::new(SavedItemKind::Prompt, model, &session.last_prompt()?, "")
            }
            SaveTarget::LastResponse => {
                SavedItem::new(SavedItemKind::Response, model, "", &session.last_response()?)
            }
            SaveTarget::FullHistory => {
                SavedItem::new(SavedItemKind::History, model, &session.history_text()?, "")
            }
        }
    };

    state.mutate(|config| {
        config.saved_items.push(item.clone());
        Ok::<_, AppError>(())
    })?;
    crate::info!("Saved {:?} item from '{}'", item.kind, config_name);
    Ok(item)
}

/// Message shown to the user for a failed command
pub fn to_user_error(error: AppError) -> String {
    crate::warn!("Command failed ({:?}): {}", error.category(), error);
    error.to_string()
}
