// Tauri IPC commands module
// This file contains Tauri-specific wrappers and is excluded from coverage.
// The actual logic is in logic.rs which is fully tested.
#![cfg_attr(coverage_nightly, coverage(off))]

mod common;
pub mod logic;

pub use common::TauriEventEmitter;
pub use logic::{SaveTarget, ShortcutRow, StartupStatus};

use serde_json::{Map, Value};
use std::path::PathBuf;
use tauri::{AppHandle, Manager, State};

use crate::app::windows::{self, query_window_label};
use crate::app::AppState;
use crate::chat::ChatSessionView;
use crate::library::{SavedFile, SavedItem, SavedItemRow, ToolRow};
use crate::llm::{ModelConfigRow, ModelInfo, OpenRouterClient};
use crate::profiles::Profile;
use logic::to_user_error;

type CommandResult<T> = Result<T, String>;

/// Startup warnings the main window shows once it has loaded
#[tauri::command]
pub fn get_startup_status(state: State<'_, AppState>) -> StartupStatus {
    logic::startup_status_impl(&state)
}

// Shortcuts

#[tauri::command]
pub fn list_shortcuts(state: State<'_, AppState>) -> Vec<ShortcutRow> {
    logic::list_shortcuts_impl(&state)
}

#[tauri::command]
pub fn add_shortcut(state: State<'_, AppState>, trigger: String, output: String) -> CommandResult<()> {
    logic::add_shortcut_impl(&state, &trigger, &output).map_err(to_user_error)
}

#[tauri::command]
pub fn delete_shortcut(state: State<'_, AppState>, trigger: String) -> CommandResult<bool> {
    logic::delete_shortcut_impl(&state, &trigger).map_err(to_user_error)
}

#[tauri::command]
pub fn set_shortcut_enabled(state: State<'_, AppState>, trigger: String, enabled: bool) -> CommandResult<()> {
    logic::set_shortcut_enabled_impl(&state, &trigger, enabled).map_err(to_user_error)
}

// Model configurations and models

#[tauri::command]
pub fn list_model_configs(state: State<'_, AppState>) -> Vec<ModelConfigRow> {
    logic::list_model_configs_impl(&state)
}

#[tauri::command]
pub fn add_model_config(
    state: State<'_, AppState>,
    name: String,
    api_key: String,
    model: String,
) -> CommandResult<()> {
    logic::add_model_config_impl(&state, &name, &api_key, &model).map_err(to_user_error)
}

#[tauri::command]
pub fn delete_model_config(state: State<'_, AppState>, name: String) -> CommandResult<()> {
    logic::delete_model_config_impl(&state, &name).map_err(to_user_error)
}

#[tauri::command]
pub async fn refresh_models(
    app_handle: AppHandle,
    state: State<'_, AppState>,
    client: State<'_, OpenRouterClient>,
) -> CommandResult<usize> {
    let emitter = TauriEventEmitter::new(app_handle);
    logic::refresh_models_impl(&state, &client, &emitter)
        .await
        .map_err(to_user_error)
}

#[tauri::command]
pub fn list_models(state: State<'_, AppState>) -> Vec<ModelInfo> {
    logic::list_models_impl(&state)
}

#[tauri::command]
pub fn get_supported_parameters(state: State<'_, AppState>, model: String) -> Option<Vec<String>> {
    logic::supported_parameters_impl(&state, &model)
}

// Profiles

#[tauri::command]
pub fn list_profiles(state: State<'_, AppState>) -> Vec<String> {
    logic::list_profiles_impl(&state)
}

#[tauri::command]
pub fn get_profile_form(state: State<'_, AppState>, name: String) -> CommandResult<Map<String, Value>> {
    logic::get_profile_form_impl(&state, &name).map_err(to_user_error)
}

#[tauri::command]
pub fn save_profile(
    state: State<'_, AppState>,
    name: String,
    model: String,
    form: Map<String, Value>,
    overwrite: bool,
) -> CommandResult<Profile> {
    logic::save_profile_impl(&state, &name, &model, &form, overwrite).map_err(to_user_error)
}

#[tauri::command]
pub fn delete_profile(state: State<'_, AppState>, name: String) -> CommandResult<()> {
    logic::delete_profile_impl(&state, &name).map_err(to_user_error)
}

// Tools

#[tauri::command]
pub fn list_tools(state: State<'_, AppState>) -> Vec<ToolRow> {
    logic::list_tools_impl(&state)
}

#[tauri::command]
pub fn save_tool(
    state: State<'_, AppState>,
    name: String,
    description: String,
    parameters: String,
    overwrite: bool,
) -> CommandResult<()> {
    logic::save_tool_impl(&state, &name, &description, &parameters, overwrite).map_err(to_user_error)
}

#[tauri::command]
pub fn delete_tool(state: State<'_, AppState>, index: usize) -> CommandResult<()> {
    logic::delete_tool_impl(&state, index).map_err(to_user_error)
}

#[tauri::command]
pub fn select_tools(state: State<'_, AppState>, names: Vec<String>) -> String {
    logic::select_tools_impl(&state, &names)
}

// Saved items and files

#[tauri::command]
pub fn list_saved_items(state: State<'_, AppState>) -> Vec<SavedItemRow> {
    logic::list_saved_items_impl(&state)
}

#[tauri::command]
pub fn get_saved_item(state: State<'_, AppState>, index: usize) -> CommandResult<SavedItem> {
    logic::get_saved_item_impl(&state, index).map_err(to_user_error)
}

#[tauri::command]
pub fn delete_saved_item(state: State<'_, AppState>, index: usize) -> CommandResult<()> {
    logic::delete_saved_item_impl(&state, index).map_err(to_user_error)
}

/// Async so the window is built off the IPC thread
#[tauri::command]
pub async fn use_saved_item(
    app_handle: AppHandle,
    state: State<'_, AppState>,
    index: usize,
) -> CommandResult<String> {
    let (config_name, opened) = logic::use_saved_item_impl(&state, index).map_err(to_user_error)?;
    windows::present_session(&app_handle, &state, &config_name, &opened)?;
    Ok(opened.session_id().to_string())
}

#[tauri::command]
pub fn list_files(state: State<'_, AppState>) -> Vec<SavedFile> {
    logic::list_files_impl(&state)
}

#[tauri::command]
pub fn add_file(state: State<'_, AppState>, path: PathBuf, overwrite: bool) -> CommandResult<SavedFile> {
    logic::add_file_impl(&state, &path, overwrite).map_err(to_user_error)
}

#[tauri::command]
pub fn delete_file(state: State<'_, AppState>, index: usize) -> CommandResult<()> {
    logic::delete_file_impl(&state, index).map_err(to_user_error)
}

// Chat sessions

/// Open the query window for a configuration, focusing it if already open
#[tauri::command]
pub async fn open_chat(
    app_handle: AppHandle,
    state: State<'_, AppState>,
    config_name: String,
) -> CommandResult<String> {
    let opened = logic::open_chat_impl(&state, &config_name).map_err(to_user_error)?;
    windows::present_session(&app_handle, &state, &config_name, &opened)?;
    Ok(opened.session_id().to_string())
}

#[tauri::command]
pub fn get_chat_state(state: State<'_, AppState>, config_name: String) -> CommandResult<ChatSessionView> {
    logic::chat_state_impl(&state, &config_name).map_err(to_user_error)
}

/// Query windows call this with their own session id on load
#[tauri::command]
pub fn get_chat_state_for_session(
    state: State<'_, AppState>,
    session_id: String,
) -> CommandResult<ChatSessionView> {
    logic::chat_state_for_session_impl(&state, &session_id).map_err(to_user_error)
}

/// Resolves once the reply (or error) has been delivered as an event
#[tauri::command]
pub async fn send_chat(
    app_handle: AppHandle,
    state: State<'_, AppState>,
    client: State<'_, OpenRouterClient>,
    config_name: String,
    prompt: String,
) -> CommandResult<ChatSessionView> {
    let emitter = TauriEventEmitter::new(app_handle);
    logic::send_chat_impl(&state, &*client, &emitter, &config_name, &prompt)
        .await
        .map_err(to_user_error)
}

#[tauri::command]
pub fn new_conversation(
    app_handle: AppHandle,
    state: State<'_, AppState>,
    config_name: String,
) -> CommandResult<ChatSessionView> {
    let emitter = TauriEventEmitter::new(app_handle);
    logic::new_conversation_impl(&state, &emitter, &config_name).map_err(to_user_error)
}

#[tauri::command]
pub fn apply_profile(
    app_handle: AppHandle,
    state: State<'_, AppState>,
    config_name: String,
    profile_name: String,
) -> CommandResult<ChatSessionView> {
    let emitter = TauriEventEmitter::new(app_handle.clone());
    let view = logic::apply_profile_impl(&state, &emitter, &config_name, &profile_name)
        .map_err(to_user_error)?;

    if let Some(window) = app_handle.get_webview_window(&query_window_label(&view.session_id)) {
        if let Err(e) = window.set_title(&view.title) {
            crate::warn!("Failed to update query window title: {}", e);
        }
    }
    Ok(view)
}

#[tauri::command]
pub fn attach_image(
    app_handle: AppHandle,
    state: State<'_, AppState>,
    config_name: String,
    path: PathBuf,
) -> CommandResult<ChatSessionView> {
    let emitter = TauriEventEmitter::new(app_handle);
    logic::attach_image_impl(&state, &emitter, &config_name, &path).map_err(to_user_error)
}

#[tauri::command]
pub fn use_file(state: State<'_, AppState>, config_name: String, index: usize) -> CommandResult<ChatSessionView> {
    logic::use_file_impl(&state, &config_name, index).map_err(to_user_error)
}

#[tauri::command]
pub fn save_from_chat(
    state: State<'_, AppState>,
    config_name: String,
    target: SaveTarget,
) -> CommandResult<SavedItem> {
    logic::save_from_chat_impl(&state, &config_name, target).map_err(to_user_error)
}
