// Tests for AppState
// Test cases:
// - mutate persists and republishes the trigger snapshot
// - a failed edit leaves memory and disk untouched
// - a failed write leaves memory untouched
// - malformed config starts empty with a warning and a backup

use super::*;
use crate::shortcuts::TriggerTableError;
use std::fs;
use tempfile::TempDir;

fn create_test_state() -> (AppState, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let store = ConfigStore::new(temp_dir.path().join("config.json"));
    let files = FileLibrary::new(temp_dir.path().join("saved_files"));
    (AppState::load(store, files), temp_dir)
}

#[test]
fn test_mutate_persists_and_publishes() {
    let (state, temp_dir) = create_test_state();
    let triggers = state.triggers();
    assert!(triggers.load().shortcuts().is_empty());

    state
        .mutate(|config| config.shortcuts.add("sig", "Best regards"))
        .unwrap();

    assert_eq!(triggers.load().shortcuts().len(), 1);
    let on_disk = ConfigStore::new(temp_dir.path().join("config.json")).load().unwrap();
    assert_eq!(on_disk.shortcuts.len(), 1);
    assert_eq!(state.read(|c| c.shortcuts.len()), 1);
}

#[test]
fn test_failed_edit_changes_nothing() {
    let (state, temp_dir) = create_test_state();
    state
        .mutate(|config| config.shortcuts.add("sig", "Best regards"))
        .unwrap();

    let result = state.mutate(|config| {
        config.shortcuts.remove("sig");
        config.shortcuts.add("", "")
    });

    assert!(matches!(
        result,
        Err(AppError::Shortcut(TriggerTableError::EmptyField))
    ));
    assert_eq!(state.read(|c| c.shortcuts.len()), 1);
    let on_disk = ConfigStore::new(temp_dir.path().join("config.json")).load().unwrap();
    assert_eq!(on_disk.shortcuts.len(), 1);
}

#[test]
fn test_failed_write_keeps_memory() {
    let temp_dir = TempDir::new().unwrap();
    // Parent "directory" is a regular file, so every save fails
    let blocker = temp_dir.path().join("blocker");
    fs::write(&blocker, "").unwrap();
    let store = ConfigStore::new(blocker.join("config.json"));
    let state = AppState::with_config(
        ConfigFile::default(),
        store,
        FileLibrary::new(temp_dir.path().join("files")),
        None,
    );

    let result = state.mutate(|config| config.llm_configs.add("Fast", "sk", "m"));

    assert!(matches!(result, Err(AppError::Config(ConfigError::Save(_)))));
    assert!(state.read(|c| c.llm_configs.is_empty()));
    assert!(state.triggers().load().config_names().is_empty());
}

#[test]
fn test_malformed_config_starts_empty_with_warning() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(&path, "{ broken").unwrap();

    let state = AppState::load(
        ConfigStore::new(path.clone()),
        FileLibrary::new(temp_dir.path().join("files")),
    );

    let warning = state.load_warning().unwrap();
    assert!(warning.contains("Could not load configuration"));
    assert!(state.read(|c| c.shortcuts.is_empty()));
    assert_eq!(
        fs::read_to_string(path.with_extension("json.bak")).unwrap(),
        "{ broken"
    );
}

#[test]
fn test_supported_parameters_lookup() {
    let (state, _temp_dir) = create_test_state();
    state.set_models(vec![
        ModelInfo {
            id: "a/model".to_string(),
            supported_parameters: Some(vec!["temperature".to_string()]),
        },
        ModelInfo {
            id: "b/model".to_string(),
            supported_parameters: None,
        },
    ]);

    assert_eq!(
        state.supported_parameters("a/model"),
        Some(vec!["temperature".to_string()])
    );
    assert_eq!(state.supported_parameters("b/model"), None);
    assert_eq!(state.supported_parameters("missing"), None);
    assert_eq!(state.models().len(), 2);
}

#[test]
fn test_listener_error_is_remembered() {
    let (state, _dir) = create_test_state();
    assert_eq!(state.listener_error(), None);

    state.set_listener_error("hook denied".to_string());
    assert_eq!(state.listener_error().as_deref(), Some("hook denied"));
}
