// Tests for ProfileStore
// Test cases:
// - Save, reload for editing, save again reproduces numbers and tool JSON
// - Existing names need overwrite, names are case-sensitive
// - Unsupported parameters are dropped, system_message is always kept
// - Validation failure leaves the store unchanged

use super::*;
use serde_json::json;

fn form(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("form must be an object"),
    }
}

fn tools_json() -> Value {
    json!([{
        "type": "function",
        "function": {
            "name": "get_weather",
            "description": "Current weather",
            "parameters": {"type": "object", "properties": {"city": {"type": "string"}}}
        }
    }])
}

#[test]
fn test_save_then_edit_round_trip() {
    let mut store = ProfileStore::new();
    let tools_text = serde_json::to_string(&tools_json()).unwrap();
    store
        .save(
            "Precise",
            "openai/gpt-4o",
            &form(json!({"temperature": "0.7", "top_p": "0.9", "tools": tools_text})),
            None,
            false,
        )
        .unwrap();

    let values = store.form_values("Precise").unwrap();
    assert_eq!(values["temperature"], json!("0.7"));
    assert_eq!(values["top_p"], json!("0.9"));
    let reparsed: Value = serde_json::from_str(values["tools"].as_str().unwrap()).unwrap();
    assert_eq!(reparsed, tools_json());

    // Saving the edited values again gives identical settings
    let before = store.get("Precise").unwrap().settings;
    store
        .save("Precise", "openai/gpt-4o", &values, None, true)
        .unwrap();
    assert_eq!(store.get("Precise").unwrap().settings, before);
}

#[test]
fn test_existing_name_requires_overwrite() {
    let mut store = ProfileStore::new();
    store
        .save("Creative", "m/a", &form(json!({"temperature": "1.5"})), None, false)
        .unwrap();

    let result = store.save("Creative", "m/b", &form(json!({})), None, false);
    assert_eq!(
        result.unwrap_err(),
        ProfileError::AlreadyExists("Creative".to_string())
    );
    assert_eq!(store.get("Creative").unwrap().model, "m/a");

    // Different case is a different profile
    store.save("creative", "m/b", &form(json!({})), None, false).unwrap();
    assert_eq!(store.names(), vec!["Creative".to_string(), "creative".to_string()]);

    store.save("Creative", "m/c", &form(json!({})), None, true).unwrap();
    assert_eq!(store.get("Creative").unwrap().model, "m/c");
}

#[test]
fn test_unsupported_parameters_dropped() {
    let mut store = ProfileStore::new();
    let supported = vec!["temperature".to_string(), "max_tokens".to_string()];

    let profile = store
        .save(
            "Limited",
            "m/limited",
            &form(json!({
                "temperature": "0.2",
                "top_p": "7",
                "system_message": "You are terse.",
            })),
            Some(&supported),
            false,
        )
        .unwrap();

    // top_p would fail validation, but the model never advertised it
    assert_eq!(
        Value::Object(profile.settings),
        json!({"model": "m/limited", "system_message": "You are terse.", "temperature": 0.2})
    );
}

#[test]
fn test_validation_failure_leaves_store_unchanged() {
    let mut store = ProfileStore::new();
    let result = store.save(
        "Broken",
        "m/x",
        &form(json!({"temperature": "9"})),
        None,
        false,
    );

    assert!(matches!(result, Err(ProfileError::Validation(ref e)) if e.field == "temperature"));
    assert!(store.get("Broken").is_none());
}

#[test]
fn test_blank_name_or_model_rejected() {
    let mut store = ProfileStore::new();
    assert_eq!(
        store.save("  ", "m/x", &Map::new(), None, false).unwrap_err(),
        ProfileError::EmptyName
    );
    assert_eq!(
        store.save("P", "", &Map::new(), None, false).unwrap_err(),
        ProfileError::MissingModel
    );
}

#[test]
fn test_names_sorted_and_remove() {
    let mut store = ProfileStore::new();
    for name in ["beta", "Alpha", "gamma"] {
        store.save(name, "m/x", &Map::new(), None, false).unwrap();
    }
    assert_eq!(store.names(), vec!["Alpha", "beta", "gamma"]);

    assert!(store.remove("beta"));
    assert!(!store.remove("beta"));
    assert!(matches!(
        store.form_values("beta"),
        Err(ProfileError::NotFound(_))
    ));
}

#[test]
fn test_persisted_shape_matches_config_file() {
    let json = r#"{"Default": {"model": "openai/gpt-4o", "temperature": 0.5}}"#;
    let store: ProfileStore = serde_json::from_str(json).unwrap();

    let profile = store.get("Default").unwrap();
    assert_eq!(profile.model, "openai/gpt-4o");
    assert_eq!(profile.settings["temperature"], json!(0.5));
}
