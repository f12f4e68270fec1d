//! Application setup and initialization.
//!
//! Loads settings and user data, then starts the model refresh and the
//! keyboard listener. Called from the Tauri setup hook.

use std::path::PathBuf;
use std::sync::Arc;
use tauri::{App, AppHandle, Manager};

use super::windows::TauriWindowOpener;
use super::AppState;
use crate::commands::{logic, TauriEventEmitter};
use crate::config::ConfigStore;
use crate::events::{current_timestamp, listener_events, ListenerEventEmitter};
use crate::keyboard::{EnigoInjector, InjectionGate, InjectorThreadHandle};
use crate::library::FileLibrary;
use crate::listener::{self, ExpansionDispatcher, ListenerHandler};
use crate::llm::OpenRouterClient;
use crate::paths;
use crate::shutdown;
use crate::util::AppSettings;

/// Main application setup function.
pub fn setup(app: &App) -> Result<(), Box<dyn std::error::Error>> {
    crate::info!("Setting up textpilot...");

    setup_signal_handlers(app)?;

    let settings = AppSettings::load(app.handle());
    crate::debug!("Loaded settings: {:?}", settings);

    let state = load_app_state();
    if let Some(warning) = state.load_warning() {
        crate::warn!("Starting with an empty configuration: {}", warning);
    }
    let triggers = state.triggers();
    app.manage(state);

    let client = OpenRouterClient::new(&settings.llm_base_url, settings.request_timeout)?;
    app.manage(client);

    spawn_model_refresh(app.handle().clone());
    start_keyboard_listener(app.handle(), &settings, triggers)?;

    crate::info!("Setup complete! Ready to expand.");
    Ok(())
}

/// Ctrl+C in the terminal goes through the same exit path as closing the main window
fn setup_signal_handlers(app: &App) -> Result<(), Box<dyn std::error::Error>> {
    shutdown::register_app_handle(app.handle().clone());
    if let Err(e) = ctrlc::set_handler(|| {
        shutdown::signal_shutdown();
        shutdown::request_app_exit(0);
    }) {
        crate::warn!("Failed to set Ctrl+C handler: {}", e);
    }
    Ok(())
}

fn load_app_state() -> AppState {
    let config_path = paths::config_file_path().unwrap_or_else(|e| {
        crate::warn!("{}, using the working directory for config", e);
        PathBuf::from(".").join(paths::APP_DIR_NAME).join("config.json")
    });
    let files_dir = paths::files_dir().unwrap_or_else(|e| {
        crate::warn!("{}, using the working directory for saved files", e);
        PathBuf::from(".").join(paths::APP_DIR_NAME).join("saved_files")
    });
    crate::info!("Using config file {:?}", config_path);

    AppState::load(ConfigStore::new(config_path), FileLibrary::new(files_dir))
}

/// Fetch the model list in the background; failures only affect profile editing
fn spawn_model_refresh(app: AppHandle) {
    tauri::async_runtime::spawn(async move {
        let state = app.state::<AppState>();
        let client = app.state::<OpenRouterClient>();
        let emitter = TauriEventEmitter::new(app.clone());
        // Errors are already logged and emitted
        let _ = logic::refresh_models_impl(&state, &client, &emitter).await;
    });
}

fn start_keyboard_listener(
    app: &AppHandle,
    settings: &AppSettings,
    triggers: Arc<crate::triggers::SharedTriggers>,
) -> Result<(), Box<dyn std::error::Error>> {
    let gate = Arc::new(InjectionGate::new(settings.settle));
    let keystroke_delay = settings.keystroke_delay;
    let injector = InjectorThreadHandle::spawn(move || EnigoInjector::new(keystroke_delay), gate.clone())?;

    let emitter = Arc::new(TauriEventEmitter::new(app.clone()));
    let dispatcher = ExpansionDispatcher::new(
        injector,
        Arc::new(TauriWindowOpener::new(app.clone())),
        emitter.clone(),
    );
    let handler = ListenerHandler::new(triggers, gate, dispatcher);

    let failure_app = app.clone();
    listener::start(handler, move |reason| {
        if let Some(state) = failure_app.try_state::<AppState>() {
            state.set_listener_error(reason.clone());
        }
        emitter.emit_listener_unavailable(listener_events::ListenerUnavailablePayload {
            reason,
            timestamp: current_timestamp(),
        });
    })?;
    Ok(())
}
