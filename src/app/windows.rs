// Query windows - one webview per chat session, labelled by session id
//
// Window creation must happen on the main thread: commands that open windows
// are async, and the keyboard listener goes through run_on_main_thread.

use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindowBuilder};

use super::AppState;
use crate::chat::OpenedSession;
use crate::commands::logic;
use crate::listener::QueryWindowOpener;
use crate::shutdown;

pub const MAIN_WINDOW_LABEL: &str = "main";
pub const QUERY_WINDOW_PREFIX: &str = "query-";
const QUERY_PAGE: &str = "query.html";
const QUERY_WINDOW_WIDTH: f64 = 700.0;
const QUERY_WINDOW_HEIGHT: f64 = 600.0;

pub fn query_window_label(session_id: &str) -> String {
    format!("{}{}", QUERY_WINDOW_PREFIX, session_id)
}

/// Session id for a query window label, None for any other window
pub fn session_id_from_label(label: &str) -> Option<&str> {
    label
        .strip_prefix(QUERY_WINDOW_PREFIX)
        .filter(|id| !id.is_empty())
}

/// Focus the session's window, creating it if it does not exist yet
#[cfg_attr(coverage_nightly, coverage(off))]
pub fn show_query_window(app: &AppHandle, session_id: &str, title: &str) -> tauri::Result<()> {
    let label = query_window_label(session_id);
    if let Some(window) = app.get_webview_window(&label) {
        window.show()?;
        window.set_focus()?;
        return Ok(());
    }

    let window = WebviewWindowBuilder::new(app, &label, WebviewUrl::App(QUERY_PAGE.into()))
        .title(title)
        .inner_size(QUERY_WINDOW_WIDTH, QUERY_WINDOW_HEIGHT)
        .build()?;
    window.set_focus()?;
    crate::debug!("Created query window {}", label);
    Ok(())
}

/// Show the window for a session just returned by `open`
#[cfg_attr(coverage_nightly, coverage(off))]
pub fn present_session(
    app: &AppHandle,
    state: &AppState,
    config_name: &str,
    opened: &OpenedSession,
) -> Result<(), String> {
    let title = state
        .sessions()
        .lock()
        .get(config_name)
        .map(|session| session.title())
        .map_err(|e| e.to_string())?;
    show_query_window(app, opened.session_id(), &title).map_err(|e| {
        crate::error!("Failed to show query window for '{}': {}", config_name, e);
        e.to_string()
    })
}

/// Opens query windows for `__N` aliases typed anywhere
pub struct TauriWindowOpener {
    app: AppHandle,
}

impl TauriWindowOpener {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl QueryWindowOpener for TauriWindowOpener {
    #[cfg_attr(coverage_nightly, coverage(off))]
    fn open_query_window(&self, config_name: &str) {
        if shutdown::is_shutting_down() {
            return;
        }
        let app = self.app.clone();
        let name = config_name.to_string();
        let result = self.app.run_on_main_thread(move || {
            let Some(state) = app.try_state::<AppState>() else {
                crate::warn!("App state not ready, ignoring alias for '{}'", name);
                return;
            };
            match logic::open_chat_impl(&state, &name) {
                Ok(opened) => {
                    let _ = present_session(&app, &state, &name, &opened);
                }
                Err(e) => crate::warn!("Could not open query window for '{}': {}", name, e),
            }
        });
        if let Err(e) = result {
            crate::error!("Failed to schedule query window: {}", e);
        }
    }
}

/// Window destroyed hook.
///
/// A query window takes its session with it. The main window takes the app.
#[cfg_attr(coverage_nightly, coverage(off))]
pub fn on_window_destroyed(window: &tauri::Window) {
    let label = window.label();
    let app = window.app_handle();

    if let Some(session_id) = session_id_from_label(label) {
        if let Some(state) = app.try_state::<AppState>() {
            logic::close_chat_window_impl(&state, session_id);
        }
        return;
    }

    if label != MAIN_WINDOW_LABEL {
        crate::debug!("Window '{}' destroyed, nothing to clean up", label);
        return;
    }

    // Stops alias handling before the remaining windows go away
    shutdown::signal_shutdown();
    crate::debug!("Main window destroyed, saving and exiting...");

    if let Some(state) = app.try_state::<AppState>() {
        if let Err(e) = state.save() {
            crate::error!("Failed to save config on exit: {}", e);
        }
    }
    app.exit(0);
}

#[cfg(test)]
#[path = "windows_test.rs"]
mod tests;
