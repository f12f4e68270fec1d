// Shutdown coordination module
// Global flag that stops new keystroke injection once the app is exiting

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tauri::AppHandle;

/// Set when the app is shutting down
static APP_SHUTTING_DOWN: AtomicBool = AtomicBool::new(false);

/// App handle used by the Ctrl+C handler to request a clean exit
static APP_HANDLE: Mutex<Option<AppHandle>> = Mutex::new(None);

/// Signal that the app is shutting down
/// Call this first in WindowEvent::Destroyed before any cleanup
pub fn signal_shutdown() {
    APP_SHUTTING_DOWN.store(true, Ordering::SeqCst);
    crate::info!("App shutdown signaled");
}

/// Returns true after signal_shutdown() has been called
pub fn is_shutting_down() -> bool {
    APP_SHUTTING_DOWN.load(Ordering::SeqCst)
}

/// Register the Tauri app handle so Ctrl+C can go through `AppHandle::exit`
/// instead of `std::process::exit`, which would skip the final config save.
pub fn register_app_handle(handle: AppHandle) {
    if let Ok(mut guard) = APP_HANDLE.lock() {
        *guard = Some(handle);
    }
}

/// Request a graceful app exit (if an AppHandle has been registered).
pub fn request_app_exit(exit_code: i32) {
    // Clone out so the lock is not held while calling into Tauri
    let handle = APP_HANDLE.lock().ok().and_then(|g| g.as_ref().cloned());
    match handle {
        Some(handle) => handle.exit(exit_code),
        None => crate::warn!("Exit requested before the app handle was registered"),
    }
}

#[cfg(test)]
#[path = "shutdown_test.rs"]
mod tests;
