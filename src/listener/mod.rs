// Global keyboard listener - runs the OS keyboard hook on a dedicated thread
//
// rdev on Windows and Linux, CGEventTap on macOS. Neither hook offers a way to
// stop it; it is released when the process exits.

mod classify;
mod handler;

#[cfg(target_os = "macos")]
mod cgeventtap;
#[cfg(not(target_os = "macos"))]
mod rdev_backend;

#[cfg(target_os = "macos")]
use cgeventtap as backend;
#[cfg(not(target_os = "macos"))]
use rdev_backend as backend;

pub use handler::{ExpansionDispatcher, ListenerHandler, MatchDispatcher, QueryWindowOpener};

use std::thread::{self, JoinHandle};

/// Start the listener thread. `on_failure` runs on that thread if the OS hook
/// cannot be installed or stops with an error.
pub fn start<D, F>(handler: ListenerHandler<D>, on_failure: F) -> std::io::Result<JoinHandle<()>>
where
    D: MatchDispatcher + 'static,
    F: FnOnce(String) + Send + 'static,
{
    thread::Builder::new()
        .name("key-listener".to_string())
        .spawn(move || {
            let mut handler = handler;
            crate::info!("Keyboard listener started");

            let result = backend::listen(move |input| {
                if !crate::shutdown::is_shutting_down() {
                    handler.handle_key(&input);
                }
            });
            if let Err(reason) = result {
                crate::error!("Keyboard listener stopped: {}", reason);
                on_failure(reason);
            }
        })
}
