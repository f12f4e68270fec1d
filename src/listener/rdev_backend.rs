// rdev keyboard hook for Windows and Linux
//
// macOS uses the CGEventTap backend: rdev resolves key names there through the
// keyboard layout API, which macOS only allows on the main queue.

use super::classify::classify;
use crate::triggers::KeyInput;

/// Run the hook on the calling thread. Blocks for the life of the process
/// unless the hook cannot be installed.
pub fn listen<F>(mut on_key: F) -> Result<(), String>
where
    F: FnMut(KeyInput) + 'static,
{
    rdev::listen(move |event| {
        if let Some(input) = classify(&event) {
            on_key(input);
        }
    })
    .map_err(|e| format!("{:?}", e))
}
