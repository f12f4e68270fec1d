// Tests for the commands/common module's public API

use super::*;

#[test]
fn test_tauri_event_emitter_exported() {
    // Compile-time check - we can't instantiate without an AppHandle
    fn _takes_emitter(_: &TauriEventEmitter) {}
}
