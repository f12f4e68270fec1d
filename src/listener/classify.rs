// Maps raw hook events to matcher input

use crate::triggers::KeyInput;

/// Input for a key press other than space or backspace, given the text it
/// produced. Empty text or text with control characters resets the matcher.
pub fn text_input(text: Option<&str>) -> KeyInput {
    match text.filter(|text| !text.is_empty() && !text.chars().any(char::is_control)) {
        Some(text) => KeyInput::Text(text.to_string()),
        None => KeyInput::Other,
    }
}

/// Classify an rdev event. Returns None for events the matcher ignores
/// (key releases, mouse and wheel events).
#[cfg(not(target_os = "macos"))]
pub fn classify(event: &rdev::Event) -> Option<KeyInput> {
    use rdev::{EventType, Key};

    let key = match event.event_type {
        EventType::KeyPress(key) => key,
        _ => return None,
    };

    Some(match key {
        Key::Space => KeyInput::Space,
        Key::Backspace => KeyInput::Backspace,
        _ => text_input(event.name.as_deref()),
    })
}

/// Virtual key codes from HIToolbox Events.h
#[cfg(target_os = "macos")]
mod mac_keycodes {
    pub const SPACE: u16 = 49;
    pub const DELETE: u16 = 51;
}

/// Classify a macOS key-down by its virtual key code and the text the event carries
#[cfg(target_os = "macos")]
pub fn classify_key_code(key_code: u16, text: Option<&str>) -> KeyInput {
    match key_code {
        mac_keycodes::SPACE => KeyInput::Space,
        mac_keycodes::DELETE => KeyInput::Backspace,
        _ => text_input(text),
    }
}

#[cfg(test)]
#[path = "classify_test.rs"]
mod tests;
