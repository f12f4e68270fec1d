// Keystroke injection - erases typed triggers and types replacement text
// Uses the enigo crate for cross-platform key synthesis

mod gate;
mod worker;

pub use gate::{InjectionGate, DEFAULT_SETTLE_MS};
pub use worker::{InjectionJob, InjectorThreadHandle};

use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use std::thread;
use std::time::Duration;

/// Default pause between synthetic backspace events
pub const DEFAULT_KEYSTROKE_DELAY_MS: u64 = 10;

/// Error types for keystroke injection
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InjectionError {
    #[error("Failed to create keyboard simulator: {0}")]
    Init(String),
    #[error("Failed to send key event: {0}")]
    Input(String),
}

/// Synthesizes keyboard input into the focused application
pub trait KeystrokeInjector {
    /// Send `count` backspace press/release pairs
    fn erase(&mut self, count: usize) -> Result<(), InjectionError>;

    /// Type `text` as keystrokes
    fn type_text(&mut self, text: &str) -> Result<(), InjectionError>;
}

/// Enigo-backed injector. Must be created on the thread that uses it.
pub struct EnigoInjector {
    enigo: Enigo,
    keystroke_delay: Duration,
}

impl EnigoInjector {
    pub fn new(keystroke_delay: Duration) -> Result<Self, InjectionError> {
        let enigo =
            Enigo::new(&Settings::default()).map_err(|e| InjectionError::Init(e.to_string()))?;
        Ok(Self {
            enigo,
            keystroke_delay,
        })
    }

    fn pause(&self) {
        if !self.keystroke_delay.is_zero() {
            thread::sleep(self.keystroke_delay);
        }
    }
}

impl KeystrokeInjector for EnigoInjector {
    fn erase(&mut self, count: usize) -> Result<(), InjectionError> {
        for _ in 0..count {
            // Stop between pairs, never between press and release
            if crate::shutdown::is_shutting_down() {
                break;
            }
            self.enigo
                .key(Key::Backspace, Direction::Press)
                .map_err(|e| InjectionError::Input(e.to_string()))?;
            self.pause();
            self.enigo
                .key(Key::Backspace, Direction::Release)
                .map_err(|e| InjectionError::Input(e.to_string()))?;
            self.pause();
        }
        Ok(())
    }

    fn type_text(&mut self, text: &str) -> Result<(), InjectionError> {
        if text.is_empty() || crate::shutdown::is_shutting_down() {
            return Ok(());
        }
        self.enigo
            .text(text)
            .map_err(|e| InjectionError::Input(e.to_string()))
    }
}

#[cfg(test)]
#[path = "keyboard_test.rs"]
mod tests;
