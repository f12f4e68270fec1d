// Listener handler - per-event pipeline run inside the keyboard hook callback
// Must stay non-blocking: no I/O, no network, no waiting on other threads

use std::sync::Arc;

use crate::events::{current_timestamp, listener_events, ListenerEventEmitter};
use crate::keyboard::{InjectionGate, InjectionJob, InjectorThreadHandle};
use crate::triggers::{KeyInput, SharedTriggers, TriggerAction, TriggerMatch, TriggerMatcher};

/// Receives matches found by the listener
pub trait MatchDispatcher: Send {
    fn dispatch(&self, found: TriggerMatch);
}

/// Opens (or focuses) the query window for a configuration.
/// Implementations marshal onto the UI thread.
pub trait QueryWindowOpener: Send + Sync {
    fn open_query_window(&self, config_name: &str);
}

/// Owns the matcher and applies suppression and reset requests
pub struct ListenerHandler<D: MatchDispatcher> {
    matcher: TriggerMatcher,
    triggers: Arc<SharedTriggers>,
    gate: Arc<InjectionGate>,
    dispatcher: D,
}

impl<D: MatchDispatcher> ListenerHandler<D> {
    pub fn new(triggers: Arc<SharedTriggers>, gate: Arc<InjectionGate>, dispatcher: D) -> Self {
        Self {
            matcher: TriggerMatcher::new(),
            triggers,
            gate,
            dispatcher,
        }
    }

    /// Feed one classified key press through the matcher
    pub fn handle_key(&mut self, input: &KeyInput) {
        if self.triggers.take_reset_request() {
            self.matcher.reset();
        }
        // Our own synthetic keystrokes
        if self.gate.is_suppressed() {
            return;
        }

        let snapshot = self.triggers.load();
        if let Some(found) = self.matcher.on_key(input, &snapshot) {
            crate::debug!(
                "Trigger matched ({} chars to erase): {:?}",
                found.erase_count,
                found.trigger
            );
            self.dispatcher.dispatch(found);
        }
    }

    pub fn buffer(&self) -> &str {
        self.matcher.buffer()
    }
}

/// Production dispatcher: queues injection jobs and opens query windows
pub struct ExpansionDispatcher {
    injector: InjectorThreadHandle,
    opener: Arc<dyn QueryWindowOpener>,
    emitter: Arc<dyn ListenerEventEmitter>,
}

impl ExpansionDispatcher {
    pub fn new(
        injector: InjectorThreadHandle,
        opener: Arc<dyn QueryWindowOpener>,
        emitter: Arc<dyn ListenerEventEmitter>,
    ) -> Self {
        Self {
            injector,
            opener,
            emitter,
        }
    }
}

impl MatchDispatcher for ExpansionDispatcher {
    fn dispatch(&self, found: TriggerMatch) {
        let config_name = match found.action {
            TriggerAction::InjectText { output } => {
                self.injector.submit(InjectionJob::Replace {
                    erase: found.erase_count,
                    text: output,
                });
                None
            }
            TriggerAction::OpenQueryWindow { config_name } => {
                // Window opens only after the alias is erased, so the backspaces
                // land in the application the user was typing in
                let opener = self.opener.clone();
                let name = config_name.clone();
                self.injector.submit(InjectionJob::Erase {
                    count: found.erase_count,
                    then: Some(Box::new(move || opener.open_query_window(&name))),
                });
                Some(config_name)
            }
        };

        self.emitter
            .emit_shortcut_expanded(listener_events::ShortcutExpandedPayload {
                trigger: found.trigger,
                config_name,
                timestamp: current_timestamp(),
            });
    }
}

#[cfg(test)]
#[path = "handler_test.rs"]
mod tests;
