// Tests for ListenerHandler and ExpansionDispatcher
// Test cases:
// - End-to-end "brb" typed through the handler dispatches one replacement
// - Events are dropped while the injection gate is suppressed
// - Pending reset requests clear the buffer before the next key
// - Dispatcher erases the alias before asking for the window
// - Dispatcher emits shortcut_expanded for both kinds of match

use super::*;
use crate::events::tests::MockEventEmitter;
use crate::keyboard::{InjectionError, KeystrokeInjector};
use crate::llm::ModelConfigs;
use crate::shortcuts::TriggerTable;
use crate::triggers::TriggerSnapshot;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Mock dispatcher that records matches
#[derive(Clone, Default)]
struct RecordingDispatcher {
    matches: Arc<Mutex<Vec<TriggerMatch>>>,
}

impl MatchDispatcher for RecordingDispatcher {
    fn dispatch(&self, found: TriggerMatch) {
        self.matches.lock().unwrap().push(found);
    }
}

/// Shared log of injector calls and window opens, in order
type Log = Arc<Mutex<Vec<String>>>;

struct LoggingInjector {
    log: Log,
}

impl KeystrokeInjector for LoggingInjector {
    fn erase(&mut self, count: usize) -> Result<(), InjectionError> {
        self.log.lock().unwrap().push(format!("erase {}", count));
        Ok(())
    }

    fn type_text(&mut self, text: &str) -> Result<(), InjectionError> {
        self.log.lock().unwrap().push(format!("type {}", text));
        Ok(())
    }
}

struct LoggingOpener {
    log: Log,
}

impl QueryWindowOpener for LoggingOpener {
    fn open_query_window(&self, config_name: &str) {
        self.log.lock().unwrap().push(format!("open {}", config_name));
    }
}

fn shared_triggers(shortcuts: &[(&str, &str)], configs: &[&str]) -> Arc<SharedTriggers> {
    let mut table = TriggerTable::new();
    for (trigger, output) in shortcuts {
        table.add(trigger, output).unwrap();
    }
    let mut model_configs = ModelConfigs::new();
    for name in configs {
        model_configs.add(name, "key", "model").unwrap();
    }
    Arc::new(SharedTriggers::new(TriggerSnapshot::new(&table, &model_configs)))
}

fn type_keys<D: MatchDispatcher>(handler: &mut ListenerHandler<D>, text: &str) {
    for c in text.chars() {
        handler.handle_key(&KeyInput::Text(c.to_string()));
    }
}

fn wait_for_len(log: &Log, len: usize) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if log.lock().unwrap().len() >= len {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    false
}

#[test]
fn test_brb_dispatches_replacement() {
    let dispatcher = RecordingDispatcher::default();
    let mut handler = ListenerHandler::new(
        shared_triggers(&[("brb", "be right back")], &[]),
        Arc::new(InjectionGate::new(Duration::ZERO)),
        dispatcher.clone(),
    );

    type_keys(&mut handler, "brb");

    let matches = dispatcher.matches.lock().unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].erase_count, 3);
    assert_eq!(handler.buffer(), "");
}

#[test]
fn test_suppressed_gate_drops_events() {
    let dispatcher = RecordingDispatcher::default();
    let gate = Arc::new(InjectionGate::new(Duration::ZERO));
    let mut handler = ListenerHandler::new(
        shared_triggers(&[("brb", "be right back")], &[]),
        gate.clone(),
        dispatcher.clone(),
    );

    gate.begin();
    type_keys(&mut handler, "brb");
    assert!(dispatcher.matches.lock().unwrap().is_empty());
    assert_eq!(handler.buffer(), "");

    gate.end();
    type_keys(&mut handler, "brb");
    assert_eq!(dispatcher.matches.lock().unwrap().len(), 1);
}

#[test]
fn test_reset_request_clears_buffer() {
    let triggers = shared_triggers(&[("brb", "be right back")], &[]);
    let dispatcher = RecordingDispatcher::default();
    let mut handler = ListenerHandler::new(
        triggers.clone(),
        Arc::new(InjectionGate::new(Duration::ZERO)),
        dispatcher.clone(),
    );

    type_keys(&mut handler, "br");
    triggers.request_buffer_reset();
    type_keys(&mut handler, "b");

    assert!(dispatcher.matches.lock().unwrap().is_empty());
    assert_eq!(handler.buffer(), "b");
}

#[test]
fn test_published_snapshot_used_on_next_key() {
    let triggers = shared_triggers(&[], &[]);
    let dispatcher = RecordingDispatcher::default();
    let mut handler = ListenerHandler::new(
        triggers.clone(),
        Arc::new(InjectionGate::new(Duration::ZERO)),
        dispatcher.clone(),
    );

    type_keys(&mut handler, "om");
    let mut table = TriggerTable::new();
    table.add("omw", "on my way").unwrap();
    triggers.publish(TriggerSnapshot::new(&table, &ModelConfigs::new()));
    type_keys(&mut handler, "w");

    assert_eq!(dispatcher.matches.lock().unwrap().len(), 1);
}

#[test]
fn test_dispatcher_erases_alias_before_opening_window() {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let gate = Arc::new(InjectionGate::new(Duration::ZERO));
    let injector_log = log.clone();
    let injector = InjectorThreadHandle::spawn(
        move || Ok(LoggingInjector { log: injector_log }),
        gate.clone(),
    )
    .unwrap();
    let emitter = Arc::new(MockEventEmitter::new());
    let dispatcher = ExpansionDispatcher::new(
        injector,
        Arc::new(LoggingOpener { log: log.clone() }),
        emitter.clone(),
    );
    let mut handler = ListenerHandler::new(
        shared_triggers(&[], &["Fast", "Smart"]),
        gate,
        dispatcher,
    );

    type_keys(&mut handler, "hi __2");

    assert!(wait_for_len(&log, 2));
    assert_eq!(
        *log.lock().unwrap(),
        vec!["erase 3".to_string(), "open Smart".to_string()]
    );
    let expanded = emitter.expanded_events.lock().unwrap();
    assert_eq!(expanded[0].trigger, "__2");
    assert_eq!(expanded[0].config_name.as_deref(), Some("Smart"));
}

#[test]
fn test_dispatcher_replaces_shortcut_text() {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let gate = Arc::new(InjectionGate::new(Duration::ZERO));
    let injector_log = log.clone();
    let injector = InjectorThreadHandle::spawn(
        move || Ok(LoggingInjector { log: injector_log }),
        gate.clone(),
    )
    .unwrap();
    let emitter = Arc::new(MockEventEmitter::new());
    let dispatcher = ExpansionDispatcher::new(
        injector,
        Arc::new(LoggingOpener { log: log.clone() }),
        emitter.clone(),
    );

    dispatcher.dispatch(TriggerMatch {
        trigger: "brb".to_string(),
        erase_count: 3,
        action: TriggerAction::InjectText {
            output: "be right back".to_string(),
        },
    });

    assert!(wait_for_len(&log, 2));
    assert_eq!(
        *log.lock().unwrap(),
        vec!["erase 3".to_string(), "type be right back".to_string()]
    );
    assert_eq!(emitter.expanded_events.lock().unwrap()[0].config_name, None);
}
