// Tests for the injector thread
// Test cases:
// - Replace erases then types, in order
// - Gate is suppressed from submit until the job has run
// - Jobs still close the gate when the injector could not be created

use super::*;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Erase(usize),
    Type(String),
}

/// Mock injector that records calls into a shared log
struct RecordingInjector {
    calls: Arc<Mutex<Vec<Call>>>,
    delay: Duration,
}

impl KeystrokeInjector for RecordingInjector {
    fn erase(&mut self, count: usize) -> Result<(), InjectionError> {
        std::thread::sleep(self.delay);
        self.calls.lock().unwrap().push(Call::Erase(count));
        Ok(())
    }

    fn type_text(&mut self, text: &str) -> Result<(), InjectionError> {
        self.calls.lock().unwrap().push(Call::Type(text.to_string()));
        Ok(())
    }
}

fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    false
}

#[test]
fn test_execute_replace_erases_then_types() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let mut injector = RecordingInjector {
        calls: calls.clone(),
        delay: Duration::ZERO,
    };

    execute_job(
        &mut injector,
        &InjectionJob::Replace {
            erase: 3,
            text: "be right back".to_string(),
        },
    )
    .unwrap();

    assert_eq!(
        *calls.lock().unwrap(),
        vec![Call::Erase(3), Call::Type("be right back".to_string())]
    );
}

#[test]
fn test_gate_suppressed_until_job_runs() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let gate = Arc::new(InjectionGate::new(Duration::ZERO));
    let thread_calls = calls.clone();
    let handle = InjectorThreadHandle::spawn(
        move || {
            Ok(RecordingInjector {
                calls: thread_calls,
                delay: Duration::from_millis(50),
            })
        },
        gate.clone(),
    )
    .unwrap();

    assert!(handle.submit(InjectionJob::Erase {
        count: 4,
        then: None
    }));
    assert!(gate.is_suppressed());

    assert!(wait_until(|| !gate.is_suppressed()));
    assert_eq!(*calls.lock().unwrap(), vec![Call::Erase(4)]);
}

#[test]
fn test_followup_runs_after_erase() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let gate = Arc::new(InjectionGate::new(Duration::ZERO));
    let thread_calls = calls.clone();
    let handle = InjectorThreadHandle::spawn(
        move || {
            Ok(RecordingInjector {
                calls: thread_calls,
                delay: Duration::from_millis(10),
            })
        },
        gate,
    )
    .unwrap();

    let followup_calls = calls.clone();
    assert!(handle.submit(InjectionJob::Erase {
        count: 3,
        then: Some(Box::new(move || {
            followup_calls
                .lock()
                .unwrap()
                .push(Call::Type("opened".to_string()));
        })),
    }));

    assert!(wait_until(|| calls.lock().unwrap().len() == 2));
    assert_eq!(
        *calls.lock().unwrap(),
        vec![Call::Erase(3), Call::Type("opened".to_string())]
    );
}

#[test]
fn test_failed_injector_still_releases_gate() {
    let gate = Arc::new(InjectionGate::new(Duration::ZERO));
    let handle = InjectorThreadHandle::spawn(
        || -> Result<RecordingInjector, InjectionError> {
            Err(InjectionError::Init("no display".to_string()))
        },
        gate.clone(),
    )
    .unwrap();

    assert!(handle.submit(InjectionJob::Replace {
        erase: 2,
        text: "x".to_string(),
    }));
    assert!(wait_until(|| !gate.is_suppressed()));
}

#[test]
fn test_drop_stops_thread() {
    let gate = Arc::new(InjectionGate::new(Duration::ZERO));
    let handle = InjectorThreadHandle::spawn(
        || {
            Ok(RecordingInjector {
                calls: Arc::new(Mutex::new(Vec::new())),
                delay: Duration::ZERO,
            })
        },
        gate.clone(),
    )
    .unwrap();

    drop(handle);
    assert!(!gate.is_suppressed());
}
