// Injector thread - runs keystroke jobs off the keyboard hook
// Communicates via channel; the injector is built on the thread that uses it

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::{InjectionError, InjectionGate, KeystrokeInjector};

/// Callback run on the injector thread once a job's keystrokes are sent
pub type Followup = Box<dyn FnOnce() + Send>;

/// Work queued for the injector thread
pub enum InjectionJob {
    /// Erase the typed alias, then run `then`
    Erase {
        count: usize,
        then: Option<Followup>,
    },
    /// Erase the typed trigger, then type its replacement
    Replace { erase: usize, text: String },
    /// Stop the thread
    Shutdown,
}

/// Handle to the injector thread. Dropping it stops the thread.
pub struct InjectorThreadHandle {
    sender: Sender<InjectionJob>,
    gate: Arc<InjectionGate>,
    thread: Option<JoinHandle<()>>,
}

impl InjectorThreadHandle {
    /// Spawn the injector thread. `make_injector` runs on the new thread.
    pub fn spawn<I, F>(make_injector: F, gate: Arc<InjectionGate>) -> std::io::Result<Self>
    where
        I: KeystrokeInjector + 'static,
        F: FnOnce() -> Result<I, InjectionError> + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        let thread_gate = gate.clone();

        let thread = thread::Builder::new()
            .name("keystroke-injector".to_string())
            .spawn(move || injector_thread_main(make_injector, receiver, thread_gate))?;

        Ok(Self {
            sender,
            gate,
            thread: Some(thread),
        })
    }

    /// Suppress observation, then queue the job.
    ///
    /// Returns false if the thread is gone.
    pub fn submit(&self, job: InjectionJob) -> bool {
        self.gate.begin();
        if self.sender.send(job).is_err() {
            self.gate.end();
            crate::warn!("Injector thread disconnected, dropping job");
            return false;
        }
        true
    }
}

impl Drop for InjectorThreadHandle {
    fn drop(&mut self) {
        let _ = self.sender.send(InjectionJob::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Run one job against an injector
pub fn execute_job<I: KeystrokeInjector>(
    injector: &mut I,
    job: &InjectionJob,
) -> Result<(), InjectionError> {
    match job {
        InjectionJob::Erase { count, .. } => injector.erase(*count),
        InjectionJob::Replace { erase, text } => {
            injector.erase(*erase)?;
            injector.type_text(text)
        }
        InjectionJob::Shutdown => Ok(()),
    }
}

fn injector_thread_main<I, F>(make_injector: F, receiver: Receiver<InjectionJob>, gate: Arc<InjectionGate>)
where
    I: KeystrokeInjector,
    F: FnOnce() -> Result<I, InjectionError>,
{
    let mut injector = match make_injector() {
        Ok(injector) => Some(injector),
        Err(e) => {
            crate::error!("Keystroke injection unavailable: {}", e);
            None
        }
    };

    for job in receiver {
        if matches!(job, InjectionJob::Shutdown) {
            break;
        }
        if let Some(injector) = injector.as_mut() {
            if let Err(e) = execute_job(injector, &job) {
                crate::warn!("Keystroke injection failed: {}", e);
            }
        }
        gate.end();
        if let InjectionJob::Erase { then: Some(then), .. } = job {
            then();
        }
    }

    crate::debug!("Injector thread exiting");
}

#[cfg(test)]
#[path = "worker_test.rs"]
mod tests;
