//! Reactor — background work queue with home-thread completions.
//!
//! `submit(task, completion)` runs `task` on the tokio blocking pool and
//! queues `completion` with its result. Completions only run inside
//! [`Reactor::run_until_idle`], on whichever thread drives it, one at a time
//! and exactly once each. That is where owning components call
//! `Emitter::emit`, so emitters only ever see their home thread.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use evented::EmitError;
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, Mutex};

use crate::error::ReactorError;

/// A completion bound to its task's result. `None` marks a task that
/// panicked and has nothing to deliver.
type Completion = Option<Box<dyn FnOnce() -> Result<(), EmitError> + Send>>;

// ============================================================================
// ReactorConfig
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactorConfig {
    /// Label used in log fields and errors.
    pub name: String,
}

impl Default for ReactorConfig {
    fn default() -> Self {
        Self {
            name: "reactor".to_string(),
        }
    }
}

// ============================================================================
// Reactor
// ============================================================================

pub struct Reactor {
    name: String,
    handle: Handle,
    tx: mpsc::UnboundedSender<Completion>,
    rx: Mutex<mpsc::UnboundedReceiver<Completion>>,
    /// Submitted tasks whose completion has not run yet.
    pending: AtomicUsize,
    disposed: AtomicBool,
}

impl Reactor {
    /// Create a reactor on the current tokio runtime.
    pub fn new(config: ReactorConfig) -> Result<Self, ReactorError> {
        let handle = Handle::try_current().map_err(|_| ReactorError::NoRuntime)?;
        let (tx, rx) = mpsc::unbounded_channel();
        Ok(Self {
            name: config.name,
            handle,
            tx,
            rx: Mutex::new(rx),
            pending: AtomicUsize::new(0),
            disposed: AtomicBool::new(false),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run `task` in the background and queue `completion` with its result.
    ///
    /// The completion receives either the success or the error payload, never
    /// both. A task that panics never reaches its completion.
    pub fn submit<T, E, Task, Done>(&self, task: Task, completion: Done) -> Result<(), ReactorError>
    where
        T: Send + 'static,
        E: Send + 'static,
        Task: FnOnce() -> Result<T, E> + Send + 'static,
        Done: FnOnce(Result<T, E>) -> Result<(), EmitError> + Send + 'static,
    {
        if self.disposed.load(Ordering::SeqCst) {
            return Err(ReactorError::Disposed(self.name.clone()));
        }
        self.pending.fetch_add(1, Ordering::SeqCst);
        tracing::trace!(reactor = %self.name, "task submitted");

        let tx = self.tx.clone();
        let name = self.name.clone();
        self.handle.spawn_blocking(move || {
            let done: Completion = match catch_unwind(AssertUnwindSafe(task)) {
                Ok(result) => Some(Box::new(move || completion(result))),
                Err(_) => {
                    tracing::warn!(reactor = %name, "background task panicked; completion dropped");
                    None
                }
            };
            // The receiver lives as long as the reactor; a send error means
            // the reactor is gone and nobody is left to run the completion.
            let _ = tx.send(done);
        });
        Ok(())
    }

    /// Run queued completions until no submitted task is outstanding.
    ///
    /// Returns how many completions ran. Stops at the first completion whose
    /// dispatch fails and returns that error; tasks still outstanding are
    /// picked up by the next call.
    pub async fn run_until_idle(&self) -> Result<usize, ReactorError> {
        let mut rx = self.rx.lock().await;
        let mut ran = 0;
        while self.pending.load(Ordering::SeqCst) > 0 {
            let Some(done) = rx.recv().await else {
                break;
            };
            self.pending.fetch_sub(1, Ordering::SeqCst);
            if let Some(done) = done {
                ran += 1;
                done()?;
            }
        }
        Ok(ran)
    }

    /// Submitted tasks whose completion has not run yet.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Refuse further submissions. Tasks already submitted still complete.
    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
        tracing::debug!(reactor = %self.name, pending = self.pending(), "reactor disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}
