//! Emitter<K> — listener registry keyed by `K` with synchronous dispatch.
//!
//! `emit` runs over the sequence registered when it was called. Entries
//! removed by a listener still run in that pass; entries added by one wait
//! for the next emit.
//!
//! A `once` entry fires at most once. It leaves the live registry right before
//! its body runs, and every snapshot copy shares a fired flag, so a nested
//! emit of the same event never reaches it a second time.
//!
//! `emit` fails with [`EmitError::Listener`] when a body returns `Err`, and
//! with [`EmitError::Dispatch`] when the emitter itself refuses the call
//! (argument type mismatch). Either stops the pass.
//!
//! Registration and individual removal announce themselves on the
//! `new_listener` / `remove_listener` keys. Those meta listeners cannot fail
//! the call that triggered them: errors and panics are logged at WARN.
//!
//! No lock is held while a body runs, so bodies may re-enter the emitter.

use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use parking_lot::Mutex;

use crate::callback::Callback;
use crate::config::EmitterConfig;
use crate::error::{EmitError, EmitterError, ListenerResult, Result};
use crate::id::CallbackId;
use crate::key::{EventKey, MetaEvent};
use crate::registry::{EventRegistry, ListenerEntry};

struct EmitterState<K: EventKey> {
    registry: EventRegistry<K>,
    /// 0 = unlimited.
    max_listeners: usize,
}

/// Event emitter keyed by `K`.
///
/// Owning components hold one by composition and document, per key, the
/// argument type listeners must accept. Emitting a key with a different
/// argument type fails with [`EmitterError::InvocationTypeMismatch`].
pub struct Emitter<K: EventKey> {
    state: Mutex<EmitterState<K>>,
}

impl<K: EventKey> Emitter<K> {
    /// Create an emitter with the default cap of 10 listeners per event.
    pub fn new() -> Self {
        Self::with_config(EmitterConfig::default())
    }

    pub fn with_config(config: EmitterConfig) -> Self {
        Self {
            state: Mutex::new(EmitterState {
                registry: EventRegistry::new(),
                max_listeners: config.max_listeners,
            }),
        }
    }

    // ------------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------------

    /// Register `body` on `event` and return its id.
    ///
    /// Fails with `ListenerLimitExceeded` when `event` already holds
    /// `max_listeners` entries; nothing is registered in that case. On success
    /// the `new_listener` meta-event fires with `(event, callback)`. Errors
    /// and panics from meta listeners are logged and do not fail the
    /// registration.
    pub fn add_listener<A, F>(&self, event: K, body: F, once: bool) -> Result<CallbackId>
    where
        A: 'static,
        F: Fn(A) -> ListenerResult + Send + Sync + 'static,
    {
        let callback = {
            let mut state = self.state.lock();
            let limit = state.max_listeners;
            if limit != 0 && state.registry.count(&event) >= limit {
                drop(state);
                tracing::warn!(event = ?event, limit, "listener rejected: max listeners reached");
                return Err(EmitterError::ListenerLimitExceeded {
                    event: format!("{event:?}"),
                    limit,
                });
            }
            let callback = Callback::bind(body);
            state
                .registry
                .push(event.clone(), ListenerEntry::new(callback.clone(), once));
            callback
        };

        let id = callback.id();
        tracing::debug!(event = ?event, id = %id, once, "listener added");
        // The entry just added is not told about its own registration.
        self.emit_meta(K::new_listener(), (event, callback), Some(id));
        Ok(id)
    }

    /// `add_listener(event, body, false)`.
    pub fn on<A, F>(&self, event: K, body: F) -> Result<CallbackId>
    where
        A: 'static,
        F: Fn(A) -> ListenerResult + Send + Sync + 'static,
    {
        self.add_listener(event, body, false)
    }

    /// `add_listener(event, body, true)`.
    pub fn once<A, F>(&self, event: K, body: F) -> Result<CallbackId>
    where
        A: 'static,
        F: Fn(A) -> ListenerResult + Send + Sync + 'static,
    {
        self.add_listener(event, body, true)
    }

    /// Listen for registrations on this emitter.
    pub fn on_new_listener<F>(&self, body: F) -> Result<CallbackId>
    where
        F: Fn(MetaEvent<K>) -> ListenerResult + Send + Sync + 'static,
    {
        self.add_listener(K::new_listener(), body, false)
    }

    /// Listen for individual removals on this emitter.
    pub fn on_remove_listener<F>(&self, body: F) -> Result<CallbackId>
    where
        F: Fn(MetaEvent<K>) -> ListenerResult + Send + Sync + 'static,
    {
        self.add_listener(K::remove_listener(), body, false)
    }

    // ------------------------------------------------------------------------
    // Removal
    // ------------------------------------------------------------------------

    /// Remove the listener `id` from `event`.
    ///
    /// Returns `false` and does nothing if it is not registered there (safe to
    /// call multiple times). On removal the `remove_listener` meta-event fires
    /// with `(event, removed_callback)`.
    pub fn remove_listener(&self, event: &K, id: CallbackId) -> bool {
        let removed = self.state.lock().registry.remove(event, id);
        match removed {
            Some(entry) => {
                tracing::debug!(event = ?event, id = %id, "listener removed");
                self.emit_meta(K::remove_listener(), (event.clone(), entry.callback), None);
                true
            }
            None => false,
        }
    }

    /// Drop every listener on every event. No meta-events fire.
    pub fn remove_all_listeners(&self) -> usize {
        let removed = self.state.lock().registry.clear();
        tracing::debug!(removed, "all listeners removed");
        removed
    }

    /// Drop every listener on `event`. No meta-events fire.
    pub fn remove_all_listeners_for(&self, event: &K) -> usize {
        let removed = self.state.lock().registry.clear_event(event);
        tracing::debug!(event = ?event, removed, "event listeners removed");
        removed
    }

    // ------------------------------------------------------------------------
    // Cap
    // ------------------------------------------------------------------------

    /// Replace the per-event cap. `0` disables it. Entries already over the
    /// new cap stay registered.
    pub fn set_max_listeners(&self, n: usize) {
        self.state.lock().max_listeners = n;
        tracing::debug!(max_listeners = n, "listener cap changed");
    }

    pub fn max_listeners(&self) -> usize {
        self.state.lock().max_listeners
    }

    // ------------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------------

    /// Number of listeners currently registered on `event`.
    pub fn listener_count(&self, event: &K) -> usize {
        self.state.lock().registry.count(event)
    }

    pub fn has_listeners(&self, event: &K) -> bool {
        self.listener_count(event) > 0
    }

    /// Callbacks registered on `event`, in invocation order.
    pub fn listeners(&self, event: &K) -> Vec<Callback> {
        self.state
            .lock()
            .registry
            .snapshot(event)
            .into_iter()
            .map(|e| e.callback)
            .collect()
    }

    /// Keys with at least one listener, in first-registration order.
    pub fn event_names(&self) -> Vec<K> {
        self.state.lock().registry.event_names()
    }

    // ------------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------------

    /// Emit `event` to its listeners and return whether there were any.
    ///
    /// A snapshot of the listener sequence is taken before iteration, so
    /// additions or removals during a callback do not affect this round.
    /// Every listener but the last receives a clone of `args`; the last one
    /// receives `args` itself.
    pub fn emit<A: Clone + 'static>(&self, event: &K, args: A) -> Result<bool, EmitError> {
        self.dispatch(event, args, None)
    }

    fn dispatch<A: Clone + 'static>(
        &self,
        event: &K,
        args: A,
        skip: Option<CallbackId>,
    ) -> Result<bool, EmitError> {
        // Snapshot under the lock (cheap: ref-count bumps).
        let mut snapshot = self.state.lock().registry.snapshot(event);
        if let Some(skip) = skip {
            snapshot.retain(|e| e.id() != skip);
        }
        // Lock is released — callbacks can safely call on()/remove_listener().
        let Some((last, rest)) = snapshot.split_last() else {
            return Ok(false);
        };
        tracing::trace!(event = ?event, listeners = snapshot.len(), "emit");

        for entry in rest {
            self.invoke_entry(event, entry, args.clone())?;
        }
        self.invoke_entry(event, last, args)?;
        Ok(true)
    }

    fn invoke_entry<A: 'static>(
        &self,
        event: &K,
        entry: &ListenerEntry,
        args: A,
    ) -> Result<(), EmitError> {
        if !entry.claim() {
            tracing::trace!(event = ?event, id = %entry.id(), "once listener already fired");
            return Ok(());
        }
        // Already gone if removed earlier in this pass; the snapshot entry
        // still runs.
        if entry.once && self.state.lock().registry.remove(event, entry.id()).is_some() {
            tracing::trace!(event = ?event, id = %entry.id(), "once listener pruned");
        }
        entry.callback.invoke(args)
    }

    /// Fire a meta-event. Listener errors and panics are logged, never
    /// returned.
    fn emit_meta(&self, meta: K, payload: MetaEvent<K>, skip: Option<CallbackId>) {
        match catch_unwind(AssertUnwindSafe(|| self.dispatch(&meta, payload, skip))) {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                tracing::warn!(event = ?meta, error = %e, "meta-event listener failed");
            }
            Err(panic) => {
                tracing::warn!(
                    event = ?meta,
                    panic = panic_message(panic.as_ref()),
                    "meta-event listener panicked"
                );
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

impl<K: EventKey> Default for Emitter<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: EventKey> fmt::Debug for Emitter<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Emitter")
            .field("max_listeners", &state.max_listeners)
            .field("events", &state.registry.event_names())
            .finish()
    }
}
