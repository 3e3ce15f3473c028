//! Listen-then-try helper that leaves the registry untouched on failure.

use crate::emitter::Emitter;
use crate::error::{EmitterError, ListenerResult};
use crate::id::CallbackId;
use crate::key::EventKey;

/// Removes a freshly registered listener when dropped, unless disarmed.
struct RollbackGuard<'a, K: EventKey> {
    emitter: &'a Emitter<K>,
    event: K,
    id: CallbackId,
    armed: bool,
}

impl<K: EventKey> RollbackGuard<'_, K> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl<K: EventKey> Drop for RollbackGuard<'_, K> {
    fn drop(&mut self) {
        if self.armed {
            tracing::debug!(event = ?self.event, id = %self.id, "rolling back listener");
            self.emitter.remove_listener(&self.event, self.id);
        }
    }
}

impl<K: EventKey> Emitter<K> {
    /// Register `body` on `event`, then run `action`.
    ///
    /// If `action` fails (or panics) the listener is removed again through
    /// [`Emitter::remove_listener`] and the action's error is returned as is.
    /// If it succeeds the listener stays registered. A registration refused
    /// by the cap is converted into `E` and `action` does not run.
    pub fn rollback_scope<A, F, T, E, Act>(
        &self,
        event: K,
        body: F,
        once: bool,
        action: Act,
    ) -> Result<T, E>
    where
        A: 'static,
        F: Fn(A) -> ListenerResult + Send + Sync + 'static,
        Act: FnOnce() -> Result<T, E>,
        E: From<EmitterError>,
    {
        let id = self.add_listener(event.clone(), body, once)?;
        let guard = RollbackGuard {
            emitter: self,
            event,
            id,
            armed: true,
        };
        let result = action();
        if result.is_ok() {
            guard.disarm();
        }
        result
    }
}

/// Free-function form of [`Emitter::rollback_scope`].
pub fn rollback_scope<K, A, F, T, E, Act>(
    emitter: &Emitter<K>,
    event: K,
    body: F,
    once: bool,
    action: Act,
) -> Result<T, E>
where
    K: EventKey,
    A: 'static,
    F: Fn(A) -> ListenerResult + Send + Sync + 'static,
    Act: FnOnce() -> Result<T, E>,
    E: From<EmitterError>,
{
    emitter.rollback_scope(event, body, once, action)
}
